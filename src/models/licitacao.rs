//! Normalized procurement notice records.
//!
//! Every field is always present. Absent upstream values become an empty
//! string, zero, `false` or an empty nested record, never `null`.

use serde::{Deserialize, Serialize};

/// Public body that published the notice.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrgaoEntidade {
    pub cnpj: String,
    pub razao_social: String,
    pub poder_id: String,
    pub esfera_id: String,
}

/// Administrative unit inside the public body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnidadeOrgao {
    pub codigo_unidade: String,
    pub nome_unidade: String,
    pub uf_sigla: String,
    pub uf_nome: String,
    pub municipio_nome: String,
    pub codigo_ibge: String,
}

/// One procurement notice (edital) in the stable internal shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedItem {
    #[serde(rename = "numeroControlePNCP")]
    pub numero_controle_pncp: String,
    pub data_publicacao_pncp: String,
    pub data_abertura_proposta: String,
    pub data_encerramento_proposta: String,
    pub situacao_compra_nome: String,
    pub modalidade_id: u32,
    pub modalidade_nome: String,
    pub objeto_compra: String,
    pub valor_total_estimado: f64,
    pub valor_total_homologado: f64,
    pub ano_compra: u32,
    pub sequencial_compra: u32,
    pub numero_compra: String,
    pub processo: String,
    pub link_sistema_origem: String,
    pub srp: bool,
    pub orgao_entidade: OrgaoEntidade,
    pub unidade_orgao: UnidadeOrgao,
}

/// Pagination metadata for one result page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub current_page: u32,
    pub per_page: u32,
    pub last_page: u32,
    /// 1-based index of the first item on the page, 0 when empty.
    pub from: u64,
    /// 1-based index of the last item on the page, 0 when empty.
    pub to: u64,
}

impl PageMeta {
    /// Derive page bounds from the total and the number of items received.
    pub fn compute(current_page: u32, per_page: u32, total: u64, item_count: usize) -> Self {
        let current_page = current_page.max(1);
        let per_page = per_page.max(1);
        let last_page = total.div_ceil(per_page as u64).max(1);
        let (from, to) = if item_count == 0 {
            (0, 0)
        } else {
            let from = (current_page as u64 - 1) * per_page as u64 + 1;
            (from, from + item_count as u64 - 1)
        };

        Self {
            current_page,
            per_page,
            last_page: u32::try_from(last_page).unwrap_or(u32::MAX),
            from,
            to,
        }
    }
}

/// A page of normalized search results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedSearchResult {
    pub items: Vec<NormalizedItem>,
    pub total: u64,
    #[serde(flatten)]
    pub page: PageMeta,
}

impl NormalizedSearchResult {
    /// Well-formed result with no items.
    pub fn empty(current_page: u32, per_page: u32) -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            page: PageMeta::compute(current_page, per_page, 0, 0),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_meta_middle_page() {
        let meta = PageMeta::compute(2, 10, 25, 10);
        assert_eq!(meta.last_page, 3);
        assert_eq!(meta.from, 11);
        assert_eq!(meta.to, 20);
    }

    #[test]
    fn test_page_meta_partial_last_page() {
        let meta = PageMeta::compute(3, 10, 25, 5);
        assert_eq!(meta.from, 21);
        assert_eq!(meta.to, 25);
    }

    #[test]
    fn test_empty_result_is_well_formed() {
        let empty = NormalizedSearchResult::empty(1, 10);
        assert!(empty.is_empty());
        assert_eq!(empty.total, 0);
        assert_eq!(empty.page.last_page, 1);
        assert_eq!(empty.page.from, 0);

        let json = serde_json::to_value(&empty).unwrap();
        assert_eq!(json["items"], serde_json::json!([]));
        assert_eq!(json["currentPage"], 1);
        assert_eq!(json["perPage"], 10);
    }

    #[test]
    fn test_item_serializes_every_field() {
        let json = serde_json::to_value(NormalizedItem::default()).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj["numeroControlePNCP"], "");
        assert_eq!(obj["valorTotalEstimado"], 0.0);
        assert_eq!(obj["orgaoEntidade"]["razaoSocial"], "");
        assert_eq!(obj["unidadeOrgao"]["ufSigla"], "");
        assert!(obj.values().all(|v| !v.is_null()));
    }
}
