//! Upstream response normalization.
//!
//! Maps whatever shape the search API returns into [`NormalizedSearchResult`].
//! The functions here are total: missing, null or mistyped fields fall back
//! to zero values and unrecognized fields are dropped.

mod aliases;
mod extract;

pub use extract::{extract_path, parse_decimal};

use serde_json::Value;

use crate::models::{
    Modalidade, NormalizedItem, NormalizedSearchResult, OrgaoEntidade, PageMeta, UnidadeOrgao,
};
use extract::{bool_field, integer_field, number_field, text_field};

/// Page that was requested, used for pagination metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub per_page: u32,
}

/// Normalize a raw search response body.
pub fn normalize(raw: &Value, request: PageRequest) -> NormalizedSearchResult {
    let items: Vec<NormalizedItem> = raw_items(raw).iter().map(normalize_item).collect();

    let total = aliases::TOTAL
        .iter()
        .find_map(|alias| extract_path(raw, alias).as_u64())
        .unwrap_or(items.len() as u64);

    let mut page = PageMeta::compute(request.page, request.per_page, total, items.len());
    if let Some(pages) = aliases::TOTAL_PAGES
        .iter()
        .find_map(|alias| extract_path(raw, alias).as_u64())
        .filter(|p| *p > 0)
    {
        page.last_page = u32::try_from(pages).unwrap_or(u32::MAX);
    }

    NormalizedSearchResult { items, total, page }
}

fn raw_items(raw: &Value) -> &[Value] {
    if let Value::Array(items) = raw {
        return items;
    }

    aliases::ITEMS
        .iter()
        .find_map(|alias| extract_path(raw, alias).as_array())
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Normalize one raw item.
pub fn normalize_item(raw: &Value) -> NormalizedItem {
    let modalidade_id = integer_field(raw, aliases::MODALIDADE_ID);
    let mut modalidade_nome = text_field(raw, aliases::MODALIDADE_NOME);
    if modalidade_nome.is_empty() {
        if let Some(m) = Modalidade::from_code(modalidade_id) {
            modalidade_nome = m.nome().to_string();
        }
    }

    NormalizedItem {
        numero_controle_pncp: text_field(raw, aliases::NUMERO_CONTROLE_PNCP),
        data_publicacao_pncp: text_field(raw, aliases::DATA_PUBLICACAO_PNCP),
        data_abertura_proposta: text_field(raw, aliases::DATA_ABERTURA_PROPOSTA),
        data_encerramento_proposta: text_field(raw, aliases::DATA_ENCERRAMENTO_PROPOSTA),
        situacao_compra_nome: text_field(raw, aliases::SITUACAO_COMPRA_NOME),
        modalidade_id,
        modalidade_nome,
        objeto_compra: text_field(raw, aliases::OBJETO_COMPRA),
        valor_total_estimado: number_field(raw, aliases::VALOR_TOTAL_ESTIMADO),
        valor_total_homologado: number_field(raw, aliases::VALOR_TOTAL_HOMOLOGADO),
        ano_compra: integer_field(raw, aliases::ANO_COMPRA),
        sequencial_compra: integer_field(raw, aliases::SEQUENCIAL_COMPRA),
        numero_compra: text_field(raw, aliases::NUMERO_COMPRA),
        processo: text_field(raw, aliases::PROCESSO),
        link_sistema_origem: text_field(raw, aliases::LINK_SISTEMA_ORIGEM),
        srp: bool_field(raw, aliases::SRP),
        orgao_entidade: OrgaoEntidade {
            cnpj: text_field(raw, aliases::ORGAO_CNPJ),
            razao_social: text_field(raw, aliases::ORGAO_RAZAO_SOCIAL),
            poder_id: text_field(raw, aliases::ORGAO_PODER_ID),
            esfera_id: text_field(raw, aliases::ORGAO_ESFERA_ID),
        },
        unidade_orgao: UnidadeOrgao {
            codigo_unidade: text_field(raw, aliases::UNIDADE_CODIGO),
            nome_unidade: text_field(raw, aliases::UNIDADE_NOME),
            uf_sigla: text_field(raw, aliases::UNIDADE_UF_SIGLA).to_uppercase(),
            uf_nome: text_field(raw, aliases::UNIDADE_UF_NOME),
            municipio_nome: text_field(raw, aliases::UNIDADE_MUNICIPIO_NOME),
            codigo_ibge: text_field(raw, aliases::UNIDADE_CODIGO_IBGE),
        },
    }
}
