//! Known upstream spellings for each normalized field, most preferred first.
//!
//! The search API has returned both camelCase (consulta API) and snake_case
//! (search index) names for the same data. Dotted entries walk nested
//! objects.

// Envelope
pub const ITEMS: &[&str] = &["items", "data", "resultado", "content"];
pub const TOTAL: &[&str] = &["total", "totalRegistros", "count", "totalElements"];
pub const TOTAL_PAGES: &[&str] = &["totalPaginas", "total_paginas", "totalPages"];

// Notice
pub const NUMERO_CONTROLE_PNCP: &[&str] = &[
    "numeroControlePNCP",
    "numero_controle_pncp",
    "numeroControlePncp",
];
pub const DATA_PUBLICACAO_PNCP: &[&str] = &[
    "dataPublicacaoPncp",
    "data_publicacao_pncp",
    "dataPublicacao",
    "data_publicacao",
    "createdAt",
];
pub const DATA_ABERTURA_PROPOSTA: &[&str] = &[
    "dataAberturaProposta",
    "data_abertura_proposta",
    "data_inicio_vigencia",
];
pub const DATA_ENCERRAMENTO_PROPOSTA: &[&str] = &[
    "dataEncerramentoProposta",
    "data_encerramento_proposta",
    "data_fim_vigencia",
];
pub const SITUACAO_COMPRA_NOME: &[&str] = &[
    "situacaoCompraNome",
    "situacao_compra_nome",
    "situacao_nome",
    "situacao",
];
pub const MODALIDADE_ID: &[&str] = &[
    "modalidadeId",
    "modalidade_id",
    "modalidade_licitacao_id",
    "codigoModalidadeContratacao",
];
pub const MODALIDADE_NOME: &[&str] = &[
    "modalidadeNome",
    "modalidade_nome",
    "modalidade_licitacao_nome",
];
pub const OBJETO_COMPRA: &[&str] = &[
    "objetoCompra",
    "objeto_compra",
    "description",
    "descricao",
    "title",
];
pub const VALOR_TOTAL_ESTIMADO: &[&str] = &[
    "valorTotalEstimado",
    "valor_total_estimado",
    "valor_global",
    "valorGlobal",
];
pub const VALOR_TOTAL_HOMOLOGADO: &[&str] = &["valorTotalHomologado", "valor_total_homologado"];
pub const ANO_COMPRA: &[&str] = &["anoCompra", "ano_compra", "ano"];
pub const SEQUENCIAL_COMPRA: &[&str] = &["sequencialCompra", "sequencial_compra", "numero_sequencial"];
pub const NUMERO_COMPRA: &[&str] = &["numeroCompra", "numero_compra", "numero"];
pub const PROCESSO: &[&str] = &["processo", "numero_processo"];
pub const LINK_SISTEMA_ORIGEM: &[&str] = &["linkSistemaOrigem", "link_sistema_origem", "item_url", "url"];
pub const SRP: &[&str] = &["srp", "registro_preco"];

// Public body
pub const ORGAO_CNPJ: &[&str] = &["orgaoEntidade.cnpj", "orgao_cnpj", "cnpj"];
pub const ORGAO_RAZAO_SOCIAL: &[&str] = &[
    "orgaoEntidade.razaoSocial",
    "orgao_nome",
    "orgaoNome",
    "razao_social",
];
pub const ORGAO_PODER_ID: &[&str] = &["orgaoEntidade.poderId", "poder_id", "poderId"];
pub const ORGAO_ESFERA_ID: &[&str] = &["orgaoEntidade.esferaId", "esfera_id", "esferaId"];

// Administrative unit
pub const UNIDADE_CODIGO: &[&str] = &["unidadeOrgao.codigoUnidade", "unidade_codigo", "codigo_unidade"];
pub const UNIDADE_NOME: &[&str] = &["unidadeOrgao.nomeUnidade", "unidade_nome", "nome_unidade"];
pub const UNIDADE_UF_SIGLA: &[&str] = &["unidadeOrgao.ufSigla", "uf", "uf_sigla", "ufSigla"];
pub const UNIDADE_UF_NOME: &[&str] = &["unidadeOrgao.ufNome", "uf_nome", "ufNome"];
pub const UNIDADE_MUNICIPIO_NOME: &[&str] = &[
    "unidadeOrgao.municipioNome",
    "municipio_nome",
    "municipioNome",
    "municipio",
];
pub const UNIDADE_CODIGO_IBGE: &[&str] = &[
    "unidadeOrgao.codigoIbge",
    "municipio_id",
    "codigo_ibge",
    "codigoIbge",
];
