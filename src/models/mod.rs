//! Data models for procurement notice search.

mod licitacao;
mod modalidade;
mod search;

pub use licitacao::{NormalizedItem, NormalizedSearchResult, OrgaoEntidade, PageMeta, UnidadeOrgao};
pub use modalidade::Modalidade;
pub use search::{SearchParams, DOCUMENT_TYPE, ORDERING};
