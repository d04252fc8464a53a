//! Search parameters for the PNCP notice search.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use url::form_urlencoded::byte_serialize;

/// Document type requested from the search endpoint.
pub const DOCUMENT_TYPE: &str = "edital";

/// Result ordering requested from the search endpoint (newest first).
pub const ORDERING: &str = "-data";

/// Upstream date format for `dataInicial`/`dataFinal`.
const DATE_FORMAT: &str = "%Y%m%d";

/// Filters and pagination for one search.
///
/// Everything except `page` is optional; `page` defaults to 1 and an unset
/// `page_size` falls back to the service's configured default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchParams {
    pub page: u32,
    pub page_size: Option<u32>,
    /// Free-text query.
    pub query: Option<String>,
    /// Notice status filter (e.g. `recebendo_proposta`).
    pub status: Option<String>,
    /// Two-letter state code.
    pub uf: Option<String>,
    /// PNCP modality code.
    pub modalidade: Option<u32>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: None,
            query: None,
            status: None,
            uf: None,
            modalidade: None,
            date_from: None,
            date_to: None,
        }
    }
}

impl SearchParams {
    /// Free-text search on the first page.
    pub fn query(q: impl Into<String>) -> Self {
        Self {
            query: Some(q.into()),
            ..Default::default()
        }
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn with_uf(mut self, uf: impl Into<String>) -> Self {
        self.uf = Some(uf.into());
        self
    }

    pub fn with_modalidade(mut self, code: u32) -> Self {
        self.modalidade = Some(code);
        self
    }

    pub fn with_dates(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        self.date_from = from;
        self.date_to = to;
        self
    }

    /// Page number, treating 0 as the first page.
    pub fn effective_page(&self) -> u32 {
        self.page.max(1)
    }

    pub fn effective_page_size(&self, default_page_size: u32) -> u32 {
        self.page_size.unwrap_or(default_page_size).max(1)
    }

    fn text_filter(value: &Option<String>) -> Option<&str> {
        value.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    /// Deterministic cache key.
    ///
    /// Only set fields are included, always in the order
    /// `q, status, uf, modalidade, dataInicial, dataFinal, page, pageSize`.
    /// Values are form-encoded, so `&` and `=` only ever separate segments.
    /// `pageSize` appears only when it differs from `default_page_size`.
    pub fn cache_key(&self, default_page_size: u32) -> String {
        let mut parts = Vec::new();

        if let Some(q) = Self::text_filter(&self.query) {
            parts.push(key_segment("q", q));
        }
        if let Some(status) = Self::text_filter(&self.status) {
            parts.push(key_segment("status", status));
        }
        if let Some(uf) = Self::text_filter(&self.uf) {
            parts.push(key_segment("uf", &uf.to_uppercase()));
        }
        if let Some(code) = self.modalidade {
            parts.push(format!("modalidade={}", code));
        }
        if let Some(from) = self.date_from {
            parts.push(format!("dataInicial={}", from.format(DATE_FORMAT)));
        }
        if let Some(to) = self.date_to {
            parts.push(format!("dataFinal={}", to.format(DATE_FORMAT)));
        }
        parts.push(format!("page={}", self.effective_page()));
        let page_size = self.effective_page_size(default_page_size);
        if page_size != default_page_size.max(1) {
            parts.push(format!("pageSize={}", page_size));
        }

        parts.join("&")
    }

    /// Encoded `status=` segment as it appears in a cache key.
    pub fn status_key_segment(&self) -> Option<String> {
        Self::text_filter(&self.status).map(|status| key_segment("status", status))
    }

    /// Query pairs for the upstream search endpoint.
    pub fn to_query(&self, default_page_size: u32) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("tipos_documento", DOCUMENT_TYPE.to_string()),
            ("pagina", self.effective_page().to_string()),
            (
                "tam_pagina",
                self.effective_page_size(default_page_size).to_string(),
            ),
            ("ordenacao", ORDERING.to_string()),
        ];

        if let Some(q) = Self::text_filter(&self.query) {
            query.push(("q", q.to_string()));
        }
        if let Some(status) = Self::text_filter(&self.status) {
            query.push(("status", status.to_string()));
        }
        if let Some(uf) = Self::text_filter(&self.uf) {
            query.push(("uf", uf.to_uppercase()));
        }
        if let Some(code) = self.modalidade {
            query.push(("codigoModalidadeContratacao", code.to_string()));
        }
        if let Some(from) = self.date_from {
            query.push(("dataInicial", from.format(DATE_FORMAT).to_string()));
        }
        if let Some(to) = self.date_to {
            query.push(("dataFinal", to.format(DATE_FORMAT).to_string()));
        }

        query
    }
}

fn key_segment(name: &str, value: &str) -> String {
    format!("{}={}", name, byte_serialize(value.as_bytes()).collect::<String>())
}
