//! API endpoint handlers.

use axum::{
    extract::{Query, State},
    http::{HeaderValue, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;

use super::AppState;
use crate::models::SearchParams;

/// Header carrying where a search answer came from.
pub const RESULT_SOURCE_HEADER: &str = "x-result-source";

/// Health check endpoint for container orchestration.
pub async fn health() -> impl IntoResponse {
    StatusCode::OK
}

/// Search query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub status: Option<String>,
    pub uf: Option<String>,
    pub modalidade: Option<u32>,
    /// `YYYY-MM-DD`
    pub data_inicial: Option<NaiveDate>,
    /// `YYYY-MM-DD`
    pub data_final: Option<NaiveDate>,
}

impl From<SearchQuery> for SearchParams {
    fn from(query: SearchQuery) -> Self {
        SearchParams {
            page: query.page.unwrap_or(1),
            page_size: query.page_size,
            query: query.q,
            status: query.status,
            uf: query.uf,
            modalidade: query.modalidade,
            date_from: query.data_inicial,
            date_to: query.data_final,
        }
    }
}

/// Search notices. Upstream failures degrade to cached or empty pages, so
/// this always answers 200.
pub async fn api_search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> impl IntoResponse {
    let params = SearchParams::from(query);
    let outcome = state.search.search_with_source(&params).await;

    let mut response = Json(outcome.result).into_response();
    if let Ok(value) = HeaderValue::from_str(&outcome.source.to_string()) {
        response.headers_mut().insert(RESULT_SOURCE_HEADER, value);
    }
    response
}

/// Cache and backoff counters.
pub async fn api_cache_stats(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.search.stats().await)
}

/// Drop all cached searches.
pub async fn api_cache_clear(State(state): State<AppState>) -> impl IntoResponse {
    state.search.clear_cache();
    StatusCode::NO_CONTENT
}
