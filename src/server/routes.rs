//! Router configuration for the web server.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

use super::handlers;
use super::AppState;

/// Create the main router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/search", get(handlers::api_search))
        // Cache panel
        .route("/api/cache/stats", get(handlers::api_cache_stats))
        .route("/api/cache/clear", post(handlers::api_cache_clear))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
