//! HTTP surface over the search service.
//!
//! Exposes search, cache stats and cache clearing as JSON endpoints for a
//! browser dashboard.

mod handlers;
mod routes;

pub use handlers::RESULT_SOURCE_HEADER;
pub use routes::create_router;

use std::net::SocketAddr;
use std::sync::Arc;

use crate::config::Settings;
use crate::search::SearchService;

/// Shared state for the web server.
#[derive(Clone, Debug)]
pub struct AppState {
    pub search: Arc<SearchService>,
}

impl AppState {
    pub fn new(settings: &Settings) -> anyhow::Result<Self> {
        Ok(Self {
            search: Arc::new(SearchService::from_settings(settings)?),
        })
    }
}

/// Start the web server.
pub async fn serve(settings: &Settings, host: &str, port: u16) -> anyhow::Result<()> {
    let state = AppState::new(settings)?;
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    tracing::info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
