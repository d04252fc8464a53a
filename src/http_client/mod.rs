//! Transport for the PNCP search endpoint.
//!
//! [`SearchTransport`] is the seam between the orchestrator and the network.
//! [`HttpTransport`] is the reqwest implementation; tests substitute scripted
//! transports or point it at a mock server.

mod error;

pub use error::{FetchResult, SearchError};

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

/// Default search endpoint.
pub const DEFAULT_BASE_URL: &str = "https://pncp.gov.br/api/search/";

/// Default User-Agent header.
pub const USER_AGENT: &str = concat!("licitacoes/", env!("CARGO_PKG_VERSION"));

/// Performs one GET against the search endpoint.
#[async_trait]
pub trait SearchTransport: Send + Sync {
    /// Fetch a raw response body. Non-2xx responses are errors.
    async fn fetch(&self, query: &[(&'static str, String)]) -> FetchResult<Value>;
}

/// reqwest-backed transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    /// Create a transport for `base_url`.
    pub fn new(base_url: &str, timeout: Duration, user_agent: &str) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.to_string(),
        })
    }
}

#[async_trait]
impl SearchTransport for HttpTransport {
    async fn fetch(&self, query: &[(&'static str, String)]) -> FetchResult<Value> {
        let start = Instant::now();
        let response = self
            .client
            .get(&self.base_url)
            .query(query)
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        debug!(
            "GET {} -> {} in {}ms",
            self.base_url,
            status.as_u16(),
            start.elapsed().as_millis()
        );

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError::from_status(status.as_u16(), &body));
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}
