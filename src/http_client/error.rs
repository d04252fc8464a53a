//! Error taxonomy for upstream search calls.

use thiserror::Error;

/// Result type for upstream search operations.
pub type FetchResult<T> = Result<T, SearchError>;

/// Errors raised while fetching from the PNCP search endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    /// HTTP 429, or a response that explicitly signals rate limiting.
    #[error("Rate limited by upstream (HTTP {status})")]
    RateLimited { status: u16 },
    /// Any other non-2xx response.
    #[error("Upstream returned HTTP {status}: {message}")]
    Http { status: u16, message: String },
    /// Connection, DNS or timeout failure.
    #[error("Network error: {0}")]
    Network(String),
    /// Response body was not valid JSON.
    #[error("Failed to decode response: {0}")]
    Decode(String),
    /// Transient failures exceeded the retry ceiling.
    #[error("Retries exhausted after {attempts} attempts")]
    RetryExhausted { attempts: u32 },
}

impl SearchError {
    /// Only rate-limit conditions consume the retry budget.
    pub fn is_transient(&self) -> bool {
        matches!(self, SearchError::RateLimited { .. })
    }

    /// Classify a non-success status and its body text.
    pub fn from_status(status: u16, body: &str) -> Self {
        if status == 429 || body.to_lowercase().contains("rate limit") {
            SearchError::RateLimited { status }
        } else {
            let message = body.chars().take(200).collect::<String>();
            SearchError::Http {
                status,
                message: message.trim().to_string(),
            }
        }
    }
}

impl From<reqwest::Error> for SearchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            SearchError::Decode(e.to_string())
        } else {
            SearchError::Network(e.to_string())
        }
    }
}

impl From<serde_json::Error> for SearchError {
    fn from(e: serde_json::Error) -> Self {
        SearchError::Decode(e.to_string())
    }
}
