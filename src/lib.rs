//! licitacoes - resilient search over Brazilian public procurement notices.
//!
//! Wraps the PNCP search API with a TTL cache, request spacing with
//! exponential backoff, response normalization and a degradation ladder
//! that serves stale or empty pages instead of failing.

pub mod cache;
pub mod cli;
pub mod clock;
pub mod config;
pub mod http_client;
pub mod models;
pub mod normalize;
pub mod rate_limit;
pub mod search;
pub mod server;

pub use models::{NormalizedItem, NormalizedSearchResult, SearchParams};
pub use search::{ResultSource, SearchConfig, SearchOutcome, SearchService};
