//! Search orchestration.
//!
//! [`SearchService`] answers a search from the fresh cache when it can,
//! otherwise fetches through the backoff controller. When the upstream call
//! fails it degrades in order: stale entry for the same key, stale entry for
//! a nearby key, then an empty page. Callers never see an upstream error.

mod fallback;

pub use fallback::is_nearby;

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::cache::{CacheConfig, CacheStats, Lookup, ResponseCache};
use crate::clock::{Clock, SystemClock};
use crate::config::{Settings, DEFAULT_PAGE_SIZE};
use crate::http_client::{FetchResult, HttpTransport, SearchTransport};
use crate::models::{NormalizedSearchResult, SearchParams};
use crate::normalize::{normalize, PageRequest};
use crate::rate_limit::{BackoffConfig, BackoffController, BackoffStats};

/// Tuning for a [`SearchService`].
#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub default_page_size: u32,
    pub backoff: BackoffConfig,
    pub cache: CacheConfig,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            backoff: BackoffConfig::default(),
            cache: CacheConfig::default(),
        }
    }
}

/// Where a search answer came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResultSource {
    /// Fresh cache entry.
    Cache,
    /// Live upstream response.
    Network,
    /// Expired entry for the same key.
    StaleExact,
    /// Expired or fresh entry for a related key.
    StaleNearby { key: String },
    /// Nothing usable; empty page.
    Empty,
}

impl ResultSource {
    /// Whether the answer reflects a failed upstream call.
    pub fn is_degraded(&self) -> bool {
        matches!(
            self,
            ResultSource::StaleExact | ResultSource::StaleNearby { .. } | ResultSource::Empty
        )
    }
}

impl fmt::Display for ResultSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultSource::Cache => write!(f, "cache"),
            ResultSource::Network => write!(f, "network"),
            ResultSource::StaleExact => write!(f, "stale cache"),
            ResultSource::StaleNearby { key } => write!(f, "stale cache ({})", key),
            ResultSource::Empty => write!(f, "empty fallback"),
        }
    }
}

/// A search answer and its provenance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchOutcome {
    pub result: NormalizedSearchResult,
    pub source: ResultSource,
}

/// Combined cache and backoff counters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceStats {
    pub cache: CacheStats,
    pub backoff: BackoffStats,
}

/// Cached, rate-limited search over a [`SearchTransport`].
pub struct SearchService {
    transport: Arc<dyn SearchTransport>,
    cache: ResponseCache<NormalizedSearchResult>,
    backoff: BackoffController,
    default_page_size: u32,
}

impl SearchService {
    /// Create a service on the system clock.
    pub fn new(transport: Arc<dyn SearchTransport>, config: SearchConfig) -> Self {
        Self::with_clock(transport, config, Arc::new(SystemClock))
    }

    /// Create a service whose cache and backoff share `clock`.
    pub fn with_clock(
        transport: Arc<dyn SearchTransport>,
        config: SearchConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            transport,
            cache: ResponseCache::with_config(config.cache, clock.clone()),
            backoff: BackoffController::with_config(config.backoff, clock),
            default_page_size: config.default_page_size.max(1),
        }
    }

    /// Create a service talking HTTP to the configured endpoint.
    pub fn from_settings(settings: &Settings) -> FetchResult<Self> {
        let transport = HttpTransport::new(
            &settings.base_url,
            settings.request_timeout(),
            &settings.user_agent,
        )?;

        let config = SearchConfig {
            default_page_size: settings.default_page_size,
            backoff: settings.backoff_config(),
            cache: settings.cache_config(),
        };

        Ok(Self::new(Arc::new(transport), config))
    }

    pub fn cache(&self) -> &ResponseCache<NormalizedSearchResult> {
        &self.cache
    }

    /// Search, always returning a well-formed page.
    pub async fn search(&self, params: &SearchParams) -> NormalizedSearchResult {
        self.search_with_source(params).await.result
    }

    /// Search and report where the answer came from.
    pub async fn search_with_source(&self, params: &SearchParams) -> SearchOutcome {
        let key = params.cache_key(self.default_page_size);

        let stale = match self.cache.lookup(&key) {
            Lookup::Fresh(result) => {
                debug!("Cache hit for {}", key);
                return SearchOutcome {
                    result,
                    source: ResultSource::Cache,
                };
            }
            Lookup::Stale(result) => Some(result),
            Lookup::Miss => None,
        };

        let page_request = PageRequest {
            page: params.effective_page(),
            per_page: params.effective_page_size(self.default_page_size),
        };
        let query = params.to_query(self.default_page_size);

        let error = match self
            .backoff
            .run_with_retry(|| self.transport.fetch(&query))
            .await
        {
            Ok(raw) => {
                let result = normalize(&raw, page_request);
                info!(
                    "Search {} returned {} of {} items",
                    key,
                    result.items.len(),
                    result.total
                );
                self.cache.set(key, result.clone());
                return SearchOutcome {
                    result,
                    source: ResultSource::Network,
                };
            }
            Err(e) => e,
        };

        warn!("Search {} failed: {}", key, error);

        if let Some(result) = stale.or_else(|| self.cache.peek_stale(&key)) {
            info!("Serving stale cache entry for {}", key);
            return SearchOutcome {
                result,
                source: ResultSource::StaleExact,
            };
        }

        if let Some((nearby, result)) = self
            .cache
            .find_stale(|candidate| candidate != key && is_nearby(candidate, params))
        {
            info!("Serving nearby cache entry {} for {}", nearby, key);
            return SearchOutcome {
                result,
                source: ResultSource::StaleNearby { key: nearby },
            };
        }

        SearchOutcome {
            result: NormalizedSearchResult::empty(page_request.page, page_request.per_page),
            source: ResultSource::Empty,
        }
    }

    pub async fn stats(&self) -> ServiceStats {
        ServiceStats {
            cache: self.cache.stats(),
            backoff: self.backoff.stats().await,
        }
    }

    pub async fn backoff_stats(&self) -> BackoffStats {
        self.backoff.stats().await
    }

    /// Drop every cached entry and reset cache counters.
    pub fn clear_cache(&self) {
        self.cache.clear();
        info!("Search cache cleared");
    }
}

impl fmt::Debug for SearchService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchService")
            .field("cache", &self.cache)
            .field("backoff", &self.backoff)
            .field("default_page_size", &self.default_page_size)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::http_client::SearchError;
    use crate::models::NormalizedItem;
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    /// Replays scripted responses, then repeats `otherwise` forever.
    struct ScriptedTransport {
        script: Mutex<VecDeque<FetchResult<Value>>>,
        otherwise: FetchResult<Value>,
        calls: AtomicUsize,
        last_query: Mutex<Vec<(&'static str, String)>>,
    }

    impl ScriptedTransport {
        fn always(response: FetchResult<Value>) -> Arc<Self> {
            Self::scripted(Vec::new(), response)
        }

        fn scripted(script: Vec<FetchResult<Value>>, otherwise: FetchResult<Value>) -> Arc<Self> {
            Arc::new(Self {
                script: Mutex::new(script.into()),
                otherwise,
                calls: AtomicUsize::new(0),
                last_query: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl SearchTransport for ScriptedTransport {
        async fn fetch(&self, query: &[(&'static str, String)]) -> FetchResult<Value> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_query.lock().unwrap() = query.to_vec();
            let next = self.script.lock().unwrap().pop_front();
            next.unwrap_or_else(|| self.otherwise.clone())
        }
    }

    fn rate_limited() -> FetchResult<Value> {
        Err(SearchError::RateLimited { status: 429 })
    }

    fn server_error() -> FetchResult<Value> {
        Err(SearchError::Http {
            status: 500,
            message: "Internal Server Error".to_string(),
        })
    }

    fn service(transport: Arc<ScriptedTransport>) -> (SearchService, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new());
        let service = SearchService::with_clock(transport, SearchConfig::default(), clock.clone());
        (service, clock)
    }

    fn page_with(objeto: &str) -> NormalizedSearchResult {
        NormalizedSearchResult {
            items: vec![NormalizedItem {
                objeto_compra: objeto.to_string(),
                ..Default::default()
            }],
            total: 1,
            ..NormalizedSearchResult::empty(1, 10)
        }
    }

    fn expire_everything(clock: &ManualClock) {
        clock.advance(Duration::from_secs(301));
    }

    #[tokio::test]
    async fn test_fresh_cache_hit_skips_network() {
        let transport = ScriptedTransport::always(rate_limited());
        let (service, clock) = service(transport.clone());
        service.cache().set("q=informatica&page=1", page_with("x"));

        let outcome = service
            .search_with_source(&SearchParams::query("informatica"))
            .await;

        assert_eq!(outcome.source, ResultSource::Cache);
        assert_eq!(outcome.result, page_with("x"));
        assert_eq!(transport.calls(), 0);
        assert!(clock.sleeps().is_empty());
        assert_eq!(service.stats().await.backoff.total_requests, 0);
        assert_eq!(service.cache().stats().hits, 1);
    }

    #[tokio::test]
    async fn test_rate_limited_search_degrades_to_empty() {
        let transport = ScriptedTransport::always(rate_limited());
        let (service, _clock) = service(transport.clone());
        let params = SearchParams::query("informatica");

        let outcome = service.search_with_source(&params).await;
        assert_eq!(outcome.source, ResultSource::Empty);
        assert!(outcome.result.is_empty());
        assert_eq!(outcome.result.page.current_page, 1);
        assert_eq!(outcome.result.page.per_page, 10);
        assert_eq!(transport.calls(), 2);
        assert_eq!(service.cache().stats().misses, 1);

        service.search(&params).await;
        service.search(&params).await;

        assert_eq!(transport.calls(), 6);
        assert_eq!(service.cache().stats().misses, 3);
        assert!(service.cache().is_empty());
        assert_eq!(service.backoff_stats().await.attempt, 0);
    }

    #[tokio::test]
    async fn test_success_is_normalized_and_cached() {
        let body = json!({
            "items": [{"numero_controle_pncp": "123", "objeto": "Notebooks"}],
            "total": 1
        });
        let transport = ScriptedTransport::scripted(vec![Ok(body)], rate_limited());
        let (service, _clock) = service(transport.clone());
        let params = SearchParams::query("notebook").with_uf("sp");

        let first = service.search_with_source(&params).await;
        assert_eq!(first.source, ResultSource::Network);
        assert_eq!(first.result.items[0].numero_controle_pncp, "123");

        let second = service.search_with_source(&params).await;
        assert_eq!(second.source, ResultSource::Cache);
        assert_eq!(second.result, first.result);
        assert_eq!(transport.calls(), 1);
        assert_eq!(service.cache().keys(), vec!["q=notebook&uf=SP&page=1"]);

        let query = transport.last_query.lock().unwrap().clone();
        assert!(query.contains(&("uf", "SP".to_string())));
        assert!(query.contains(&("tam_pagina", "10".to_string())));
    }

    #[tokio::test]
    async fn test_explicit_default_page_size_shares_cache_entry() {
        let transport = ScriptedTransport::always(Ok(json!({"items": [], "total": 0})));
        let (service, _clock) = service(transport.clone());

        service.search(&SearchParams::query("obras")).await;
        let outcome = service
            .search_with_source(&SearchParams::query("obras").with_page_size(10))
            .await;

        assert_eq!(outcome.source, ResultSource::Cache);
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn test_separators_in_query_do_not_alias_filters() {
        let transport = ScriptedTransport::always(server_error());
        let (service, _clock) = service(transport.clone());
        service
            .cache()
            .set("q=limpeza&uf=SP&page=1", page_with("filtered by uf"));

        let outcome = service
            .search_with_source(&SearchParams::query("limpeza&uf=SP"))
            .await;

        assert_ne!(outcome.source, ResultSource::Cache);
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn test_stale_exact_entry_preferred_over_nearby() {
        let transport = ScriptedTransport::always(server_error());
        let (service, clock) = service(transport);
        service.cache().set("q=outra&page=1", page_with("nearby"));
        service.cache().set("q=merenda&page=2", page_with("exact"));
        expire_everything(&clock);

        let outcome = service
            .search_with_source(&SearchParams::query("merenda").with_page(2))
            .await;

        assert_eq!(outcome.source, ResultSource::StaleExact);
        assert_eq!(outcome.result, page_with("exact"));
    }

    #[tokio::test]
    async fn test_nearby_first_page_fallback() {
        let transport = ScriptedTransport::always(server_error());
        let (service, clock) = service(transport);
        service.cache().set("q=outra&page=2", page_with("not first page"));
        service.cache().set("q=outra&page=1", page_with("first page"));
        expire_everything(&clock);

        let outcome = service
            .search_with_source(&SearchParams::query("merenda").with_page(3))
            .await;

        assert_eq!(
            outcome.source,
            ResultSource::StaleNearby {
                key: "q=outra&page=1".to_string()
            }
        );
        assert_eq!(outcome.result, page_with("first page"));
    }

    #[tokio::test]
    async fn test_nearby_same_status_fallback() {
        let transport = ScriptedTransport::always(rate_limited());
        let (service, clock) = service(transport);
        service
            .cache()
            .set("status=encerradas&page=4", page_with("other status"));
        service
            .cache()
            .set("status=recebendo_proposta&page=4", page_with("same status"));
        expire_everything(&clock);

        let params = SearchParams::default()
            .with_status("recebendo_proposta")
            .with_page(5);
        let outcome = service.search_with_source(&params).await;

        assert_eq!(outcome.result, page_with("same status"));
        assert!(outcome.source.is_degraded());
    }

    #[tokio::test]
    async fn test_non_transient_error_is_not_retried() {
        let transport = ScriptedTransport::always(server_error());
        let (service, clock) = service(transport.clone());

        let outcome = service
            .search_with_source(&SearchParams::query("x").with_page_size(25))
            .await;

        assert_eq!(outcome.source, ResultSource::Empty);
        assert_eq!(outcome.result.page.per_page, 25);
        assert_eq!(transport.calls(), 1);
        assert!(clock.sleeps().is_empty());
        assert_eq!(service.backoff_stats().await.rate_limit_hits, 0);
    }

    #[tokio::test]
    async fn test_recovers_after_transient_failure() {
        let body = json!({"items": [], "total": 0});
        let transport = ScriptedTransport::scripted(vec![rate_limited()], Ok(body));
        let (service, clock) = service(transport.clone());

        let outcome = service.search_with_source(&SearchParams::default()).await;

        assert_eq!(outcome.source, ResultSource::Network);
        assert_eq!(transport.calls(), 2);
        assert_eq!(clock.sleeps(), vec![Duration::from_secs(15)]);
        assert_eq!(service.cache().len(), 1);
    }

    #[tokio::test]
    async fn test_clear_cache_resets_counters() {
        let transport = ScriptedTransport::always(Ok(json!({"items": []})));
        let (service, _clock) = service(transport);
        service.search(&SearchParams::default()).await;
        service.search(&SearchParams::default()).await;
        assert_eq!(service.stats().await.cache.hits, 1);

        service.clear_cache();

        assert_eq!(service.stats().await.cache, CacheStats::default());
    }
}
