//! Request spacing and retry for the upstream search API.
//!
//! Enforces a minimum interval between calls and switches to exponential
//! backoff after rate-limit responses, bounded by a retry ceiling. The
//! upstream API rate limits aggressively, so the defaults are conservative.

mod config;
mod state;

pub use config::{
    BackoffConfig, BackoffStats, DEFAULT_BACKOFF_BASE, DEFAULT_MAX_RETRIES, DEFAULT_MIN_INTERVAL,
};
pub use state::BackoffState;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::clock::{Clock, SystemClock};
use crate::http_client::{FetchResult, SearchError};

/// Spacing and retry controller. One per orchestrator.
#[derive(Debug)]
pub struct BackoffController {
    config: BackoffConfig,
    clock: Arc<dyn Clock>,
    state: Mutex<BackoffState>,
}

impl BackoffController {
    /// Create a controller with default config on the system clock.
    pub fn new() -> Self {
        Self::with_config(BackoffConfig::default(), Arc::new(SystemClock))
    }

    /// Create a controller with custom config and clock.
    pub fn with_config(config: BackoffConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            config,
            clock,
            state: Mutex::new(BackoffState::new()),
        }
    }

    /// Suspend until the current wait has elapsed since the last call, then
    /// mark a new call as released.
    ///
    /// The state lock is held across the wait so concurrent callers are
    /// released one at a time, each a full interval after the previous one.
    pub async fn wait_for_next_slot(&self) {
        let mut state = self.state.lock().await;
        let wait = state.current_wait(self.config.min_interval, self.config.backoff_base);
        let remaining = state.time_until_ready(self.clock.now(), wait);

        if remaining > Duration::ZERO {
            debug!(
                "Rate limiting search API: waiting {:?} (attempt {})",
                remaining, state.retry_attempt
            );
            self.clock.sleep(remaining).await;
        }

        state.last_request = Some(self.clock.now());
        state.total_requests += 1;
    }

    /// Run `operation` with spacing and retry.
    ///
    /// Rate-limit failures are retried while the attempt counter stays within
    /// `max_retries`, then `RetryExhausted` is returned. Other errors are
    /// returned at once without consuming a retry.
    pub async fn run_with_retry<T, F, Fut>(&self, mut operation: F) -> FetchResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = FetchResult<T>>,
    {
        loop {
            self.wait_for_next_slot().await;

            match operation().await {
                Ok(value) => {
                    self.state.lock().await.retry_attempt = 0;
                    return Ok(value);
                }
                Err(e) if e.is_transient() => {
                    let mut state = self.state.lock().await;
                    state.retry_attempt += 1;
                    state.rate_limit_hits += 1;

                    if state.retry_attempt > self.config.max_retries {
                        let attempts = state.retry_attempt;
                        state.retry_attempt = 0;
                        warn!(
                            "Search API still rate limited after {} attempts, giving up",
                            attempts
                        );
                        return Err(SearchError::RetryExhausted { attempts });
                    }

                    warn!(
                        "{}, backing off to {:?}",
                        e,
                        state.current_wait(self.config.min_interval, self.config.backoff_base)
                    );
                }
                Err(e) => {
                    self.state.lock().await.retry_attempt = 0;
                    return Err(e);
                }
            }
        }
    }

    /// Wait that applies to the next call.
    pub async fn current_wait(&self) -> Duration {
        self.state
            .lock()
            .await
            .current_wait(self.config.min_interval, self.config.backoff_base)
    }

    pub async fn stats(&self) -> BackoffStats {
        let state = self.state.lock().await;
        BackoffStats {
            attempt: state.retry_attempt,
            max_retries: self.config.max_retries,
            total_requests: state.total_requests,
            rate_limit_hits: state.rate_limit_hits,
            current_wait_ms: state
                .current_wait(self.config.min_interval, self.config.backoff_base)
                .as_millis() as u64,
        }
    }
}

impl Default for BackoffController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn controller(max_retries: u32) -> (BackoffController, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new());
        let controller = BackoffController::with_config(
            BackoffConfig {
                min_interval: Duration::from_secs(5),
                backoff_base: Duration::from_secs(15),
                max_retries,
            },
            clock.clone(),
        );
        (controller, clock)
    }

    #[tokio::test]
    async fn test_min_interval_between_calls() {
        let (limiter, clock) = controller(1);

        limiter.wait_for_next_slot().await;
        limiter.wait_for_next_slot().await;
        clock.advance(Duration::from_secs(7));
        limiter.wait_for_next_slot().await;

        assert_eq!(clock.sleeps(), vec![Duration::from_secs(5)]);
        assert_eq!(limiter.stats().await.total_requests, 3);
    }

    #[tokio::test]
    async fn test_backoff_doubles_until_exhausted() {
        let (limiter, clock) = controller(3);
        let calls = AtomicU32::new(0);

        let result: FetchResult<()> = limiter
            .run_with_retry(|| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(SearchError::RateLimited { status: 429 }) }
            })
            .await;

        assert_eq!(result, Err(SearchError::RetryExhausted { attempts: 4 }));
        assert_eq!(calls.load(Ordering::SeqCst), 4);
        assert_eq!(
            clock.sleeps(),
            vec![
                Duration::from_secs(15),
                Duration::from_secs(30),
                Duration::from_secs(60),
            ]
        );
        assert_eq!(limiter.stats().await.attempt, 0);
        assert_eq!(limiter.stats().await.rate_limit_hits, 4);
    }

    #[tokio::test]
    async fn test_default_ceiling_allows_two_attempts() {
        let (limiter, _clock) = controller(DEFAULT_MAX_RETRIES);
        let calls = AtomicU32::new(0);

        let result: FetchResult<()> = limiter
            .run_with_retry(|| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(SearchError::RateLimited { status: 429 }) }
            })
            .await;

        assert!(matches!(result, Err(SearchError::RetryExhausted { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_success_resets_attempt() {
        let (limiter, clock) = controller(3);
        let calls = AtomicU32::new(0);

        let result = limiter
            .run_with_retry(|| {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n == 0 {
                        Err(SearchError::RateLimited { status: 429 })
                    } else {
                        Ok(n)
                    }
                }
            })
            .await;

        assert_eq!(result, Ok(1));
        assert_eq!(limiter.stats().await.attempt, 0);
        assert_eq!(limiter.current_wait().await, Duration::from_secs(5));

        // Next call is spaced by the normal interval again
        limiter.wait_for_next_slot().await;
        assert_eq!(
            clock.sleeps(),
            vec![Duration::from_secs(15), Duration::from_secs(5)]
        );
    }

    #[tokio::test]
    async fn test_non_transient_error_is_not_retried() {
        let (limiter, clock) = controller(3);
        let calls = AtomicU32::new(0);

        let result: FetchResult<()> = limiter
            .run_with_retry(|| {
                calls.fetch_add(1, Ordering::SeqCst);
                async {
                    Err(SearchError::Http {
                        status: 500,
                        message: "boom".to_string(),
                    })
                }
            })
            .await;

        assert!(matches!(result, Err(SearchError::Http { status: 500, .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(clock.sleeps().is_empty());
        assert_eq!(limiter.stats().await.rate_limit_hits, 0);
    }
}
