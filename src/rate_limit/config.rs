//! Backoff controller configuration and types.

use std::time::Duration;

use serde::Serialize;

/// Minimum spacing between consecutive upstream calls.
pub const DEFAULT_MIN_INTERVAL: Duration = Duration::from_secs(5);

/// First backoff step after a rate-limit response.
pub const DEFAULT_BACKOFF_BASE: Duration = Duration::from_secs(15);

/// Retries after the first attempt (2 attempts in total).
pub const DEFAULT_MAX_RETRIES: u32 = 1;

/// Configuration for request spacing and retry behavior.
#[derive(Debug, Clone)]
pub struct BackoffConfig {
    /// Wait between calls while no failure is pending.
    pub min_interval: Duration,
    /// Wait before the first retry; doubles on each further retry.
    pub backoff_base: Duration,
    /// Retries allowed before giving up.
    pub max_retries: u32,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            min_interval: DEFAULT_MIN_INTERVAL,
            backoff_base: DEFAULT_BACKOFF_BASE,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

/// Snapshot of the controller for operator panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BackoffStats {
    pub attempt: u32,
    pub max_retries: u32,
    pub total_requests: u64,
    pub rate_limit_hits: u64,
    pub current_wait_ms: u64,
}
