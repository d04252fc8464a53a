//! A single cached value and its freshness window.

use std::time::{Duration, Instant};

/// A cached value with the instant it was written and its TTL.
///
/// Entries are never mutated in place; a fresh `set` replaces them.
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    pub data: T,
    pub timestamp: Instant,
    pub ttl: Duration,
}

impl<T> CacheEntry<T> {
    pub fn new(data: T, timestamp: Instant, ttl: Duration) -> Self {
        Self {
            data,
            timestamp,
            ttl,
        }
    }

    /// Expired once strictly more than `ttl` has passed since the write.
    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.timestamp) > self.ttl
    }
}
