//! Bounded TTL cache for normalized search results.
//!
//! Entries expire lazily: an expired entry is only dropped when `get` or
//! `has` finds it. When the cache is full the oldest-inserted key is evicted
//! (FIFO, reads never reorder). Expired entries that have not been touched
//! by `get` stay available to the stale fallback path via `peek_stale` and
//! `find_stale`.

mod entry;

pub use entry::CacheEntry;

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use serde::Serialize;
use tracing::debug;

use crate::clock::{Clock, SystemClock};

/// Default TTL for cached search results (5 minutes).
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// Default maximum number of cached queries.
pub const DEFAULT_MAX_ENTRIES: usize = 100;

/// Cache sizing and freshness configuration.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL applied by `set`.
    pub default_ttl: Duration,
    /// Upper bound on stored entries.
    pub max_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            default_ttl: DEFAULT_TTL,
            max_entries: DEFAULT_MAX_ENTRIES,
        }
    }
}

/// Counters accumulated since construction or the last `clear`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub size: usize,
    pub hits: u64,
    pub misses: u64,
    pub sets: u64,
}

/// Result of a freshness check that keeps expired entries around.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<T> {
    Fresh(T),
    Stale(T),
    Miss,
}

#[derive(Debug)]
struct Inner<T> {
    entries: HashMap<String, CacheEntry<T>>,
    /// Insertion order of live keys, oldest first.
    order: VecDeque<String>,
    hits: u64,
    misses: u64,
    sets: u64,
}

impl<T> Inner<T> {
    fn new() -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            hits: 0,
            misses: 0,
            sets: 0,
        }
    }

    fn remove(&mut self, key: &str) -> bool {
        if self.entries.remove(key).is_some() {
            self.order.retain(|k| k != key);
            true
        } else {
            false
        }
    }
}

/// TTL cache keyed by serialized query parameters.
#[derive(Debug)]
pub struct ResponseCache<T> {
    config: CacheConfig,
    clock: Arc<dyn Clock>,
    inner: Mutex<Inner<T>>,
}

impl<T: Clone> ResponseCache<T> {
    /// Create a cache with default config on the system clock.
    pub fn new() -> Self {
        Self::with_config(CacheConfig::default(), Arc::new(SystemClock))
    }

    /// Create a cache with custom config and clock.
    pub fn with_config(config: CacheConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            config,
            clock,
            inner: Mutex::new(Inner::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner<T>> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Get a fresh value. An expired entry is evicted and reported as a miss.
    pub fn get(&self, key: &str) -> Option<T> {
        let now = self.clock.now();
        let mut inner = self.lock();

        let found = inner
            .entries
            .get(key)
            .map(|entry| (entry.is_expired(now), entry.data.clone()));

        match found {
            Some((false, data)) => {
                inner.hits += 1;
                Some(data)
            }
            Some((true, _)) => {
                inner.remove(key);
                inner.misses += 1;
                debug!("Cache entry expired: {}", key);
                None
            }
            None => {
                inner.misses += 1;
                None
            }
        }
    }

    /// Freshness check that does not evict. Counts one hit or one miss;
    /// a stale entry counts as a miss but its value is still returned.
    pub fn lookup(&self, key: &str) -> Lookup<T> {
        let now = self.clock.now();
        let mut inner = self.lock();

        let found = inner
            .entries
            .get(key)
            .map(|entry| (entry.is_expired(now), entry.data.clone()));

        match found {
            Some((false, data)) => {
                inner.hits += 1;
                Lookup::Fresh(data)
            }
            Some((true, data)) => {
                inner.misses += 1;
                Lookup::Stale(data)
            }
            None => {
                inner.misses += 1;
                Lookup::Miss
            }
        }
    }

    /// Insert with the default TTL.
    pub fn set(&self, key: impl Into<String>, value: T) {
        self.set_with_ttl(key, value, self.config.default_ttl);
    }

    /// Insert or overwrite. Overwriting keeps the key's insertion position;
    /// a new key at capacity evicts the oldest-inserted key first.
    pub fn set_with_ttl(&self, key: impl Into<String>, value: T, ttl: Duration) {
        let key = key.into();
        let now = self.clock.now();
        let capacity = self.config.max_entries.max(1);
        let mut inner = self.lock();

        if !inner.entries.contains_key(&key) {
            while inner.entries.len() >= capacity {
                match inner.order.pop_front() {
                    Some(oldest) => {
                        inner.entries.remove(&oldest);
                        debug!("Cache full, evicted oldest entry: {}", oldest);
                    }
                    None => break,
                }
            }
            inner.order.push_back(key.clone());
        }

        inner.entries.insert(key, CacheEntry::new(value, now, ttl));
        inner.sets += 1;
    }

    /// Same freshness rule as `get`, without returning the value or
    /// touching the counters.
    pub fn has(&self, key: &str) -> bool {
        let now = self.clock.now();
        let mut inner = self.lock();

        match inner.entries.get(key).map(|e| e.is_expired(now)) {
            Some(false) => true,
            Some(true) => {
                inner.remove(key);
                false
            }
            None => false,
        }
    }

    /// Remove a key. Returns whether it was present.
    pub fn delete(&self, key: &str) -> bool {
        self.lock().remove(key)
    }

    /// Drop every entry and reset the counters.
    pub fn clear(&self) {
        *self.lock() = Inner::new();
    }

    pub fn stats(&self) -> CacheStats {
        let inner = self.lock();
        CacheStats {
            size: inner.entries.len(),
            hits: inner.hits,
            misses: inner.misses,
            sets: inner.sets,
        }
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Value for `key` ignoring TTL. Counters are untouched.
    pub fn peek_stale(&self, key: &str) -> Option<T> {
        self.lock().entries.get(key).map(|e| e.data.clone())
    }

    /// First entry, in insertion order, whose key satisfies `predicate`,
    /// ignoring TTL.
    pub fn find_stale<F>(&self, predicate: F) -> Option<(String, T)>
    where
        F: Fn(&str) -> bool,
    {
        let inner = self.lock();
        inner
            .order
            .iter()
            .find(|key| predicate(key))
            .and_then(|key| {
                inner
                    .entries
                    .get(key)
                    .map(|entry| (key.clone(), entry.data.clone()))
            })
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> Vec<String> {
        self.lock().order.iter().cloned().collect()
    }
}

impl<T: Clone> Default for ResponseCache<T> {
    fn default() -> Self {
        Self::new()
    }
}
