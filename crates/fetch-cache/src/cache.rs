//! TTL-keyed in-memory cache

use crate::types::{CacheEntry, CacheStats};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::debug;

/// TTL for generic cached responses
pub const SHORT_TTL: Duration = Duration::from_secs(15 * 60);
/// TTL for responses built from expensive upstream calls
pub const LONG_TTL: Duration = Duration::from_secs(30 * 60);
/// Entry count above which an insert triggers a sweep of expired entries
pub const DEFAULT_SWEEP_THRESHOLD: usize = 100;

/// An in-memory cache whose entries each carry their own TTL
pub struct FetchCache<V> {
    entries: RwLock<HashMap<String, CacheEntry<V>>>,
    sweep_threshold: usize,
    hits: AtomicU64,
    misses: AtomicU64,
    sweeps: AtomicU64,
}

impl<V: Clone> FetchCache<V> {
    /// Create an empty cache with the default sweep threshold
    pub fn new() -> Self {
        Self::with_sweep_threshold(DEFAULT_SWEEP_THRESHOLD)
    }

    /// Create an empty cache that sweeps once it holds more than `sweep_threshold` entries
    pub fn with_sweep_threshold(sweep_threshold: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            sweep_threshold,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            sweeps: AtomicU64::new(0),
        }
    }

    /// Get a value if present and not expired. Expired entries are removed.
    pub async fn get(&self, key: &str) -> Option<V> {
        let now = Utc::now();

        let expired = {
            let entries = self.entries.read().await;
            match entries.get(key) {
                Some(entry) if !entry.is_expired_at(now) => {
                    self.hits.fetch_add(1, Ordering::Relaxed);
                    debug!(key = %key, "Cache hit");
                    return Some(entry.value.clone());
                }
                Some(_) => true,
                None => false,
            }
        };

        if expired {
            let mut entries = self.entries.write().await;
            // Another writer may have refreshed the key in between
            if entries.get(key).is_some_and(|e| e.is_expired_at(now)) {
                entries.remove(key);
                debug!(key = %key, "Cache entry expired");
            }
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        None
    }

    /// Store a value with the given TTL, replacing any previous entry for the key
    pub async fn put(&self, key: impl Into<String>, value: V, ttl: Duration) {
        let key = key.into();
        let mut entries = self.entries.write().await;

        debug!(key = %key, ttl_secs = ttl.as_secs(), "Cached value");
        entries.insert(key, CacheEntry::new(value, ttl));

        if entries.len() > self.sweep_threshold {
            let now = Utc::now();
            let before = entries.len();
            entries.retain(|_, entry| !entry.is_expired_at(now));
            self.sweeps.fetch_add(1, Ordering::Relaxed);
            debug!(
                removed = before - entries.len(),
                remaining = entries.len(),
                "Swept expired cache entries"
            );
        }
    }

    /// Number of stored entries, expired or not
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Drop every entry. Counters are kept.
    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }

    /// Get current cache statistics
    pub async fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.len().await,
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            sweeps: self.sweeps.load(Ordering::Relaxed),
        }
    }
}

impl<V: Clone> Default for FetchCache<V> {
    fn default() -> Self {
        Self::new()
    }
}
