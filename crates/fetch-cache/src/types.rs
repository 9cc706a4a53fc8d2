//! Cache types

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A cached value together with the time it was stored and its own TTL
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    pub value: V,
    pub stored_at: DateTime<Utc>,
    pub ttl: Duration,
}

impl<V> CacheEntry<V> {
    pub fn new(value: V, ttl: Duration) -> Self {
        Self {
            value,
            stored_at: Utc::now(),
            ttl,
        }
    }

    /// An entry is expired once its age is strictly greater than its TTL.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        let age = now - self.stored_at;
        // A TTL too large for chrono never expires
        match TimeDelta::from_std(self.ttl) {
            Ok(ttl) => age > ttl,
            Err(_) => false,
        }
    }
}

/// Statistics about the cache
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
    pub sweeps: u64,
}
