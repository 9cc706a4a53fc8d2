//! In-memory fetch cache with per-entry TTL expiration
//!
//! Stores cloned values under string keys. Expired entries are dropped lazily
//! on lookup, and a full sweep runs whenever an insert pushes the entry count
//! past the sweep threshold. There is no recency-based eviction.

mod cache;
mod types;

pub use cache::{FetchCache, DEFAULT_SWEEP_THRESHOLD, LONG_TTL, SHORT_TTL};
pub use types::{CacheEntry, CacheStats};
