use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::models::Coordinate;

/// Process-lifetime geocode cache
///
/// Maps a normalized address to the lookup outcome. `Some(None)` from
/// [`GeocodeCache::get`] means "looked up, no result"; `None` means the
/// address was never looked up. Entries are never evicted, expired or
/// overwritten: the address set is static input data.
pub struct GeocodeCache {
    entries: moka::future::Cache<String, Option<Coordinate>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl GeocodeCache {
    /// Create an empty cache with no capacity bound and no TTL
    pub fn new() -> Self {
        Self {
            entries: moka::future::Cache::builder().build(),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Look up an address
    pub async fn get(&self, address: &str) -> Option<Option<Coordinate>> {
        let key = CacheKey::address(address);
        let entry = self.entries.get(&key).await;

        if entry.is_some() {
            self.hits.fetch_add(1, Ordering::Relaxed);
            tracing::trace!("Geocode cache hit: {}", key);
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
            tracing::trace!("Geocode cache miss: {}", key);
        }

        entry
    }

    /// Record a lookup outcome; an existing entry is kept as is
    pub async fn insert(&self, address: &str, coordinate: Option<Coordinate>) {
        let key = CacheKey::address(address);
        let entry = self
            .entries
            .entry(key)
            .or_insert(coordinate)
            .await;

        if !entry.is_fresh() {
            tracing::debug!("Geocode cache already holds {}", entry.key());
        }
    }

    /// Number of cached addresses
    pub async fn len(&self) -> u64 {
        self.entries.run_pending_tasks().await;
        self.entries.entry_count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Get cache statistics
    pub async fn stats(&self) -> CacheStats {
        let hit_count = self.hits.load(Ordering::Relaxed);
        let miss_count = self.misses.load(Ordering::Relaxed);
        let total = hit_count + miss_count;

        CacheStats {
            size: self.len().await,
            hit_count,
            miss_count,
            hit_rate: if total > 0 {
                hit_count as f64 / total as f64
            } else {
                0.0
            },
        }
    }
}

impl Default for GeocodeCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Cache statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub size: u64,
    pub hit_count: u64,
    pub miss_count: u64,
    pub hit_rate: f64,
}

/// Cache key builder
pub struct CacheKey;

impl CacheKey {
    /// Normalized form of an address: trimmed, whitespace runs collapsed, lowercased
    pub fn address(address: &str) -> String {
        address
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase()
    }
}
