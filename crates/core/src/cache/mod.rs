//! Volatile in-memory cache for search results.
//!
//! Entries carry an absolute expiry computed at write time. Reads enforce
//! expiry on their own; the background sweeper in [`sweeper`] only reclaims
//! memory. The map is bounded: an insert that pushes it past `max_entries`
//! evicts the entry closest to expiry. This is memory-pressure relief, not
//! an LRU policy.

pub mod sweeper;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::BookMetadata;

/// Longest TTL honoured; larger values are clamped.
const MAX_TTL: Duration = Duration::from_secs(365 * 24 * 60 * 60);

struct CacheEntry {
    records: Vec<BookMetadata>,
    expires_at: Instant,
}

impl CacheEntry {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Thread-safe TTL cache keyed by `provider:query`.
pub struct MemoryCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
    max_entries: usize,
}

impl MemoryCache {
    /// Create an empty cache holding at most `max_entries` entries (minimum 1).
    pub fn new(max_entries: usize) -> Self {
        Self { entries: RwLock::new(HashMap::new()), max_entries: max_entries.max(1) }
    }

    /// Build the cache key for a provider/query pair.
    pub fn key(provider_id: &str, query: &str) -> String {
        format!("{provider_id}:{query}")
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// Cached records for `key`, or `None` if absent or expired.
    pub async fn get(&self, key: &str) -> Option<Vec<BookMetadata>> {
        let entries = self.entries.read().await;
        let now = Instant::now();

        entries
            .get(key)
            .filter(|entry| !entry.is_expired(now))
            .map(|entry| entry.records.clone())
    }

    /// Store `records` under `key` for `ttl`.
    pub async fn put(&self, key: impl Into<String>, records: Vec<BookMetadata>, ttl: Duration) {
        let key = key.into();
        let expires_at = Instant::now() + ttl.min(MAX_TTL);

        let mut entries = self.entries.write().await;
        entries.insert(key.clone(), CacheEntry { records, expires_at });

        if entries.len() > self.max_entries {
            let victim = entries
                .iter()
                .filter(|(k, _)| **k != key)
                .min_by_key(|(_, entry)| entry.expires_at)
                .map(|(k, _)| k.clone());

            if let Some(victim) = victim {
                entries.remove(&victim);
                tracing::debug!(key = %victim, max_entries = self.max_entries, "evicted cache entry on overflow");
            }
        }
    }

    /// Remove every expired entry, returning how many were dropped.
    pub async fn evict_expired(&self) -> usize {
        let mut entries = self.entries.write().await;
        let now = Instant::now();
        let before = entries.len();

        entries.retain(|_, entry| !entry.is_expired(now));

        let evicted = before - entries.len();
        if evicted > 0 {
            tracing::debug!(count = evicted, "evicted expired cache entries");
        }
        evicted
    }

    /// Number of stored entries, expired ones included until swept.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Start the periodic expiry sweep for this cache.
    ///
    /// A zero `interval` is raised to [`sweeper::MIN_SWEEP_INTERVAL`]. See [`sweeper::spawn_sweeper`].
    pub fn spawn_sweeper(self: &Arc<Self>, interval: Duration) -> CancellationToken {
        sweeper::spawn_sweeper(self, interval)
    }
}
