//! Provider routing with read-through caching.
//!
//! ### Flow
//!
//! 1. Resolve the provider id through the [`Registry`] (unknown ids hit the void provider).
//! 2. Look up `resolved_id:query` in the [`MemoryCache`].
//! 3. On a miss, run the provider search and cache the outcome under the provider's TTL.
//!
//! Provider errors are returned unchanged and never cached. Two concurrent
//! misses on the same key both reach the provider; there is no request
//! coalescing.

use std::sync::Arc;
use std::time::Duration;

use crate::provider::all::ALL_PROVIDER_ID;
use crate::{Error, MemoryCache, MetadataResponse, Registry};

/// TTL applied when a provider reports `Duration::ZERO`.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(60 * 60);

/// Routes searches to providers and caches their results.
#[derive(Clone)]
pub struct MetadataService {
    registry: Arc<Registry>,
    cache: Arc<MemoryCache>,
    default_ttl: Duration,
}

impl MetadataService {
    pub fn new(registry: Arc<Registry>, cache: Arc<MemoryCache>) -> Self {
        Self { registry, cache, default_ttl: DEFAULT_CACHE_TTL }
    }

    /// Override the TTL used for providers that do not declare one.
    pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = ttl;
        self
    }

    pub fn cache(&self) -> &Arc<MemoryCache> {
        &self.cache
    }

    /// Ids of every routable provider, in registration order.
    pub fn providers(&self) -> Vec<&str> {
        self.registry.ids()
    }

    /// Search one provider, serving from cache when possible.
    pub async fn search_by_provider(&self, provider_id: &str, query: &str) -> Result<MetadataResponse, Error> {
        let provider = self.registry.resolve(provider_id);
        let key = MemoryCache::key(provider.id(), query);

        if let Some(matches) = self.cache.get(&key).await {
            tracing::debug!(provider = provider.id(), query, count = matches.len(), "cache hit");
            return Ok(MetadataResponse::new(matches));
        }

        tracing::debug!(provider = provider.id(), query, "cache miss");

        let matches = match provider.search(query).await {
            Ok(matches) => matches,
            Err(e) if e.is_upstream() => {
                tracing::warn!(provider = provider.id(), query, error = %e, "upstream search failed");
                return Err(e);
            }
            Err(e) => {
                tracing::error!(provider = provider.id(), query, error = %e, "provider search failed");
                return Err(e);
            }
        };

        let ttl = match provider.cache_ttl() {
            Duration::ZERO => self.default_ttl,
            ttl => ttl,
        };
        self.cache.put(key, matches.clone(), ttl).await;

        tracing::info!(provider = provider.id(), query, count = matches.len(), "search completed");

        Ok(MetadataResponse::new(matches))
    }

    /// Search through the aggregate provider.
    pub async fn search_all(&self, query: &str) -> Result<MetadataResponse, Error> {
        self.search_by_provider(ALL_PROVIDER_ID, query).await
    }
}
