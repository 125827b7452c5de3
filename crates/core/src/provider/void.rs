//! Fallback provider that never returns matches.

use std::time::Duration;

use async_trait::async_trait;

use super::Provider;
use crate::{BookMetadata, Error};

/// Provider id of the fallback.
pub const VOID_PROVIDER_ID: &str = "void";

/// Answers every query with an empty result set.
///
/// Unknown provider ids resolve here so that "provider not found" never
/// surfaces as a server error.
#[derive(Debug, Default, Clone, Copy)]
pub struct VoidProvider;

impl VoidProvider {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Provider for VoidProvider {
    fn id(&self) -> &str {
        VOID_PROVIDER_ID
    }

    fn cache_ttl(&self) -> Duration {
        Duration::from_secs(24 * 60 * 60)
    }

    async fn search(&self, _query: &str) -> Result<Vec<BookMetadata>, Error> {
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_void_search_is_empty() {
        let provider = VoidProvider::new();
        for query in ["RJ123456", "keyword", ""] {
            let results = provider.search(query).await.unwrap();
            assert!(results.is_empty());
        }
    }

    #[test]
    fn test_void_identity() {
        let provider = VoidProvider::new();
        assert_eq!(provider.id(), "void");
        assert_eq!(provider.cache_ttl(), Duration::from_secs(86_400));
    }
}
