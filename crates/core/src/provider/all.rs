//! Aggregating provider.
//!
//! Queries every child provider in parallel on a `JoinSet` and merges the
//! results. A failing child is logged and skipped; the aggregate search
//! itself only fails if the caller cancels it (by dropping the future, which
//! aborts every child task).

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::task::JoinSet;

use super::Provider;
use crate::{BookMetadata, Error};

/// Provider id of the aggregate.
pub const ALL_PROVIDER_ID: &str = "all";

/// Fans a query out to several providers and concatenates their matches.
///
/// Matches are returned grouped by child, in child registration order,
/// regardless of which child finished first.
pub struct AllProvider {
    providers: Vec<Arc<dyn Provider>>,
}

impl AllProvider {
    pub fn new(providers: Vec<Arc<dyn Provider>>) -> Self {
        Self { providers }
    }
}

#[async_trait]
impl Provider for AllProvider {
    fn id(&self) -> &str {
        ALL_PROVIDER_ID
    }

    fn cache_ttl(&self) -> Duration {
        Duration::from_secs(60 * 60)
    }

    async fn search(&self, query: &str) -> Result<Vec<BookMetadata>, Error> {
        tracing::info!(query, providers_count = self.providers.len(), "starting aggregated search");

        let mut join_set = JoinSet::new();

        for (idx, provider) in self.providers.iter().enumerate() {
            let provider = Arc::clone(provider);
            let query = query.to_string();

            join_set.spawn(async move {
                let result = provider.search(&query).await;
                (idx, provider.id().to_string(), result)
            });
        }

        let mut collected: Vec<(usize, Vec<BookMetadata>)> = Vec::with_capacity(self.providers.len());

        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((idx, _, Ok(matches))) => collected.push((idx, matches)),
                Ok((_, provider, Err(e))) => {
                    tracing::error!(provider = %provider, error = %e, "provider search failed in aggregate");
                }
                Err(e) => {
                    tracing::error!(error = %e, "provider task did not complete in aggregate");
                }
            }
        }

        collected.sort_by_key(|(idx, _)| *idx);

        let merged: Vec<BookMetadata> = collected.into_iter().flat_map(|(_, matches)| matches).collect();

        tracing::debug!(query, count = merged.len(), "aggregated search completed");

        Ok(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::testing::{StaticProvider, titles};

    fn arc(provider: StaticProvider) -> Arc<dyn Provider> {
        Arc::new(provider)
    }

    #[tokio::test]
    async fn test_merges_all_children() {
        let all = AllProvider::new(vec![
            arc(StaticProvider::new("a", &["A1", "A2"])),
            arc(StaticProvider::new("b", &["B1"])),
        ]);

        let results = all.search("query").await.unwrap();
        assert_eq!(titles(&results), vec!["A1", "A2", "B1"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_merge_order_follows_registration_not_completion() {
        let all = AllProvider::new(vec![
            arc(StaticProvider::new("slow", &["Slow"]).with_delay(Duration::from_secs(5))),
            arc(StaticProvider::new("fast", &["Fast"])),
        ]);

        let results = all.search("query").await.unwrap();
        assert_eq!(titles(&results), vec!["Slow", "Fast"]);
    }

    #[tokio::test]
    async fn test_partial_failure_returns_union_of_successes() {
        let all = AllProvider::new(vec![
            arc(StaticProvider::new("ok1", &["One"])),
            arc(StaticProvider::failing("bad1", "status 500")),
            arc(StaticProvider::new("ok2", &["Two", "Three"])),
            arc(StaticProvider::failing("bad2", "connection refused")),
        ]);

        let results = all.search("query").await.unwrap();
        assert_eq!(titles(&results), vec!["One", "Two", "Three"]);
    }

    #[tokio::test]
    async fn test_every_child_failing_is_still_success() {
        let all = AllProvider::new(vec![
            arc(StaticProvider::failing("bad1", "boom")),
            arc(StaticProvider::failing("bad2", "boom")),
        ]);

        let results = all.search("query").await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_no_children() {
        let all = AllProvider::new(Vec::new());
        assert!(all.search("query").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_children_run_once_each() {
        let a = Arc::new(StaticProvider::new("a", &["A"]));
        let b = Arc::new(StaticProvider::new("b", &["B"]));
        let children: Vec<Arc<dyn Provider>> = vec![a.clone(), b.clone()];
        let all = AllProvider::new(children);

        all.search("query").await.unwrap();
        assert_eq!(a.calls(), 1);
        assert_eq!(b.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_caller_deadline_cancels_aggregate() {
        let all = AllProvider::new(vec![
            arc(StaticProvider::new("fast", &["Fast"])),
            arc(StaticProvider::new("stuck", &["Stuck"]).with_delay(Duration::from_secs(600))),
        ]);

        let result = tokio::time::timeout(Duration::from_secs(1), all.search("query")).await;
        assert!(result.is_err(), "partial results must not be returned after cancellation");
    }

    #[test]
    fn test_identity() {
        let all = AllProvider::new(vec![arc(StaticProvider::new("a", &[])), arc(StaticProvider::new("b", &[]))]);
        assert_eq!(all.id(), "all");
        assert_eq!(all.cache_ttl(), Duration::from_secs(3600));
    }
}
