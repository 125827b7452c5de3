//! HTTP router.

use axum::Router;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use crate::handler::{self, AppState};

/// Build the application router.
///
/// Routes:
/// - `GET /api/search?q=`: aggregated search
/// - `GET /api/:provider/search?q=`: single provider (unknown ids return no matches)
/// - `GET /api/providers`: registered provider ids
/// - `GET /health`: liveness check
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/search", get(handler::search_all))
        .route("/api/providers", get(handler::list_providers))
        .route("/api/:provider/search", get(handler::search_provider))
        .route("/health", get(handler::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use absmeta_core::{BookMetadata, Error, MemoryCache, MetadataService, Provider, Registry};
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::Value;
    use tower::ServiceExt;

    struct FixedProvider {
        id: &'static str,
        titles: Vec<&'static str>,
        fail: bool,
        calls: AtomicUsize,
    }

    impl FixedProvider {
        fn new(id: &'static str, titles: &[&'static str]) -> Self {
            Self { id, titles: titles.to_vec(), fail: false, calls: AtomicUsize::new(0) }
        }

        fn failing(id: &'static str) -> Self {
            Self { fail: true, ..Self::new(id, &[]) }
        }
    }

    #[async_trait]
    impl Provider for FixedProvider {
        fn id(&self) -> &str {
            self.id
        }

        fn cache_ttl(&self) -> Duration {
            Duration::from_secs(60)
        }

        async fn search(&self, query: &str) -> Result<Vec<BookMetadata>, Error> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(Error::UpstreamFetch("status 503".to_string()));
            }
            Ok(self
                .titles
                .iter()
                .map(|title| BookMetadata {
                    title: title.to_string(),
                    author: "Circle".to_string(),
                    isbn: query.to_string(),
                    ..Default::default()
                })
                .collect())
        }
    }

    fn app(sources: Vec<Arc<dyn Provider>>) -> Router {
        let service = MetadataService::new(Arc::new(Registry::new(sources)), Arc::new(MemoryCache::new(100)));
        router(AppState::new(service))
    }

    fn default_app() -> Router {
        let sources: Vec<Arc<dyn Provider>> = vec![
            Arc::new(FixedProvider::new("fixed", &["First", "Second"])),
            Arc::new(FixedProvider::failing("broken")),
        ];
        app(sources)
    }

    async fn get_response(app: Router, uri: &str) -> (StatusCode, Vec<u8>) {
        let response = app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap()).await.unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes().to_vec();
        (status, body)
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let (status, body) = get_response(app, uri).await;
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get_response(default_app(), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"OK");
    }

    #[tokio::test]
    async fn test_providers() {
        let (status, body) = get_json(default_app(), "/api/providers").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["providers"], serde_json::json!(["fixed", "broken", "all", "void"]));
    }

    #[tokio::test]
    async fn test_aggregated_search_skips_failing_provider() {
        let (status, body) = get_json(default_app(), "/api/search?q=RJ123456").await;
        assert_eq!(status, StatusCode::OK);

        let matches = body["matches"].as_array().unwrap();
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0]["title"], "First");
        assert_eq!(matches[0]["isbn"], "RJ123456");
        assert_eq!(matches[0]["explicit"], false);
        assert!(matches[0].get("narrator").is_none(), "empty optional fields are omitted");
    }

    #[tokio::test]
    async fn test_single_provider_search_with_query_param() {
        let (status, body) = get_json(default_app(), "/api/fixed/search?query=hello").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["matches"][1]["title"], "Second");
    }

    #[tokio::test]
    async fn test_unknown_provider_returns_empty_matches() {
        let (status, body) = get_json(default_app(), "/api/nope/search?q=anything").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!({ "matches": [] }));
    }

    #[tokio::test]
    async fn test_missing_query_is_bad_request() {
        for uri in ["/api/search", "/api/search?q=", "/api/fixed/search"] {
            let (status, body) = get_json(default_app(), uri).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "uri {uri}");
            assert!(body["error"].as_str().unwrap().contains("missing query"));
            assert_eq!(body["code"], "INVALID_INPUT");
        }
    }

    #[tokio::test]
    async fn test_provider_failure_is_server_error() {
        let (status, body) = get_json(default_app(), "/api/broken/search?q=x").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].as_str().unwrap().starts_with("UPSTREAM_FETCH"));
        assert_eq!(body["code"], "UPSTREAM_FETCH");
    }

    #[tokio::test]
    async fn test_repeated_search_hits_cache() {
        let provider = Arc::new(FixedProvider::new("fixed", &["Only"]));
        let sources: Vec<Arc<dyn Provider>> = vec![provider.clone() as Arc<dyn Provider>];
        let routes = app(sources);

        for _ in 0..3 {
            let (status, _) = get_json(routes.clone(), "/api/fixed/search?q=same").await;
            assert_eq!(status, StatusCode::OK);
        }
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }
}
