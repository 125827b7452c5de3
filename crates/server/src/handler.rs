//! Route handlers.
//!
//! Each handler validates the query, delegates to [`MetadataService`] and
//! returns its response as JSON.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::{Deserialize, Serialize};

use absmeta_core::{MetadataResponse, MetadataService};

use crate::error::ApiError;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<MetadataService>,
}

impl AppState {
    pub fn new(service: MetadataService) -> Self {
        Self { service: Arc::new(service) }
    }
}

/// Search parameters; `q` wins over `query` when both are present.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    pub query: Option<String>,
}

impl SearchParams {
    /// The effective query, rejecting missing or blank values.
    pub fn query(&self) -> Result<&str, ApiError> {
        [self.q.as_deref(), self.query.as_deref()]
            .into_iter()
            .flatten()
            .find(|q| !q.trim().is_empty())
            .ok_or_else(|| ApiError::InvalidInput("missing query".to_string()))
    }
}

#[derive(Debug, Serialize)]
pub struct ProvidersResponse {
    pub providers: Vec<String>,
}

/// `GET /api/search`: aggregated search across every source.
pub async fn search_all(
    State(state): State<AppState>, Query(params): Query<SearchParams>,
) -> Result<Json<MetadataResponse>, ApiError> {
    let query = params.query()?;
    tracing::info!(query, "handling search request");

    let response = state.service.search_all(query).await?;
    Ok(Json(response))
}

/// `GET /api/:provider/search`: search one provider.
pub async fn search_provider(
    State(state): State<AppState>, Path(provider): Path<String>, Query(params): Query<SearchParams>,
) -> Result<Json<MetadataResponse>, ApiError> {
    let query = params.query()?;
    tracing::info!(provider = %provider, query, "handling single provider search request");

    let response = state.service.search_by_provider(&provider, query).await?;
    Ok(Json(response))
}

/// `GET /api/providers`: registered provider ids.
pub async fn list_providers(State(state): State<AppState>) -> Json<ProvidersResponse> {
    let providers = state.service.providers().into_iter().map(str::to_string).collect();
    Json(ProvidersResponse { providers })
}

/// `GET /health`
pub async fn health() -> &'static str {
    "OK"
}
