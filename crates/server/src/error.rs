//! HTTP-facing errors for the absmeta server.
//!
//! Request misuse maps to 400; anything the core layer returns maps to 500.
//! Both carry a JSON `{"error": "...", "code": "..."}` body.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Errors surfaced by route handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request was malformed (e.g., missing query).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// The metadata service failed.
    #[error(transparent)]
    Core(#[from] absmeta_core::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ApiError::Core(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-readable code, the same as the message prefix.
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::InvalidInput(_) => "INVALID_INPUT",
            ApiError::Core(e) => e.code(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::warn!(error = %self, "rejected request");
        }

        (status, Json(json!({ "error": self.to_string(), "code": self.code() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use absmeta_core::Error;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::InvalidInput("missing query".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::from(Error::UpstreamFetch("status 404".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(ApiError::from(Error::UpstreamTimeout("slow".into())).status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_code_mapping() {
        assert_eq!(ApiError::InvalidInput("missing query".into()).code(), "INVALID_INPUT");
        assert_eq!(ApiError::from(Error::UpstreamTimeout("slow".into())).code(), "UPSTREAM_TIMEOUT");
    }

    #[test]
    fn test_display_keeps_core_code() {
        let err = ApiError::from(Error::UpstreamParse("bad body".into()));
        assert_eq!(err.to_string(), "UPSTREAM_PARSE: bad body");
    }
}
