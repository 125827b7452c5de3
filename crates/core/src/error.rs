//! Unified error types for absmeta.
//!
//! Every upstream failure mode (transport, status, size, decoding) ends up in
//! one of the `Upstream*` variants so callers can treat them alike.

/// Unified error types for the metadata service.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters (e.g., empty query).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// A work identifier did not match the expected format.
    #[error("INVALID_FORMAT: {0}")]
    InvalidFormat(String),

    /// An upstream URL could not be built.
    #[error("INVALID_URL: {0}")]
    InvalidUrl(String),

    /// Transport failure or non-2xx status from an upstream source.
    #[error("UPSTREAM_FETCH: {0}")]
    UpstreamFetch(String),

    /// Upstream request exceeded the client timeout.
    #[error("UPSTREAM_TIMEOUT: {0}")]
    UpstreamTimeout(String),

    /// Upstream response body exceeded the configured byte limit.
    #[error("UPSTREAM_TOO_LARGE: {0}")]
    UpstreamTooLarge(String),

    /// Document was fetched but could not be decoded or parsed.
    #[error("UPSTREAM_PARSE: {0}")]
    UpstreamParse(String),
}

impl Error {
    /// Whether this error originated from talking to an upstream source.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            Error::UpstreamFetch(_) | Error::UpstreamTimeout(_) | Error::UpstreamTooLarge(_) | Error::UpstreamParse(_)
        )
    }

    /// Stable error code used in API responses.
    pub fn code(&self) -> &'static str {
        match self {
            Error::InvalidInput(_) => "INVALID_INPUT",
            Error::InvalidFormat(_) => "INVALID_FORMAT",
            Error::InvalidUrl(_) => "INVALID_URL",
            Error::UpstreamFetch(_) => "UPSTREAM_FETCH",
            Error::UpstreamTimeout(_) => "UPSTREAM_TIMEOUT",
            Error::UpstreamTooLarge(_) => "UPSTREAM_TOO_LARGE",
            Error::UpstreamParse(_) => "UPSTREAM_PARSE",
        }
    }
}
