//! HTTP fetch pipeline for upstream storefront pages.
//!
//! ### Request shaping
//! - Fixed browser-like User-Agent (configurable)
//! - Optional `adult_checked=1` cookie to skip the DLsite age gate
//! - Max redirects: 5
//!
//! ### Failure mapping
//! - Transport errors and non-2xx statuses -> `Error::UpstreamFetch`
//! - Client-level timeout -> `Error::UpstreamTimeout`
//! - Bodies over `max_bytes` -> `Error::UpstreamTooLarge`
//! - Non UTF-8 bodies -> `Error::UpstreamParse`

pub mod url;

use bytes::Bytes;
use reqwest::{Client, header};
use std::time::{Duration, Instant};

pub use self::url::{UrlError, encode_keyword, normalize_image_url, parse_base_url};

use absmeta_core::{AppConfig, Error};

/// Cookie that marks the DLsite age gate as already passed.
pub const AGE_CHECK_COOKIE: &str = "adult_checked=1";

/// Configuration for the fetch client.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// User agent string (default: desktop Chrome)
    pub user_agent: String,

    /// Maximum response body size in bytes (default: 5MB)
    pub max_bytes: usize,

    /// Request timeout (default: 30s)
    pub timeout: Duration,

    /// Maximum number of redirects to follow (default: 5)
    pub max_redirects: usize,

    /// Send the age-verification cookie (default: false)
    pub send_age_cookie: bool,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: AppConfig::default().user_agent,
            max_bytes: 5 * 1024 * 1024,
            timeout: Duration::from_secs(30),
            max_redirects: 5,
            send_age_cookie: false,
        }
    }
}

impl From<&AppConfig> for FetchConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            user_agent: config.user_agent.clone(),
            max_bytes: config.max_bytes,
            timeout: config.timeout(),
            send_age_cookie: config.disable_age_check,
            ..Default::default()
        }
    }
}

/// A successfully fetched page.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    /// The URL requested
    pub url: String,
    /// Response body bytes
    pub bytes: Bytes,
}

impl FetchResponse {
    /// Decode the body as UTF-8 HTML.
    pub fn into_html(self) -> Result<String, Error> {
        String::from_utf8(self.bytes.to_vec())
            .map_err(|e| Error::UpstreamParse(format!("{} is not valid UTF-8: {}", self.url, e)))
    }
}

/// HTTP client shared by every request a provider makes.
///
/// Cloning is cheap; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct FetchClient {
    http: Client,
    config: FetchConfig,
}

impl FetchClient {
    /// Create a new fetch client with the given configuration.
    pub fn new(config: FetchConfig) -> Result<Self, Error> {
        let http = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| Error::UpstreamFetch(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { http, config })
    }

    /// Fetch a URL, returning raw bytes and metadata.
    ///
    /// Any status other than 2xx is an error.
    pub async fn fetch(&self, url: &str) -> Result<FetchResponse, Error> {
        let start = Instant::now();

        let mut request = self
            .http
            .get(url)
            .header(header::ACCEPT, "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8");

        if self.config.send_age_cookie {
            request = request.header(header::COOKIE, AGE_CHECK_COOKIE);
        }

        let response = request.send().await.map_err(|e| map_transport_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::UpstreamFetch(format!("{} returned status {}", url, status.as_u16())));
        }

        if let Some(len) = response.content_length()
            && len as usize > self.config.max_bytes
        {
            return Err(Error::UpstreamTooLarge(format!("{} bytes exceeds {}", len, self.config.max_bytes)));
        }

        let bytes = response.bytes().await.map_err(|e| map_transport_error(url, e))?;

        if bytes.len() > self.config.max_bytes {
            return Err(Error::UpstreamTooLarge(format!(
                "{} bytes exceeds {}",
                bytes.len(),
                self.config.max_bytes
            )));
        }

        let fetch_ms = start.elapsed().as_millis() as u64;

        tracing::debug!("fetched {} in {}ms ({} bytes)", url, fetch_ms, bytes.len());

        Ok(FetchResponse { url: url.to_string(), bytes })
    }

    /// Fetch a URL and decode the body as HTML text.
    pub async fn fetch_html(&self, url: &str) -> Result<String, Error> {
        self.fetch(url).await?.into_html()
    }
}

fn map_transport_error(url: &str, e: reqwest::Error) -> Error {
    if e.is_timeout() {
        Error::UpstreamTimeout(format!("{}: {}", url, e))
    } else {
        Error::UpstreamFetch(format!("network error for {}: {}", url, e))
    }
}
