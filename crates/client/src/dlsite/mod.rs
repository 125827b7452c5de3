//! DLsite storefront provider.
//!
//! ### Lookup
//! - Queries that parse as an [`RjCode`] fetch the work page directly.
//! - Everything else runs a keyword search against the listing page, then
//!   enriches each candidate from its work page in parallel.
//!
//! ### URLs
//! - Work page: `{base}/maniax/work/=/product_id/{CODE}.html`
//! - Keyword search: `{base}/maniax/fsr/=/keyword/{form-encoded keyword}`
//!
//! A candidate whose work page cannot be fetched is still returned, built
//! from what the listing showed.

pub mod code;
pub mod listing;
pub mod page;
pub mod work;

pub use code::RjCode;
pub use listing::{Candidate, MAX_CANDIDATES, parse_listing};
pub use page::parse_work_page;
pub use work::Work;

use std::time::Duration;

use async_trait::async_trait;
use tokio::task::JoinSet;

use absmeta_core::{AppConfig, BookMetadata, Error, Provider};

use crate::fetch::{FetchClient, FetchConfig, encode_keyword, parse_base_url};

/// Provider id of the DLsite source.
pub const DLSITE_PROVIDER_ID: &str = "dlsite";

/// DLsite metadata source.
#[derive(Debug, Clone)]
pub struct DlsiteProvider {
    fetch: FetchClient,
    base_url: String,
}

impl DlsiteProvider {
    /// Create a provider talking to `base_url` (e.g. `https://www.dlsite.com`).
    pub fn new(fetch: FetchClient, base_url: &str) -> Result<Self, Error> {
        let base_url = parse_base_url(base_url).map_err(|e| Error::InvalidUrl(e.to_string()))?;
        Ok(Self { fetch, base_url })
    }

    /// Build the provider from application config.
    pub fn from_config(config: &AppConfig) -> Result<Self, Error> {
        let fetch = FetchClient::new(FetchConfig::from(config))?;
        Self::new(fetch, &config.dlsite_base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn work_url(&self, code: &RjCode) -> String {
        format!("{}/maniax/work/=/product_id/{}.html", self.base_url, code)
    }

    pub fn search_url(&self, keyword: &str) -> String {
        format!("{}/maniax/fsr/=/keyword/{}", self.base_url, encode_keyword(keyword))
    }

    /// Fetch and extract a single work page.
    pub async fn get_work(&self, code: &RjCode) -> Result<Work, Error> {
        let url = self.work_url(code);
        let html = self.fetch.fetch_html(&url).await?;
        Ok(parse_work_page(&html, code.clone(), url))
    }

    async fn search_keywords(&self, keyword: &str) -> Result<Vec<BookMetadata>, Error> {
        let html = self.fetch.fetch_html(&self.search_url(keyword)).await?;
        let candidates = parse_listing(&html);

        tracing::debug!(keyword, candidates = candidates.len(), "parsed search listing");

        let mut join_set = JoinSet::new();
        for (idx, candidate) in candidates.iter().enumerate() {
            let Some(code) = candidate.rj_code() else {
                continue;
            };
            let provider = self.clone();
            join_set.spawn(async move { (idx, provider.get_work(&code).await) });
        }

        let mut records: Vec<BookMetadata> = candidates.into_iter().map(Candidate::into_partial_record).collect();

        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((idx, Ok(work))) => records[idx] = work.into_record(),
                Ok((idx, Err(e))) => {
                    tracing::warn!(
                        code = %records[idx].isbn,
                        error = %e,
                        "work page fetch failed, keeping listing data"
                    );
                }
                Err(e) => {
                    tracing::error!(error = %e, "work enrichment task did not complete");
                }
            }
        }

        Ok(records)
    }
}

#[async_trait]
impl Provider for DlsiteProvider {
    fn id(&self) -> &str {
        DLSITE_PROVIDER_ID
    }

    fn cache_ttl(&self) -> Duration {
        Duration::from_secs(24 * 60 * 60)
    }

    async fn search(&self, query: &str) -> Result<Vec<BookMetadata>, Error> {
        match RjCode::parse(query) {
            Ok(code) => {
                tracing::debug!(code = %code, "looking up work by product code");
                let work = self.get_work(&code).await?;
                Ok(vec![work.into_record()])
            }
            Err(_) => self.search_keywords(query).await,
        }
    }
}
