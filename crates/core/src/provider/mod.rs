//! Metadata provider contract and the built-in composite providers.
//!
//! Every source of metadata implements [`Provider`]. Two providers ship with
//! the core crate:
//!
//! - [`AllProvider`] fans a query out to several children and merges results.
//! - [`VoidProvider`] always answers with no matches; unknown provider ids
//!   resolve to it.
//!
//! Concrete sources (such as the DLsite scraper) live in `absmeta-client`.

pub mod all;
pub mod registry;
pub mod void;

pub use all::AllProvider;
pub use registry::Registry;
pub use void::VoidProvider;

use std::time::Duration;

use async_trait::async_trait;

use crate::{BookMetadata, Error};

/// A pluggable metadata source.
///
/// Implementations must be safe to call concurrently. Dropping the future
/// returned by [`Provider::search`] cancels any in-flight upstream work.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Stable lowercase identifier; doubles as cache-key namespace and route segment.
    fn id(&self) -> &str;

    /// How long results from this provider stay cached.
    ///
    /// `Duration::ZERO` means "use the service default".
    fn cache_ttl(&self) -> Duration;

    /// Search for works matching `query`.
    async fn search(&self, query: &str) -> Result<Vec<BookMetadata>, Error>;
}
