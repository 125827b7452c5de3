//! Provider registry assembly.

use std::sync::Arc;

use absmeta_client::DlsiteProvider;
use absmeta_core::{AppConfig, Error, Provider, Registry};

/// Build the registry of every configured source.
///
/// The aggregate (`all`) and fallback (`void`) providers are added by
/// [`Registry::new`].
pub fn build_registry(config: &AppConfig) -> Result<Registry, Error> {
    let dlsite = DlsiteProvider::from_config(config)?;
    tracing::info!(provider = "dlsite", base_url = dlsite.base_url(), "configured source");
    if config.disable_age_check {
        tracing::info!(provider = "dlsite", "age verification cookie enabled");
    }

    let sources: Vec<Arc<dyn Provider>> = vec![Arc::new(dlsite)];
    let registry = Registry::new(sources);

    tracing::info!(providers = ?registry.ids(), "loaded providers");

    Ok(registry)
}
