//! Immutable provider registry built once at startup.

use std::sync::Arc;

use super::{AllProvider, Provider, VoidProvider};

/// The set of providers a [`MetadataService`](crate::MetadataService) can route to.
///
/// Contains the concrete sources, an [`AllProvider`] over those sources and
/// the [`VoidProvider`] fallback. There is no way to register providers after
/// construction.
pub struct Registry {
    providers: Vec<Arc<dyn Provider>>,
    fallback: Arc<dyn Provider>,
}

impl Registry {
    /// Build a registry from concrete sources.
    ///
    /// The aggregate and fallback providers are appended automatically, so
    /// `Registry::new(vec![dlsite])` exposes `dlsite`, `all` and `void`.
    pub fn new(sources: Vec<Arc<dyn Provider>>) -> Self {
        let all: Arc<dyn Provider> = Arc::new(AllProvider::new(sources.clone()));
        let fallback: Arc<dyn Provider> = Arc::new(VoidProvider::new());

        let mut providers = sources;
        providers.push(all);
        providers.push(Arc::clone(&fallback));

        Self { providers, fallback }
    }

    /// Find a provider by id, falling back to the void provider.
    pub fn resolve(&self, id: &str) -> Arc<dyn Provider> {
        self.get(id).unwrap_or_else(|| {
            tracing::debug!(provider = id, "unknown provider, using fallback");
            Arc::clone(&self.fallback)
        })
    }

    /// Find a provider by exact id.
    pub fn get(&self, id: &str) -> Option<Arc<dyn Provider>> {
        self.providers.iter().find(|p| p.id() == id).cloned()
    }

    /// Registered provider ids in registration order.
    pub fn ids(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.id()).collect()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}
