//! Catalog service
//!
//! The single handle UI collaborators talk to: registry management plus the
//! combined catalog refresh. One instance per session, owned by the caller.

use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};

use modcat_core::{MergedCatalog, Repository};

use crate::aggregator::{Aggregator, RefreshOutcome, SharedRegistry};
use crate::config::Settings;
use crate::error::Result;
use crate::http::{CatalogFetcher, HttpFetcher};
use crate::registry::Registry;
use crate::storage::{FileStore, KeyValueStore};

/// Registry and aggregator behind one explicitly owned handle
pub struct CatalogService {
    registry: SharedRegistry,
    aggregator: Aggregator,
}

impl CatalogService {
    /// Assemble a service from its parts
    pub fn new(registry: Registry, aggregator: Aggregator) -> Self {
        Self {
            registry: Arc::new(Mutex::new(registry)),
            aggregator,
        }
    }

    /// Build the default service: HTTP fetcher, file storage, `MODULES_REPO`
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let store = match &settings.store_dir {
            Some(dir) => FileStore::new(dir.clone()),
            None => FileStore::open_default()?,
        };
        tracing::debug!(dir = %store.dir().display(), "Using repository store");

        let fetcher = HttpFetcher::from_settings(settings)?;
        Self::open(store, fetcher)
    }

    /// Build a service over any store and fetcher
    pub fn open(
        store: impl KeyValueStore + 'static,
        fetcher: impl CatalogFetcher + 'static,
    ) -> Result<Self> {
        let registry = Registry::load(store)?;
        Ok(Self::new(registry, Aggregator::new(fetcher)))
    }

    /// Lock the registry
    pub async fn registry(&self) -> MutexGuard<'_, Registry> {
        self.registry.lock().await
    }

    /// All repositories
    pub async fn repositories(&self) -> Vec<Repository> {
        self.registry.lock().await.repositories()
    }

    /// Add a repository
    pub async fn add_repository(&self, name: &str, url: &str) -> Result<Repository> {
        self.registry.lock().await.add_repository(name, url)
    }

    /// Remove a repository
    pub async fn remove_repository(&self, url: &str) -> Result<()> {
        self.registry.lock().await.remove_repository(url)
    }

    /// Enable or disable a repository
    pub async fn toggle_repository(&self, url: &str, enabled: bool) -> Result<()> {
        self.registry.lock().await.toggle_repository(url, enabled)
    }

    /// Refresh and return the catalog with its diagnostics
    pub async fn refresh(&self) -> Result<RefreshOutcome> {
        self.aggregator.refresh(&self.registry).await
    }

    /// Refresh and return only the merged catalog
    ///
    /// Fails only when every enabled repository failed.
    pub async fn fetch_combined_catalog(&self) -> Result<MergedCatalog> {
        let outcome = self.refresh().await?;
        for failure in &outcome.failures {
            tracing::warn!(%failure, "Repository unreachable");
        }
        Ok(outcome.catalog)
    }
}
