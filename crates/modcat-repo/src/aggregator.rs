//! Catalog aggregation
//!
//! Drives one refresh end to end:
//! - fetch every enabled repository concurrently, one task each
//! - wait for all of them, then merge the successes in registry order
//! - record `lastSync` for the repositories that loaded
//!
//! A refresh only fails when every dispatched fetch failed. Partial failures
//! come back as diagnostics next to the catalog.
//!
//! Fetching, merging and the `lastSync` update run on a spawned task. A caller
//! that drops the refresh future only discards the outcome; the in-flight
//! fetches finish and their sync timestamps are still recorded.

use chrono::Utc;
use std::sync::Arc;
use tokio::sync::Mutex;

use modcat_core::{MergedCatalog, RawCatalog, Repository};

use crate::error::{FetchError, RepoError, Result, SourceFailure};
use crate::http::CatalogFetcher;
use crate::merge::{DroppedModule, MergeResult, merge_detailed};
use crate::registry::Registry;

/// Registry shared between the caller and refresh tasks
pub type SharedRegistry = Arc<Mutex<Registry>>;

/// Result of a refresh that produced a usable catalog
#[derive(Debug, Clone)]
pub struct RefreshOutcome {
    /// Merged catalog over every repository that loaded
    pub catalog: MergedCatalog,
    /// Repositories that could not be fetched this time
    pub failures: Vec<SourceFailure>,
    /// Modules discarded because an earlier repository published the name
    pub dropped: Vec<DroppedModule>,
    /// URLs of repositories fetched successfully
    pub synced: Vec<String>,
}

impl RefreshOutcome {
    /// Outcome for a registry with nothing enabled
    pub fn empty() -> Self {
        Self {
            catalog: MergedCatalog::empty(),
            failures: Vec::new(),
            dropped: Vec::new(),
            synced: Vec::new(),
        }
    }

    /// Whether some repositories failed while others loaded
    pub fn is_partial(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Coordinates fetching and merging across repositories
#[derive(Clone)]
pub struct Aggregator {
    fetcher: Arc<dyn CatalogFetcher>,
}

impl Aggregator {
    /// Create an aggregator around a fetcher
    pub fn new(fetcher: impl CatalogFetcher + 'static) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
        }
    }

    /// Create an aggregator sharing an existing fetcher
    pub fn with_fetcher(fetcher: Arc<dyn CatalogFetcher>) -> Self {
        Self { fetcher }
    }

    /// Refresh the catalog from every enabled repository
    ///
    /// The registry lock is held only to snapshot the enabled list and to
    /// record sync timestamps, never across the network calls.
    pub async fn refresh(&self, registry: &SharedRegistry) -> Result<RefreshOutcome> {
        let repos = registry.lock().await.enabled_repositories();
        if repos.is_empty() {
            tracing::info!("No enabled repositories, returning empty catalog");
            return Ok(RefreshOutcome::empty());
        }

        tracing::info!(count = repos.len(), "Fetching catalogs");
        let task = tokio::spawn(run_refresh(
            Arc::clone(&self.fetcher),
            Arc::clone(registry),
            repos,
        ));

        match task.await {
            Ok(result) => result,
            Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
            Err(e) => Err(RepoError::RefreshAborted {
                message: e.to_string(),
            }),
        }
    }
}

async fn run_refresh(
    fetcher: Arc<dyn CatalogFetcher>,
    registry: SharedRegistry,
    repos: Vec<Repository>,
) -> Result<RefreshOutcome> {
    let results = fetch_all(&fetcher, &repos).await;

    let mut catalogs = Vec::new();
    let mut synced = Vec::new();
    let mut failures = Vec::new();

    for (repo, result) in repos.iter().zip(results) {
        match result {
            Ok(catalog) => {
                catalogs.push(catalog);
                synced.push(repo.url.clone());
            }
            Err(error) => {
                tracing::warn!(repository = %repo.name, %error, "Failed to fetch catalog");
                failures.push(SourceFailure {
                    name: repo.name.clone(),
                    url: repo.url.clone(),
                    error,
                });
            }
        }
    }

    if catalogs.is_empty() {
        return Err(RepoError::AllSourcesFailed { failures });
    }

    let MergeResult { catalog, dropped } = merge_detailed(&catalogs);

    if let Err(e) = registry.lock().await.mark_synced(&synced, Utc::now()) {
        tracing::warn!(error = %e, "Failed to persist sync timestamps");
    }

    if !failures.is_empty() {
        tracing::warn!(
            failed = failures.len(),
            loaded = synced.len(),
            "Some repositories could not be fetched"
        );
    }

    Ok(RefreshOutcome {
        catalog,
        failures,
        dropped,
        synced,
    })
}

/// Fetch every repository on its own task
///
/// Results are indexed by the position of the repository in `repos`,
/// whatever order the tasks finish in.
async fn fetch_all(
    fetcher: &Arc<dyn CatalogFetcher>,
    repos: &[Repository],
) -> Vec<std::result::Result<RawCatalog, FetchError>> {
    let handles: Vec<_> = repos
        .iter()
        .map(|repo| {
            let fetcher = Arc::clone(fetcher);
            let repo = repo.clone();
            tokio::spawn(async move { fetcher.fetch(&repo).await })
        })
        .collect();

    futures::future::join_all(handles)
        .await
        .into_iter()
        .zip(repos)
        .map(|(joined, repo)| {
            joined.unwrap_or_else(|e| {
                Err(FetchError::NetworkError {
                    url: repo.url.clone(),
                    message: format!("fetch task failed: {}", e),
                })
            })
        })
        .collect()
}
