//! Repository registry
//!
//! Resolves the effective repository list from three layers:
//!
//! 1. **Environment** (`MODULES_REPO`): read once, never written back
//! 2. **Persisted**: the user's list under [`STORAGE_KEY`]; entries whose URL
//!    is already provided by the environment are dropped
//! 3. **Built-in default**: seeded only when neither layer has ever existed
//!
//! A user who removes every repository keeps an empty list: the persisted
//! key still exists, so the default is not seeded again.

use chrono::{DateTime, Utc};
use std::collections::HashSet;

use modcat_core::Repository;

use crate::config::{DEFAULT_REPO_NAME, DEFAULT_REPO_URL, STORAGE_KEY, environment_repositories};
use crate::error::{RepoError, Result};
use crate::storage::KeyValueStore;

/// Load result of one configuration layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayerState {
    /// The layer has never been provided
    Absent,
    /// Provided, but holds no repositories
    Empty,
    /// Provided with at least one repository
    Entries(Vec<Repository>),
}

impl LayerState {
    /// Parse a raw layer value (a JSON array of repositories)
    ///
    /// A malformed value still counts as provided: it is logged and treated
    /// as empty.
    pub fn parse(raw: Option<&str>, layer: &str) -> Self {
        let Some(raw) = raw else {
            return LayerState::Absent;
        };

        match serde_json::from_str::<Vec<Repository>>(raw) {
            Ok(repos) if repos.is_empty() => LayerState::Empty,
            Ok(repos) => LayerState::Entries(repos),
            Err(e) => {
                tracing::error!(layer, error = %e, "Failed to parse repository list");
                LayerState::Empty
            }
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, LayerState::Absent)
    }

    /// Repositories held by the layer
    pub fn into_entries(self) -> Vec<Repository> {
        match self {
            LayerState::Entries(repos) => repos,
            LayerState::Absent | LayerState::Empty => Vec::new(),
        }
    }
}

/// The effective, persisted list of catalog repositories
///
/// One instance per session. Mutations go through `&mut self`, so the
/// read-modify-persist sequence cannot interleave.
pub struct Registry {
    repos: Vec<Repository>,
    env_urls: HashSet<String>,
    store: Box<dyn KeyValueStore>,
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("repos", &self.repos)
            .field("env_urls", &self.env_urls)
            .finish_non_exhaustive()
    }
}

impl Registry {
    /// Load the registry, reading the environment layer from `MODULES_REPO`
    pub fn load(store: impl KeyValueStore + 'static) -> Result<Self> {
        Self::load_with_env(store, environment_repositories())
    }

    /// Load the registry with an explicit environment value
    pub fn load_with_env(
        store: impl KeyValueStore + 'static,
        env_value: Option<String>,
    ) -> Result<Self> {
        // An empty variable is the same as an unset one
        let env_value = env_value.filter(|v| !v.trim().is_empty());
        let env_layer = LayerState::parse(env_value.as_deref(), "environment");

        let stored = store.get(STORAGE_KEY)?;
        let persisted_layer = LayerState::parse(stored.as_deref(), "persisted");

        let never_configured = env_layer.is_absent() && persisted_layer.is_absent();

        let mut repos: Vec<Repository> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();

        let env_repos = dedup_by_url(env_layer.into_entries(), &mut seen);
        let env_urls: HashSet<String> = env_repos.iter().map(|r| r.url.clone()).collect();
        if !env_repos.is_empty() {
            tracing::info!(count = env_repos.len(), "Loaded repositories from environment");
        }
        repos.extend(env_repos);

        let user_repos = dedup_by_url(persisted_layer.into_entries(), &mut seen);
        if !user_repos.is_empty() {
            tracing::info!(count = user_repos.len(), "Loaded repositories from storage");
        }
        repos.extend(user_repos);

        let mut registry = Self {
            repos,
            env_urls,
            store: Box::new(store),
        };

        if never_configured {
            tracing::info!("First load, adding default repository");
            registry
                .repos
                .push(Repository::new(DEFAULT_REPO_NAME, DEFAULT_REPO_URL));
            if let Err(e) = registry.persist() {
                tracing::warn!(error = %e, "Failed to persist default repository");
            }
        }

        Ok(registry)
    }

    /// All repositories, in registry order
    pub fn repositories(&self) -> Vec<Repository> {
        self.repos.clone()
    }

    /// Enabled repositories, in registry order
    pub fn enabled_repositories(&self) -> Vec<Repository> {
        self.repos.iter().filter(|r| r.enabled).cloned().collect()
    }

    /// Get a repository by URL
    pub fn get(&self, url: &str) -> Option<&Repository> {
        self.repos.iter().find(|r| r.url == url)
    }

    /// Whether the repository was provided by the environment layer
    pub fn is_from_environment(&self, url: &str) -> bool {
        self.env_urls.contains(url)
    }

    pub fn len(&self) -> usize {
        self.repos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.repos.is_empty()
    }

    /// Add a repository
    ///
    /// Rejects empty or non-HTTP(S) URLs and URLs already in the registry;
    /// nothing is changed on rejection.
    pub fn add_repository(&mut self, name: &str, url: &str) -> Result<Repository> {
        let name = name.trim();
        let url = url.trim();

        if name.is_empty() {
            return Err(RepoError::InvalidRepositoryName {
                reason: "name is required".to_string(),
            });
        }
        validate_url(url)?;
        if self.get(url).is_some() {
            return Err(RepoError::RepositoryAlreadyExists {
                url: url.to_string(),
            });
        }

        let repo = Repository::new(name, url).with_last_sync(Utc::now());
        self.repos.push(repo.clone());
        self.persist()?;

        tracing::info!(name, url, "Added repository");
        Ok(repo)
    }

    /// Remove a repository by URL; absent URLs are ignored
    pub fn remove_repository(&mut self, url: &str) -> Result<()> {
        let before = self.repos.len();
        self.repos.retain(|r| r.url != url);
        if self.repos.len() != before {
            tracing::info!(url, "Removed repository");
        }
        self.persist()
    }

    /// Enable or disable a repository; absent URLs are ignored
    pub fn toggle_repository(&mut self, url: &str, enabled: bool) -> Result<()> {
        match self.repos.iter_mut().find(|r| r.url == url) {
            Some(repo) => {
                repo.enabled = enabled;
                self.persist()
            }
            None => Ok(()),
        }
    }

    /// Record a successful sync for the given repositories
    pub fn mark_synced(&mut self, urls: &[String], at: DateTime<Utc>) -> Result<()> {
        let mut touched = false;
        for repo in self.repos.iter_mut().filter(|r| urls.contains(&r.url)) {
            repo.last_sync = Some(at);
            touched = true;
        }
        if touched { self.persist() } else { Ok(()) }
    }

    /// Write every repository not provided by the environment
    fn persist(&self) -> Result<()> {
        let to_save: Vec<&Repository> = self
            .repos
            .iter()
            .filter(|r| !self.env_urls.contains(&r.url))
            .collect();
        let json = serde_json::to_string(&to_save)?;
        self.store.set(STORAGE_KEY, &json)
    }
}

/// Keep the first repository for each URL not already in `seen`
fn dedup_by_url(repos: Vec<Repository>, seen: &mut HashSet<String>) -> Vec<Repository> {
    repos
        .into_iter()
        .filter(|r| seen.insert(r.url.clone()))
        .collect()
}

/// Check that a repository URL is a usable HTTP(S) URL
fn validate_url(url: &str) -> Result<()> {
    if url.is_empty() {
        return Err(RepoError::InvalidRepositoryUrl {
            url: url.to_string(),
            reason: "URL is required".to_string(),
        });
    }
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(RepoError::InvalidRepositoryUrl {
            url: url.to_string(),
            reason: "URL must start with http:// or https://".to_string(),
        });
    }
    url::Url::parse(url).map_err(|e| RepoError::InvalidRepositoryUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;
    Ok(())
}
