//! Aggregator settings and environment configuration
//!
//! Settings live in `~/.config/modcat/config.yaml`; every field is optional.
//! The environment layer of the repository list is read from `MODULES_REPO`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{RepoError, Result};

/// Environment variable holding a JSON array of repositories
pub const MODULES_REPO_ENV: &str = "MODULES_REPO";

/// Storage key for the user-persisted repository list
pub const STORAGE_KEY: &str = "modcat_module_repos";

/// Name of the repository seeded on first use
pub const DEFAULT_REPO_NAME: &str = "forkspacer-official";

/// URL of the repository seeded on first use
pub const DEFAULT_REPO_URL: &str =
    "https://raw.githubusercontent.com/forkspacer/modules/main/index.json";

/// Aggregator settings file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Per-request timeout for catalog fetches
    #[serde(default = "default_request_timeout", with = "humantime_serde")]
    pub request_timeout: Duration,

    /// User agent sent with catalog requests
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Directory for the persisted repository list
    #[serde(default)]
    pub store_dir: Option<PathBuf>,
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_user_agent() -> String {
    format!("modcat/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            request_timeout: default_request_timeout(),
            user_agent: default_user_agent(),
            store_dir: None,
        }
    }
}

impl Settings {
    /// Load settings from default location
    pub fn load() -> Result<Self> {
        let path = Self::default_path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load settings from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings: Self = serde_yaml::from_str(&content).map_err(|e| {
            RepoError::InvalidConfig {
                message: format!("{}: {}", path.display(), e),
            }
        })?;
        Ok(settings)
    }

    /// Save settings to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get default settings path
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().ok_or_else(|| RepoError::InvalidConfig {
            message: "Could not determine config directory".to_string(),
        })?;
        Ok(config_dir.join("modcat").join("config.yaml"))
    }
}

/// Read the raw environment layer, `None` when the variable is unset
pub fn environment_repositories() -> Option<String> {
    std::env::var(MODULES_REPO_ENV).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.request_timeout, Duration::from_secs(30));
        assert!(settings.user_agent.starts_with("modcat/"));
        assert!(settings.store_dir.is_none());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let settings: Settings = serde_yaml::from_str("requestTimeout: 5s\n").unwrap();
        assert_eq!(settings.request_timeout, Duration::from_secs(5));
        assert!(settings.user_agent.starts_with("modcat/"));
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("modcat").join("config.yaml");

        let settings = Settings {
            store_dir: Some(PathBuf::from("/var/lib/modcat")),
            request_timeout: Duration::from_secs(90),
            ..Default::default()
        };
        settings.save_to(&path).unwrap();

        let loaded = Settings::load_from(&path).unwrap();
        assert_eq!(loaded.request_timeout, Duration::from_secs(90));
        assert_eq!(loaded.store_dir, Some(PathBuf::from("/var/lib/modcat")));
    }

    #[test]
    fn test_invalid_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "requestTimeout: [not, a, duration]\n").unwrap();

        let err = Settings::load_from(&path).unwrap_err();
        assert!(matches!(err, RepoError::InvalidConfig { .. }));
    }
}
