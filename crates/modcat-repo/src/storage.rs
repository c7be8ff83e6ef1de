//! Durable key-value storage for the registry
//!
//! The registry persists a single JSON value under a fixed key. An absent
//! key means "never configured", which is not the same as an empty list.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use crate::error::{RepoError, Result};

/// Key-value store scoped to the running user
pub trait KeyValueStore: Send + Sync {
    /// Read a value, `None` if the key has never been written
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a value, creating the key if needed
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// File-backed store: one file per key inside a directory
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `dir` (created lazily on first write)
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store under the platform config directory
    pub fn open_default() -> Result<Self> {
        Ok(Self::new(Self::default_dir()?))
    }

    /// Get default storage directory
    pub fn default_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().ok_or_else(|| RepoError::InvalidConfig {
            message: "Could not determine config directory".to_string(),
        })?;
        Ok(config_dir.join("modcat"))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.key_path(key);
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(RepoError::Storage {
                message: format!("Failed to read {}: {}", path.display(), e),
            }),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;

        // Readers see either the previous value or the new one
        let path = self.key_path(key);
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }
}

/// In-memory store for tests and throwaway sessions
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with a pre-populated key
    pub fn with_value(key: &str, value: &str) -> Self {
        let store = Self::new();
        if let Ok(mut values) = store.values.write() {
            values.insert(key.to_string(), value.to_string());
        }
        store
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let values = self.values.read().map_err(|_| RepoError::Storage {
            message: "memory store lock poisoned".to_string(),
        })?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self.values.write().map_err(|_| RepoError::Storage {
            message: "memory store lock poisoned".to_string(),
        })?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Store that serves a fixed value and rejects every write
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub(crate) struct ReadOnlyStore {
    value: Option<String>,
}

#[cfg(test)]
impl ReadOnlyStore {
    pub(crate) fn with_value(value: &str) -> Self {
        Self {
            value: Some(value.to_string()),
        }
    }
}

#[cfg(test)]
impl KeyValueStore for ReadOnlyStore {
    fn get(&self, _key: &str) -> Result<Option<String>> {
        Ok(self.value.clone())
    }

    fn set(&self, key: &str, _value: &str) -> Result<()> {
        Err(RepoError::Storage {
            message: format!("cannot write {}: read-only file system", key),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_store_missing_key() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().join("nested"));
        assert_eq!(store.get("repos").unwrap(), None);
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().join("nested"));

        store.set("repos", "[]").unwrap();
        assert_eq!(store.get("repos").unwrap().as_deref(), Some("[]"));

        store.set("repos", r#"[{"name":"a"}]"#).unwrap();
        assert_eq!(store.get("repos").unwrap().as_deref(), Some(r#"[{"name":"a"}]"#));
        assert!(!dir.path().join("nested/repos.json.tmp").exists());
    }

    #[test]
    fn test_memory_store_shares_state_between_clones() {
        let store = MemoryStore::new();
        let clone = store.clone();

        clone.set("repos", "[]").unwrap();
        assert_eq!(store.get("repos").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_file_store_dir() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().join("nested"));
        assert_eq!(store.dir(), dir.path().join("nested"));
    }
}
