//! Repository definition

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A configured catalog source
///
/// Identity is the URL: two entries with the same URL are the same
/// repository, whatever their names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Repository {
    /// Human-readable name
    pub name: String,

    /// Catalog document URL (unique key)
    pub url: String,

    /// Whether the repository takes part in refreshes
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Last successful sync
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_sync: Option<DateTime<Utc>>,
}

fn default_enabled() -> bool {
    true
}

impl Repository {
    /// Create an enabled repository that has never been synced
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            enabled: true,
            last_sync: None,
        }
    }

    /// Set the last sync timestamp
    pub fn with_last_sync(mut self, at: DateTime<Utc>) -> Self {
        self.last_sync = Some(at);
        self
    }
}
