//! Catalog document types
//!
//! A repository publishes one `RawCatalog` (usually `index.json`). The
//! aggregation service combines several of them into a `MergedCatalog`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Schema version of catalogs produced by the aggregator
pub const CATALOG_API_VERSION: &str = "v1";

/// Catalog document as published by a single repository
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCatalog {
    /// Publisher's schema version
    #[serde(default)]
    pub api_version: Option<String>,

    /// When the publisher generated the document
    #[serde(default)]
    pub generated: Option<String>,

    /// Published modules
    pub modules: Vec<CatalogModule>,

    /// Published categories
    #[serde(default)]
    pub categories: Vec<Category>,
}

impl RawCatalog {
    /// Parse a catalog document from JSON bytes
    pub fn from_slice(bytes: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(bytes)
    }

    /// Attach provenance to every module
    pub fn stamp_source(&mut self, source: &str) {
        for module in &mut self.modules {
            module.source = source.to_string();
        }
    }
}

/// An installable module
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogModule {
    /// Identity within a merged catalog
    pub name: String,

    #[serde(default)]
    pub display_name: String,

    #[serde(default)]
    pub description: String,

    /// Category name
    #[serde(default)]
    pub category: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub maintainers: Vec<Maintainer>,

    /// Origin repository URL, attached at fetch time
    #[serde(default)]
    pub source: String,

    /// Newest first, as published
    #[serde(default)]
    pub versions: Vec<ModuleVersion>,
}

impl CatalogModule {
    /// The newest published version
    pub fn latest_version(&self) -> Option<&ModuleVersion> {
        self.versions.first()
    }

    /// Look up a specific version
    pub fn version(&self, version: &str) -> Option<&ModuleVersion> {
        self.versions.iter().find(|v| v.version == version)
    }

    /// Display name, falling back to the identity name
    pub fn title(&self) -> &str {
        if self.display_name.is_empty() {
            &self.name
        } else {
            &self.display_name
        }
    }
}

/// Module maintainer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Maintainer {
    pub name: String,
    #[serde(default)]
    pub email: String,
}

/// One published version of a module
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleVersion {
    pub version: String,

    /// Location of the module definition
    #[serde(default)]
    pub url: String,

    #[serde(default)]
    pub created: String,

    #[serde(default)]
    pub app_version: String,

    #[serde(default)]
    pub description: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub readme: Option<String>,

    #[serde(default)]
    pub dependencies: Vec<String>,

    #[serde(default)]
    pub min_operator_version: String,

    #[serde(default)]
    pub max_operator_version: String,
}

/// Module category
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Identity key
    pub name: String,

    #[serde(default)]
    pub display_name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// Combined catalog over all repositories that loaded in one refresh
///
/// Recomputed on every refresh and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergedCatalog {
    pub api_version: String,
    pub generated: DateTime<Utc>,
    pub modules: Vec<CatalogModule>,
    pub categories: Vec<Category>,
}

impl MergedCatalog {
    /// Catalog with no modules or categories, stamped now
    pub fn empty() -> Self {
        Self {
            api_version: CATALOG_API_VERSION.to_string(),
            generated: Utc::now(),
            modules: Vec::new(),
            categories: Vec::new(),
        }
    }

    /// Get a module by name
    pub fn find(&self, name: &str) -> Option<&CatalogModule> {
        self.modules.iter().find(|m| m.name == name)
    }

    /// Get a category by name
    pub fn category(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}
