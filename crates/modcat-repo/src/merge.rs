//! Catalog merging
//!
//! Combines catalogs from several repositories into one. Pure: no I/O and
//! inputs are left untouched, so the result depends only on input order.

use chrono::Utc;
use std::collections::HashSet;

use modcat_core::{CATALOG_API_VERSION, CatalogModule, MergedCatalog, RawCatalog};

/// A module discarded because an earlier repository published the same name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedModule {
    pub name: String,
    /// Source of the module that was kept
    pub kept_source: String,
    /// Source of the module that was dropped
    pub dropped_source: String,
}

/// Merged catalog plus the duplicates discarded on the way
#[derive(Debug, Clone)]
pub struct MergeResult {
    pub catalog: MergedCatalog,
    pub dropped: Vec<DroppedModule>,
}

/// Merge catalogs in the order given
///
/// The first module with a given name wins; later ones are dropped with a
/// warning. Categories are unioned by name, first wins, silently.
pub fn merge(catalogs: &[RawCatalog]) -> MergedCatalog {
    merge_detailed(catalogs).catalog
}

/// Merge catalogs and report dropped duplicate modules
pub fn merge_detailed(catalogs: &[RawCatalog]) -> MergeResult {
    let mut modules: Vec<CatalogModule> = Vec::new();
    let mut categories = Vec::new();
    let mut dropped = Vec::new();

    let mut module_names: HashSet<&str> = HashSet::new();
    let mut category_names: HashSet<&str> = HashSet::new();

    for catalog in catalogs {
        for module in &catalog.modules {
            if module_names.insert(module.name.as_str()) {
                modules.push(module.clone());
                continue;
            }

            let kept_source = modules
                .iter()
                .find(|m| m.name == module.name)
                .map(|m| m.source.clone())
                .unwrap_or_default();

            tracing::warn!(
                module = %module.name,
                kept = %kept_source,
                dropped = %module.source,
                "Duplicate module found, keeping first occurrence"
            );
            dropped.push(DroppedModule {
                name: module.name.clone(),
                kept_source,
                dropped_source: module.source.clone(),
            });
        }

        for category in &catalog.categories {
            if category_names.insert(category.name.as_str()) {
                categories.push(category.clone());
            }
        }
    }

    MergeResult {
        catalog: MergedCatalog {
            api_version: CATALOG_API_VERSION.to_string(),
            generated: Utc::now(),
            modules,
            categories,
        },
        dropped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modcat_core::{Category, ModuleVersion};

    fn module(name: &str, source: &str, version: &str) -> CatalogModule {
        CatalogModule {
            name: name.to_string(),
            display_name: name.to_string(),
            source: source.to_string(),
            versions: vec![ModuleVersion {
                version: version.to_string(),
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    fn category(name: &str, display: &str) -> Category {
        Category {
            name: name.to_string(),
            display_name: display.to_string(),
            ..Default::default()
        }
    }

    fn catalog(modules: Vec<CatalogModule>, categories: Vec<Category>) -> RawCatalog {
        RawCatalog {
            api_version: Some("publisher/v9".to_string()),
            generated: None,
            modules,
            categories,
        }
    }

    #[test]
    fn test_merge_empty() {
        let merged = merge(&[]);
        assert!(merged.modules.is_empty());
        assert!(merged.categories.is_empty());
        assert_eq!(merged.api_version, CATALOG_API_VERSION);
    }

    #[test]
    fn test_first_occurrence_wins() {
        let a = catalog(vec![module("redis", "https://a.example", "7.2.0")], vec![]);
        let b = catalog(
            vec![
                module("redis", "https://b.example", "8.0.0"),
                module("nginx", "https://b.example", "1.25.0"),
            ],
            vec![],
        );

        let result = merge_detailed(&[a, b]);
        let merged = result.catalog;

        assert_eq!(merged.modules.len(), 2);
        let redis = merged.find("redis").unwrap();
        assert_eq!(redis.source, "https://a.example");
        assert_eq!(redis.versions.len(), 1);
        assert_eq!(redis.versions[0].version, "7.2.0");

        assert_eq!(
            result.dropped,
            vec![DroppedModule {
                name: "redis".to_string(),
                kept_source: "https://a.example".to_string(),
                dropped_source: "https://b.example".to_string(),
            }]
        );
    }

    #[test]
    fn test_input_order_decides_winner() {
        let a = catalog(vec![module("redis", "https://a.example", "7.2.0")], vec![]);
        let b = catalog(vec![module("redis", "https://b.example", "8.0.0")], vec![]);

        let merged = merge(&[b, a]);
        assert_eq!(merged.find("redis").unwrap().source, "https://b.example");
    }

    #[test]
    fn test_module_order_preserved() {
        let a = catalog(
            vec![
                module("zookeeper", "https://a.example", "3.9"),
                module("airflow", "https://a.example", "2.8"),
            ],
            vec![],
        );
        let b = catalog(vec![module("kafka", "https://b.example", "3.6")], vec![]);

        let merged = merge(&[a, b]);
        let names: Vec<_> = merged.modules.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["zookeeper", "airflow", "kafka"]);
    }

    #[test]
    fn test_category_union() {
        let a = catalog(vec![], vec![category("db", "Databases")]);
        let b = catalog(
            vec![],
            vec![category("db", "Data Stores"), category("cache", "Caches")],
        );

        let merged = merge(&[a, b]);
        let names: Vec<_> = merged.categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["db", "cache"]);
        assert_eq!(merged.category("db").unwrap().display_name, "Databases");
    }

    #[test]
    fn test_inputs_untouched() {
        let a = catalog(vec![module("redis", "https://a.example", "7.2.0")], vec![]);
        let b = catalog(vec![module("redis", "https://b.example", "8.0.0")], vec![]);
        let inputs = vec![a.clone(), b.clone()];

        let _ = merge(&inputs);
        assert_eq!(inputs, vec![a, b]);
    }

    #[test]
    fn test_api_version_not_copied_from_inputs() {
        let a = catalog(vec![module("redis", "https://a.example", "7.2.0")], vec![]);
        let merged = merge(&[a]);
        assert_eq!(merged.api_version, CATALOG_API_VERSION);
    }
}
