//! Catalog search and category filtering

use crate::catalog::{CatalogModule, MergedCatalog};

/// Category value that matches every module
pub const ALL_CATEGORIES: &str = "all";

/// Filter applied when browsing a merged catalog
#[derive(Debug, Clone, Default)]
pub struct CatalogFilter {
    /// Case-insensitive text matched against display name, description and tags
    pub query: Option<String>,

    /// Category name; `None` or `"all"` matches everything
    pub category: Option<String>,
}

impl CatalogFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Check whether a module passes the filter
    pub fn matches(&self, module: &CatalogModule) -> bool {
        self.matches_query(module) && self.matches_category(module)
    }

    fn matches_query(&self, module: &CatalogModule) -> bool {
        let query = match self.query.as_deref().map(str::trim) {
            None | Some("") => return true,
            Some(q) => q.to_lowercase(),
        };

        module.display_name.to_lowercase().contains(&query)
            || module.description.to_lowercase().contains(&query)
            || module
                .tags
                .iter()
                .any(|t| t.to_lowercase().contains(&query))
    }

    fn matches_category(&self, module: &CatalogModule) -> bool {
        match self.category.as_deref() {
            None | Some(ALL_CATEGORIES) => true,
            Some(category) => module.category == category,
        }
    }

    /// Apply the filter, keeping catalog order
    pub fn apply<'a>(&self, catalog: &'a MergedCatalog) -> Vec<&'a CatalogModule> {
        catalog.modules.iter().filter(|m| self.matches(m)).collect()
    }
}
