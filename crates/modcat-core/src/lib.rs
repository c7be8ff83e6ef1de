//! modcat Core - Core types for the module catalog
//!
//! This crate provides the data model shared by the aggregation service and
//! the CLI:
//! - `Repository`: A configured catalog source, identified by its URL
//! - `RawCatalog`: The parsed document published by one repository
//! - `MergedCatalog`: The combined view over every repository that loaded
//! - `CatalogFilter`: Search and category filtering over a merged catalog

pub mod repository;
pub mod catalog;
pub mod filter;

pub use repository::Repository;
pub use catalog::{
    CATALOG_API_VERSION, CatalogModule, Category, Maintainer, MergedCatalog, ModuleVersion,
    RawCatalog,
};
pub use filter::{ALL_CATEGORIES, CatalogFilter};
