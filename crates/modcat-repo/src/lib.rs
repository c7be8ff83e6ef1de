//! modcat Catalog Aggregation
//!
//! This crate builds one module catalog out of several independently
//! operated repositories:
//!
//! - **Registry**: layered repository list (environment, persisted, default)
//! - **Fetcher**: one HTTP GET per repository, parsed into a catalog
//! - **Merger**: deterministic combination, first repository wins on name clashes
//! - **Aggregator**: concurrent fan-out with graceful partial failure
//!
//! ## Example
//!
//! ```rust,no_run
//! use modcat_repo::{CatalogService, Settings};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let settings = Settings::load()?;
//! let service = CatalogService::from_settings(&settings)?;
//!
//! service
//!     .add_repository("community", "https://example.com/modules/index.json")
//!     .await?;
//!
//! let outcome = service.refresh().await?;
//! for failure in &outcome.failures {
//!     eprintln!("unreachable: {}", failure);
//! }
//! println!("{} modules", outcome.catalog.modules.len());
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod config;
pub mod storage;
pub mod registry;
pub mod http;
pub mod merge;
pub mod aggregator;
pub mod service;

// Re-exports for convenience
pub use error::{FetchError, RepoError, Result, SourceFailure};
pub use config::{
    DEFAULT_REPO_NAME, DEFAULT_REPO_URL, MODULES_REPO_ENV, STORAGE_KEY, Settings,
};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use registry::{LayerState, Registry};
pub use http::{CatalogFetcher, HttpFetcher};
pub use merge::{DroppedModule, MergeResult, merge, merge_detailed};
pub use aggregator::{Aggregator, RefreshOutcome, SharedRegistry};
pub use service::CatalogService;
