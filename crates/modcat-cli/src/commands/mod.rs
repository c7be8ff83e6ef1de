//! CLI commands

pub mod catalog;
pub mod install;
pub mod repo;
pub mod show;

use std::collections::HashMap;
use std::path::PathBuf;

use modcat_repo::{CatalogService, RefreshOutcome, Settings};

use crate::display;
use crate::error::{CliError, Result};

/// Options shared by every command
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    pub store_dir: Option<PathBuf>,
    pub config: Option<PathBuf>,
}

/// Resolve settings and open the catalog service
pub fn open_service(options: &GlobalOptions) -> Result<CatalogService> {
    let mut settings = match &options.config {
        Some(path) => Settings::load_from(path).map_err(|e| CliError::Io {
            message: format!("Failed to load config {}: {}", path.display(), e),
        })?,
        None => Settings::load()?,
    };

    if let Some(dir) = &options.store_dir {
        settings.store_dir = Some(dir.clone());
    }

    tracing::debug!(store_dir = ?settings.store_dir, "Opening catalog service");
    Ok(CatalogService::from_settings(&settings)?)
}

/// Refresh the catalog behind a spinner
pub async fn refresh(service: &CatalogService, quiet: bool) -> Result<RefreshOutcome> {
    let pb = display::spinner("Fetching module catalogs...", quiet);
    let result = service.refresh().await;
    pb.finish_and_clear();
    Ok(result?)
}

/// Map repository URLs to their display names
pub async fn repository_names(service: &CatalogService) -> HashMap<String, String> {
    service
        .repositories()
        .await
        .into_iter()
        .map(|r| (r.url, r.name))
        .collect()
}
