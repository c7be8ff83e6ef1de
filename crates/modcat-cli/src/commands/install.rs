//! Install command
//!
//! Resolves the module and version against the merged catalog. Installation
//! itself is not available yet, so a resolved request ends with a dedicated
//! exit code.

use console::style;

use modcat_repo::CatalogService;

use super::refresh;
use super::show::module_not_found;
use crate::error::{CliError, Result};

/// Resolve and "install" a module
pub async fn run(service: &CatalogService, module: &str, version: Option<&str>) -> Result<()> {
    let outcome = refresh(service, false).await?;

    let Some(found) = outcome.catalog.find(module) else {
        return Err(module_not_found(module));
    };

    let resolved = match version {
        Some(v) => found.version(v),
        None => found.latest_version(),
    };
    let Some(resolved) = resolved else {
        let available: Vec<_> = found.versions.iter().map(|v| v.version.as_str()).collect();
        let help = if available.is_empty() {
            "This module has no published versions".to_string()
        } else {
            format!("Available versions: {}", available.join(", "))
        };
        return Err(CliError::not_found_with_help(
            format!(
                "Version '{}' of module '{}' not found",
                version.unwrap_or("latest"),
                module
            ),
            help,
        ));
    };

    tracing::info!(module = %found.name, version = %resolved.version, "Install requested");
    println!(
        "{} {} {}...",
        style("Installing").cyan().bold(),
        found.title(),
        resolved.version
    );

    Err(CliError::InstallUnavailable {
        module: format!("{}@{}", found.name, resolved.version),
    })
}
