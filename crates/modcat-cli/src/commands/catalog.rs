//! Catalog browsing command

use console::style;
use serde_json::json;

use modcat_core::CatalogFilter;
use modcat_repo::CatalogService;

use super::{refresh, repository_names};
use crate::display;
use crate::error::{CliError, Result};

/// Refresh and print the merged catalog
pub async fn run(
    service: &CatalogService,
    search: Option<&str>,
    category: Option<&str>,
    json: bool,
) -> Result<()> {
    let outcome = refresh(service, json).await?;

    let mut filter = CatalogFilter::default();
    if let Some(query) = search {
        filter = filter.with_query(query);
    }
    if let Some(category) = category {
        filter = filter.with_category(category);
    }
    let modules = filter.apply(&outcome.catalog);

    if json {
        let unreachable: Vec<_> = outcome
            .failures
            .iter()
            .map(|f| json!({"name": f.name, "url": f.url, "error": f.error.to_string()}))
            .collect();
        let out = json!({
            "apiVersion": outcome.catalog.api_version,
            "generated": outcome.catalog.generated,
            "modules": modules,
            "categories": outcome.catalog.categories,
            "unreachable": unreachable,
        });
        let out = serde_json::to_string_pretty(&out).map_err(|e| CliError::internal(e.to_string()))?;
        println!("{}", out);
        return Ok(());
    }

    if service.registry().await.enabled_repositories().is_empty() {
        println!("No enabled repositories.");
        println!();
        println!("Add one with:");
        println!("  modcat repo add <name> <url>");
        return Ok(());
    }

    if modules.is_empty() {
        println!("No modules found.");
    } else {
        display::catalog_table(&modules, &repository_names(service).await);
        println!();
        println!(
            "{} of {} modules",
            style(modules.len()).bold(),
            outcome.catalog.modules.len()
        );
    }

    display::refresh_diagnostics(&outcome);
    Ok(())
}
