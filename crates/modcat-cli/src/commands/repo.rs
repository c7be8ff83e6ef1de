//! Repository management commands

use console::style;
use serde::Serialize;

use modcat_core::Repository;
use modcat_repo::CatalogService;

use crate::display;
use crate::error::{CliError, Result};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RepositoryRow<'a> {
    #[serde(flatten)]
    repository: &'a Repository,
    origin: &'static str,
}

/// List configured repositories
pub async fn list(service: &CatalogService, json: bool) -> Result<()> {
    let registry = service.registry().await;
    let repos = registry.repositories();

    if json {
        let rows: Vec<_> = repos
            .iter()
            .map(|repository| RepositoryRow {
                repository,
                origin: display::origin(&registry, repository),
            })
            .collect();
        let out = serde_json::to_string_pretty(&rows).map_err(|e| CliError::internal(e.to_string()))?;
        println!("{}", out);
        return Ok(());
    }

    if repos.is_empty() {
        println!("No repositories configured.");
        println!();
        println!("Add a repository with:");
        println!("  modcat repo add <name> <url>");
        return Ok(());
    }

    display::repositories_table(&registry);
    Ok(())
}

/// Add a repository
pub async fn add(service: &CatalogService, name: &str, url: &str) -> Result<()> {
    let repo = service.add_repository(name, url).await?;

    println!(
        "{} \"{}\" has been added to your repositories",
        style("✓").green().bold(),
        repo.name
    );
    println!();
    println!("Run 'modcat catalog' to browse its modules.");
    Ok(())
}

/// Remove a repository
pub async fn remove(service: &CatalogService, url: &str) -> Result<()> {
    let existing = service.registry().await.get(url).map(|r| r.name.clone());
    service.remove_repository(url).await?;

    match existing {
        Some(name) => println!(
            "{} \"{}\" has been removed from your repositories",
            style("✓").green().bold(),
            name
        ),
        None => println!("No repository with URL {} is configured.", url),
    }
    Ok(())
}

/// Enable or disable a repository
pub async fn set_enabled(service: &CatalogService, url: &str, enabled: bool) -> Result<()> {
    let (name, from_env) = {
        let registry = service.registry().await;
        let name = registry.get(url).map(|r| r.name.clone());
        (name, registry.is_from_environment(url))
    };
    let Some(name) = name else {
        return Err(CliError::not_found_with_help(
            format!("No repository with URL {} is configured", url),
            "List configured repositories with 'modcat repo list'",
        ));
    };
    service.toggle_repository(url, enabled).await?;

    let state = if enabled { "enabled" } else { "disabled" };
    println!("{} \"{}\" {}", style("✓").green().bold(), name, state);
    if from_env {
        println!(
            "{} this repository comes from MODULES_REPO; the change is not persisted",
            style("note:").blue()
        );
    }
    Ok(())
}
