//! Display formatting for CLI output
//!
//! Tables for repositories and catalog modules, module details, and the
//! non-fatal diagnostics of a refresh.

use chrono::{DateTime, Utc};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashMap;
use std::time::Duration;

use modcat_core::{CatalogModule, MergedCatalog, Repository};
use modcat_repo::{Registry, RefreshOutcome};

/// Spinner shown on stderr while catalogs are fetched
pub fn spinner(message: &str, hidden: bool) -> ProgressBar {
    if hidden {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Print configured repositories
pub fn repositories_table(registry: &Registry) {
    println!(
        "{:<24} {:<8} {:<8} {:<18} URL",
        "NAME", "ENABLED", "ORIGIN", "LAST SYNC"
    );
    println!("{}", "-".repeat(100));

    for repo in registry.repositories() {
        let enabled = if repo.enabled {
            style("yes").green()
        } else {
            style("no").dim()
        };
        println!(
            "{:<24} {:<8} {:<8} {:<18} {}",
            truncate(&repo.name, 24),
            enabled,
            origin(registry, &repo),
            format_sync(repo.last_sync),
            repo.url
        );
    }
}

/// Where a repository came from
pub fn origin(registry: &Registry, repo: &Repository) -> &'static str {
    if registry.is_from_environment(&repo.url) {
        "env"
    } else {
        "user"
    }
}

/// Print catalog modules
pub fn catalog_table(modules: &[&CatalogModule], repo_names: &HashMap<String, String>) {
    println!(
        "{:<24} {:<12} {:<16} {:<20} DESCRIPTION",
        "NAME", "VERSION", "CATEGORY", "REPO"
    );
    println!("{}", "-".repeat(100));

    for module in modules {
        let version = module
            .latest_version()
            .map(|v| v.version.as_str())
            .unwrap_or("-");
        let repo = repo_names
            .get(&module.source)
            .map(String::as_str)
            .unwrap_or(module.source.as_str());

        println!(
            "{:<24} {:<12} {:<16} {:<20} {}",
            truncate(&module.name, 24),
            truncate(version, 12),
            truncate(&module.category, 16),
            truncate(repo, 20),
            truncate(&module.description, 40)
        );
    }
}

/// Print one module in full
pub fn module_details(module: &CatalogModule, catalog: &MergedCatalog) {
    println!("{}", style(module.title()).cyan().bold());
    println!("  {:<14} {}", style("Name:").bold(), module.name);
    if !module.description.is_empty() {
        println!("  {:<14} {}", style("Description:").bold(), module.description);
    }

    let category = catalog
        .category(&module.category)
        .map(|c| {
            if c.display_name.is_empty() {
                c.name.clone()
            } else {
                c.display_name.clone()
            }
        })
        .unwrap_or_else(|| module.category.clone());
    if !category.is_empty() {
        println!("  {:<14} {}", style("Category:").bold(), category);
    }
    if !module.tags.is_empty() {
        println!("  {:<14} {}", style("Tags:").bold(), module.tags.join(", "));
    }
    println!("  {:<14} {}", style("Source:").bold(), module.source);

    if !module.maintainers.is_empty() {
        println!();
        println!("{}", style("Maintainers").bold());
        for maintainer in &module.maintainers {
            if maintainer.email.is_empty() {
                println!("  {}", maintainer.name);
            } else {
                println!("  {} <{}>", maintainer.name, maintainer.email);
            }
        }
    }

    if !module.versions.is_empty() {
        println!();
        println!("{}", style("Versions").bold());
        for (i, version) in module.versions.iter().enumerate() {
            let marker = if i == 0 { " (latest)" } else { "" };
            print!("  {}{}", version.version, style(marker).green());
            if !version.app_version.is_empty() {
                print!("  app {}", version.app_version);
            }
            if !version.min_operator_version.is_empty() || !version.max_operator_version.is_empty() {
                print!(
                    "  operator {}..{}",
                    version.min_operator_version, version.max_operator_version
                );
            }
            println!();
            if !version.dependencies.is_empty() {
                println!("    depends on: {}", version.dependencies.join(", "));
            }
        }
    }
}

/// Print non-fatal refresh diagnostics to stderr
pub fn refresh_diagnostics(outcome: &RefreshOutcome) {
    if !outcome.failures.is_empty() {
        eprintln!();
        eprintln!(
            "{} {} repositor{} could not be reached:",
            style("⚠").yellow(),
            outcome.failures.len(),
            if outcome.failures.len() == 1 { "y" } else { "ies" }
        );
        for failure in &outcome.failures {
            eprintln!("  {} {}", style("•").dim(), failure);
        }
    }

    for dropped in &outcome.dropped {
        eprintln!(
            "{} duplicate module {} from {} ignored (already provided by {})",
            style("note:").blue(),
            dropped.name,
            dropped.dropped_source,
            dropped.kept_source
        );
    }
}

/// Format a sync timestamp for tables
pub fn format_sync(at: Option<DateTime<Utc>>) -> String {
    match at {
        Some(at) => at.format("%Y-%m-%d %H:%M").to_string(),
        None => "never".to_string(),
    }
}

/// Truncate to `max` characters, marking the cut with an ellipsis
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let kept: String = s.chars().take(max.saturating_sub(1)).collect();
    format!("{}…", kept)
}
