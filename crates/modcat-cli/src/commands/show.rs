//! Module details command

use modcat_repo::CatalogService;

use super::refresh;
use crate::display;
use crate::error::{CliError, Result};

/// Print one module from the merged catalog
pub async fn run(service: &CatalogService, module: &str, json: bool) -> Result<()> {
    let outcome = refresh(service, json).await?;

    let Some(found) = outcome.catalog.find(module) else {
        return Err(module_not_found(module));
    };

    if json {
        let out = serde_json::to_string_pretty(found).map_err(|e| CliError::internal(e.to_string()))?;
        println!("{}", out);
        return Ok(());
    }

    display::module_details(found, &outcome.catalog);
    display::refresh_diagnostics(&outcome);
    Ok(())
}

pub(crate) fn module_not_found(module: &str) -> CliError {
    CliError::not_found_with_help(
        format!("Module '{}' not found in any enabled repository", module),
        "Search the catalog with 'modcat catalog --search <term>'",
    )
}
