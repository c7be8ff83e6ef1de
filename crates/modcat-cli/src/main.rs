//! modcat CLI - browse modules aggregated from several catalog repositories

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod commands;
mod display;
mod error;
mod exit_codes;

use commands::GlobalOptions;
use error::Result;

#[derive(Parser)]
#[command(name = "modcat")]
#[command(version)]
#[command(about = "Browse modules aggregated from several catalog repositories", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Directory holding the persisted repository list
    #[arg(long, global = true, env = "MODCAT_STORE_DIR")]
    store_dir: Option<PathBuf>,

    /// Settings file (defaults to ~/.config/modcat/config.yaml)
    #[arg(long, global = true, env = "MODCAT_CONFIG")]
    config: Option<PathBuf>,

    /// Log level written to stderr
    #[arg(long, global = true, value_enum, default_value = "warn")]
    log_level: LogLevel,

    /// Enable debug output
    #[arg(long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage catalog repositories
    Repo {
        #[command(subcommand)]
        command: RepoCommands,
    },

    /// Browse the merged module catalog
    Catalog {
        /// Match against display name, description and tags
        #[arg(short, long)]
        search: Option<String>,

        /// Only show modules in this category ("all" for every category)
        #[arg(short, long)]
        category: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show details for a module
    Show {
        /// Module name
        module: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Install a module
    Install {
        /// Module name
        module: String,

        /// Version to install (latest if omitted)
        #[arg(long)]
        version: Option<String>,
    },
}

#[derive(Subcommand)]
enum RepoCommands {
    /// List configured repositories
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Add a repository
    Add {
        /// Repository name
        name: String,

        /// Catalog URL (http or https)
        url: String,
    },

    /// Remove a repository
    Remove {
        /// Catalog URL
        url: String,
    },

    /// Enable a repository
    Enable {
        /// Catalog URL
        url: String,
    },

    /// Disable a repository
    Disable {
        /// Catalog URL
        url: String,
    },
}

/// Log levels
#[derive(Debug, Clone, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_filter_directive(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// Logs go to stderr; stdout carries command output only.
fn initialize_tracing(cli: &Cli) {
    let directive = if cli.debug {
        "debug"
    } else {
        cli.log_level.to_filter_directive()
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    miette::set_panic_hook();

    let cli = Cli::parse();
    initialize_tracing(&cli);

    match run(cli).await {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(err) => {
            let code = err.exit_code();
            eprintln!("{:?}", miette::Report::new(err));
            ExitCode::from(code as u8)
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let options = GlobalOptions {
        store_dir: cli.store_dir,
        config: cli.config,
    };
    let service = commands::open_service(&options)?;

    match cli.command {
        Commands::Repo { command } => match command {
            RepoCommands::List { json } => commands::repo::list(&service, json).await,
            RepoCommands::Add { name, url } => commands::repo::add(&service, &name, &url).await,
            RepoCommands::Remove { url } => commands::repo::remove(&service, &url).await,
            RepoCommands::Enable { url } => commands::repo::set_enabled(&service, &url, true).await,
            RepoCommands::Disable { url } => {
                commands::repo::set_enabled(&service, &url, false).await
            }
        },

        Commands::Catalog {
            search,
            category,
            json,
        } => {
            commands::catalog::run(&service, search.as_deref(), category.as_deref(), json).await
        }

        Commands::Show { module, json } => commands::show::run(&service, &module, json).await,

        Commands::Install { module, version } => {
            commands::install::run(&service, &module, version.as_deref()).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_install_accepts_version() {
        let cli = Cli::try_parse_from(["modcat", "install", "redis", "--version", "1.2.0"]).unwrap();
        match cli.command {
            Commands::Install { module, version } => {
                assert_eq!(module, "redis");
                assert_eq!(version.as_deref(), Some("1.2.0"));
            }
            _ => panic!("expected install command"),
        }
    }

    #[test]
    fn test_top_level_version_flag() {
        let err = Cli::try_parse_from(["modcat", "--version"]).err().unwrap();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }
}
