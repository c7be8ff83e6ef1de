//! CLI error types with exit code handling
//!
//! This module provides a unified error type for CLI operations that
//! maps errors to appropriate exit codes.

use miette::Diagnostic;
use thiserror::Error;

use modcat_repo::RepoError;

use crate::exit_codes;

/// CLI-specific error type that includes exit code information
#[derive(Error, Debug, Diagnostic, Clone)]
pub enum CliError {
    /// Repository input rejected
    #[error("Validation failed: {message}")]
    #[diagnostic(code(modcat::cli::validation))]
    Validation {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// Every enabled repository failed during refresh
    #[error("{message}")]
    #[diagnostic(code(modcat::cli::catalog_unavailable))]
    CatalogUnavailable {
        message: String,
        sources: Vec<String>,
        #[help]
        help: String,
    },

    /// Module or version not in the catalog
    #[error("{message}")]
    #[diagnostic(code(modcat::cli::not_found))]
    NotFound {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// Installation is a stub
    #[error("Installing {module} is not available yet")]
    #[diagnostic(
        code(modcat::cli::install_unavailable),
        help("Module installation is coming soon; the catalog entry was resolved successfully")
    )]
    InstallUnavailable { module: String },

    /// IO or storage error
    #[error("IO error: {message}")]
    #[diagnostic(code(modcat::cli::io))]
    Io { message: String },

    /// Internal error (runtime, unexpected failure)
    #[error("Internal error: {message}")]
    #[diagnostic(code(modcat::cli::internal))]
    Internal { message: String },
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Validation { .. } => exit_codes::VALIDATION_ERROR,
            CliError::CatalogUnavailable { .. } => exit_codes::CATALOG_UNAVAILABLE,
            CliError::NotFound { .. } => exit_codes::NOT_FOUND,
            CliError::InstallUnavailable { .. } => exit_codes::INSTALL_UNAVAILABLE,
            CliError::Io { .. } => exit_codes::IO_ERROR,
            CliError::Internal { .. } => exit_codes::ERROR,
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            help: None,
        }
    }

    /// Create a not-found error with help text
    pub fn not_found_with_help(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
            help: Some(help.into()),
        }
    }
}

impl From<RepoError> for CliError {
    fn from(err: RepoError) -> Self {
        if err.is_validation() {
            return CliError::validation(err.to_string());
        }

        let message = err.to_string();
        match err {
            RepoError::AllSourcesFailed { failures } => {
                let sources: Vec<String> = failures.iter().map(|f| f.to_string()).collect();
                let help = format!(
                    "Unreachable repositories:\n{}\nCheck repository URLs with 'modcat repo list', or disable unreachable ones",
                    sources
                        .iter()
                        .map(|s| format!("  - {}", s))
                        .collect::<Vec<_>>()
                        .join("\n")
                );
                CliError::CatalogUnavailable {
                    message,
                    sources,
                    help,
                }
            }
            RepoError::Io(e) => CliError::Io {
                message: e.to_string(),
            },
            RepoError::Storage { message } => CliError::Io { message },
            _ => CliError::internal(message),
        }
    }
}

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
