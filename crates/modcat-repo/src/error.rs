//! Error types for catalog aggregation

use thiserror::Error;

/// Registry and aggregation errors
#[derive(Debug, Error)]
pub enum RepoError {
    // ============ Validation Errors ============
    #[error("Invalid repository URL: {url} - {reason}")]
    InvalidRepositoryUrl { url: String, reason: String },

    #[error("Invalid repository name: {reason}")]
    InvalidRepositoryName { reason: String },

    #[error("Repository URL already exists: {url}")]
    RepositoryAlreadyExists { url: String },

    // ============ Aggregation Errors ============
    #[error("Failed to fetch any catalogs ({} sources failed). Check repository URLs.", failures.len())]
    AllSourcesFailed { failures: Vec<SourceFailure> },

    #[error("Refresh task stopped before completing: {message}")]
    RefreshAborted { message: String },

    // ============ Configuration Errors ============
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    // ============ Storage Errors ============
    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl RepoError {
    /// Whether the error rejected malformed repository input
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            RepoError::InvalidRepositoryUrl { .. }
                | RepoError::InvalidRepositoryName { .. }
                | RepoError::RepositoryAlreadyExists { .. }
        )
    }
}

/// Result type for registry and aggregation operations
pub type Result<T> = std::result::Result<T, RepoError>;

impl From<serde_json::Error> for RepoError {
    fn from(e: serde_json::Error) -> Self {
        RepoError::Serialization(e.to_string())
    }
}

impl From<serde_yaml::Error> for RepoError {
    fn from(e: serde_yaml::Error) -> Self {
        RepoError::Serialization(e.to_string())
    }
}

/// Failure to fetch one repository's catalog
///
/// Contained to that repository; only escalates when every source fails.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("HTTP {status} from {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Invalid catalog document at {url}: {message}")]
    ParseError { url: String, message: String },

    #[error("Network error fetching {url}: {message}")]
    NetworkError { url: String, message: String },
}

impl FetchError {
    /// Map a transport error from reqwest
    pub fn from_reqwest(url: &str, e: reqwest::Error) -> Self {
        if let Some(status) = e.status() {
            FetchError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            }
        } else if e.is_timeout() {
            FetchError::NetworkError {
                url: url.to_string(),
                message: "Request timed out".to_string(),
            }
        } else if e.is_connect() {
            FetchError::NetworkError {
                url: url.to_string(),
                message: format!("Connection failed: {}", e),
            }
        } else if e.is_decode() {
            FetchError::ParseError {
                url: url.to_string(),
                message: e.to_string(),
            }
        } else {
            FetchError::NetworkError {
                url: url.to_string(),
                message: e.to_string(),
            }
        }
    }
}

/// A repository that could not be fetched during a refresh
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFailure {
    /// Repository name
    pub name: String,
    /// Repository URL
    pub url: String,
    /// Why the fetch failed
    pub error: FetchError,
}

impl std::fmt::Display for SourceFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.name, self.error)
    }
}
