//! Catalog fetching
//!
//! Turns one repository into a parsed catalog or a typed failure. Each
//! fetch stands alone: no retries, no shared state between repositories.

use async_trait::async_trait;
use std::time::Duration;

use modcat_core::{RawCatalog, Repository};

use crate::config::Settings;
use crate::error::{FetchError, RepoError, Result};

/// Source of catalog documents
///
/// Implementations must be Send + Sync; the aggregator fetches every
/// repository on its own task.
#[async_trait]
pub trait CatalogFetcher: Send + Sync {
    /// Fetch and parse the catalog published at `repository.url`
    ///
    /// Every returned module carries `source = repository.url`.
    async fn fetch(&self, repository: &Repository) -> std::result::Result<RawCatalog, FetchError>;
}

/// Fetches catalog documents over HTTP(S)
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Create a fetcher with the given per-request timeout and user agent
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| RepoError::InvalidConfig {
                message: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self { client })
    }

    /// Create a fetcher from settings
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Self::new(settings.request_timeout, &settings.user_agent)
    }
}

#[async_trait]
impl CatalogFetcher for HttpFetcher {
    async fn fetch(&self, repository: &Repository) -> std::result::Result<RawCatalog, FetchError> {
        let url = repository.url.as_str();
        tracing::debug!(repository = %repository.name, url, "Fetching catalog");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))?;

        let mut catalog = RawCatalog::from_slice(&body).map_err(|e| FetchError::ParseError {
            url: url.to_string(),
            message: e.to_string(),
        })?;
        catalog.stamp_source(url);

        tracing::debug!(
            repository = %repository.name,
            modules = catalog.modules.len(),
            "Fetched catalog"
        );
        Ok(catalog)
    }
}
