//! The one asynchronous boundary: fetching the published case table.
//!
//! A single GET, no retry and no backoff. Failures are handed to
//! [`Catalog::from_fetch`], which substitutes the sample dataset.

use std::time::Duration;

use crate::algo::catalog::{Catalog, LoadOutcome};
use crate::config::ArchiveConfig;
use crate::error::{ArchiveError, Result};

pub struct TableFetcher {
    client: reqwest::Client,
    url: String,
}

impl TableFetcher {
    pub fn new(config: &ArchiveConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ArchiveError::Network(e.to_string()))?;

        Ok(Self {
            client,
            url: config.source_url.clone(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch the raw table text.
    pub async fn fetch_text(&self) -> Result<String> {
        tracing::debug!(url = %self.url, "fetching case table");

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| ArchiveError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ArchiveError::Http {
                status: status.as_u16(),
                url: self.url.clone(),
            });
        }

        let text = response
            .text()
            .await
            .map_err(|e| ArchiveError::Network(e.to_string()))?;
        tracing::debug!(url = %self.url, bytes = text.len(), "fetched case table");
        Ok(text)
    }
}

/// Fetch and ingest, falling back to the sample dataset on any failure.
pub async fn load_catalog(fetcher: &TableFetcher) -> LoadOutcome {
    Catalog::from_fetch(fetcher.fetch_text().await)
}
