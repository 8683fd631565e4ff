//! Snapshot fetcher: one GET against the engine's status endpoint
//!
//! No retries. A failed fetch is simply followed by the next poll tick.

use std::time::Duration;
use crate::types::{EngineError, Snapshot};
use crate::REQUEST_TIMEOUT_MS;

/// Build the HTTP client shared by the fetcher and dispatcher
pub fn http_client() -> Result<reqwest::Client, EngineError> {
    reqwest::Client::builder()
        .timeout(Duration::from_millis(REQUEST_TIMEOUT_MS))
        .build()
        .map_err(|e| EngineError::Transport(format!("failed to build HTTP client: {}", e)))
}

/// Reads status snapshots from the engine
#[derive(Debug, Clone)]
pub struct SnapshotFetcher {
    http: reqwest::Client,
    url: String,
}

impl SnapshotFetcher {
    /// Create fetcher for a full status URL
    pub fn new(http: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch and decode one snapshot
    pub async fn fetch(&self) -> Result<Snapshot, EngineError> {
        let response = self.http.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(EngineError::Transport(format!("{} returned HTTP {}", self.url, status)));
        }

        let body = response.bytes().await?;
        Ok(Snapshot::from_json(&body)?)
    }
}
