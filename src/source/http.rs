//! HTTP snapshot source

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use super::SnapshotSource;
use crate::domain::Snapshot;
use crate::error::{FetchError, Result, SignwallError};

/// GETs a snapshot from the store's JSON endpoint
pub struct HttpSnapshotSource {
    client: Client,
    url: String,
}

impl HttpSnapshotSource {
    /// Create a source for `url`; `timeout` of `None` keeps the transport default
    pub fn new(url: impl Into<String>, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| SignwallError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl SnapshotSource for HttpSnapshotSource {
    async fn fetch_snapshot(&self) -> std::result::Result<Snapshot, FetchError> {
        let response = self
            .client
            .get(&self.url)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        Ok(Snapshot::from_json(&body)?)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}
