//! Snapshot sources
//!
//! The rotation engine needs exactly one thing from the outside world: a
//! periodic snapshot of entries. This module provides:
//! - `SnapshotSource` trait for that capability
//! - `HttpSnapshotSource` for the store's JSON endpoint
//! - `FileSnapshotSource` for a local snapshot file
//! - `MockSnapshotSource` with scripted responses for tests

pub mod file;
pub mod http;
pub mod mock;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::config::SourceConfig;
use crate::domain::Snapshot;
use crate::error::{FetchError, Result, SignwallError};

pub use file::FileSnapshotSource;
pub use http::HttpSnapshotSource;
pub use mock::MockSnapshotSource;

/// Anything that can produce a snapshot on demand
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    /// Fetch one complete snapshot; failure means "no update this cycle"
    async fn fetch_snapshot(&self) -> std::result::Result<Snapshot, FetchError>;

    /// Short description for logs
    fn describe(&self) -> String;
}

/// Build the source named by config; a file wins over a URL
pub fn from_config(config: &SourceConfig) -> Result<Arc<dyn SnapshotSource>> {
    if let Some(path) = &config.file {
        return Ok(Arc::new(FileSnapshotSource::new(path)));
    }

    match &config.url {
        Some(url) => {
            let timeout = config.timeout_ms.map(Duration::from_millis);
            Ok(Arc::new(HttpSnapshotSource::new(url, timeout)?))
        }
        None => Err(SignwallError::Config("no snapshot source configured".to_string())),
    }
}
