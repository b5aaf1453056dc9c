//! Error types for Signwall
//!
//! Centralized error handling using thiserror. None of these ever reach the
//! screen: fetch failures keep the last good frame, rotation failures fall
//! back to the instruction page.

use thiserror::Error;

use crate::domain::Lane;

/// All error types that can occur in Signwall
#[derive(Debug, Error)]
pub enum SignwallError {
    /// Snapshot refresh failed
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// No lane has anything to show
    #[error("Working set is empty")]
    EmptyWorkingSet,

    /// A page index does not fit the lane it was computed for
    #[error("Page {page_index} out of range for {lane} lane ({max_pages} pages)")]
    RenderInput {
        lane: Lane,
        page_index: usize,
        max_pages: usize,
    },

    /// Invalid configuration value
    #[error("Config error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised while fetching a snapshot
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Source returned status {status}")]
    Status { status: u16 },

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Read error: {0}")]
    Read(#[from] std::io::Error),

    #[error("Source unavailable: {0}")]
    Unavailable(String),
}

/// Result type alias for Signwall operations
pub type Result<T> = std::result::Result<T, SignwallError>;
