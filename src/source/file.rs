//! Local file snapshot source, for kiosks without network access

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::SnapshotSource;
use crate::domain::Snapshot;
use crate::error::FetchError;

/// Reads a snapshot in the HTTP endpoint's JSON shape from disk
pub struct FileSnapshotSource {
    path: PathBuf,
}

impl FileSnapshotSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl SnapshotSource for FileSnapshotSource {
    async fn fetch_snapshot(&self) -> Result<Snapshot, FetchError> {
        let body = tokio::fs::read_to_string(&self.path).await?;
        Ok(Snapshot::from_json(&body)?)
    }

    fn describe(&self) -> String {
        format!("file:{}", self.path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_reads_snapshot_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"entries":[{{"id":"1","content":"hello","created_at":"2025-06-01T10:00:00Z"}}]}}"#
        )
        .unwrap();

        let source = FileSnapshotSource::new(file.path());
        let snapshot = source.fetch_snapshot().await.unwrap();
        assert_eq!(snapshot.primary_entries.len(), 1);
        assert_eq!(snapshot.primary_entries[0].content, "hello");
    }

    #[tokio::test]
    async fn test_missing_file_is_read_error() {
        let source = FileSnapshotSource::new("/nonexistent/snapshot.json");
        let err = source.fetch_snapshot().await.unwrap_err();
        assert!(matches!(err, FetchError::Read(_)));
    }

    #[tokio::test]
    async fn test_garbage_file_is_parse_error() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let source = FileSnapshotSource::new(file.path());
        assert!(matches!(source.fetch_snapshot().await, Err(FetchError::Parse(_))));
    }
}
