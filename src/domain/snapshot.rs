//! Snapshot - one complete answer from a snapshot source

use chrono::{DateTime, Utc};
use log::warn;
use serde::Deserialize;
use serde_json::Value;

use super::entry::{Entry, WireEntry, timestamp_from_value};

/// Everything a source knows at one instant.
///
/// `archive_entries` is `None` when the source has no archive lane at all,
/// and `Some(vec![])` when it has one that is currently empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    /// Primary lane, newest first as supplied by the source
    pub primary_entries: Vec<Entry>,
    /// Bounded random sample of a much larger archive
    pub archive_entries: Option<Vec<Entry>>,
    pub total_primary: u64,
    pub total_archive: Option<u64>,
    pub generated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireSnapshot {
    // Rows stay untyped until each one is converted on its own
    #[serde(default, alias = "prayers", alias = "entries")]
    wall: Option<Vec<Value>>,
    #[serde(default)]
    archive_sample: Option<Vec<Value>>,
    #[serde(default, alias = "total")]
    total_wall: Option<u64>,
    #[serde(default)]
    total_archive: Option<u64>,
    #[serde(default)]
    generated_at: Option<Value>,
}

impl Snapshot {
    /// Snapshot with only a primary lane
    pub fn new(primary_entries: Vec<Entry>) -> Self {
        let total_primary = primary_entries.len() as u64;
        Self {
            primary_entries,
            archive_entries: None,
            total_primary,
            total_archive: None,
            generated_at: None,
        }
    }

    /// Attach an archive sample
    pub fn with_archive(mut self, archive: Vec<Entry>, total_archive: u64) -> Self {
        self.archive_entries = Some(archive);
        self.total_archive = Some(total_archive);
        self
    }

    /// Parse a snapshot body, dropping malformed entries instead of failing
    pub fn from_json(body: &str) -> Result<Self, serde_json::Error> {
        let wire: WireSnapshot = serde_json::from_str(body)?;

        let primary_entries = convert_entries(wire.wall.unwrap_or_default(), "primary");
        let archive_entries = wire.archive_sample.map(|list| convert_entries(list, "archive"));

        let total_primary = wire.total_wall.unwrap_or(primary_entries.len() as u64);
        let total_archive = match (&archive_entries, wire.total_archive) {
            (_, Some(total)) => Some(total),
            (Some(list), None) => Some(list.len() as u64),
            (None, None) => None,
        };

        Ok(Self {
            primary_entries,
            archive_entries,
            total_primary,
            total_archive,
            generated_at: wire.generated_at.as_ref().and_then(timestamp_from_value),
        })
    }

    /// Move primary entries tagged with `affinity` into the archive lane.
    ///
    /// Only applies when the source did not supply an archive list itself.
    pub fn route_affinity(mut self, affinity: &str) -> Self {
        if self.archive_entries.is_some() {
            return self;
        }

        let (archive, primary): (Vec<Entry>, Vec<Entry>) = self
            .primary_entries
            .into_iter()
            .partition(|e| e.affinity.as_deref() == Some(affinity));

        self.total_primary = self.total_primary.saturating_sub(archive.len() as u64);
        self.total_archive = Some(archive.len() as u64);
        self.primary_entries = primary;
        self.archive_entries = Some(archive);
        self
    }

    /// Whether the source supports an archive lane
    pub fn has_archive_lane(&self) -> bool {
        self.archive_entries.is_some()
    }
}

fn convert_entries(raw: Vec<Value>, lane: &str) -> Vec<Entry> {
    raw.into_iter()
        .filter_map(|row| match convert_row(row) {
            Ok(entry) => Some(entry),
            Err(reason) => {
                warn!("Dropping {} entry: {}", lane, reason);
                None
            }
        })
        .collect()
}

fn convert_row(row: Value) -> Result<Entry, String> {
    let wire: WireEntry = serde_json::from_value(row).map_err(|e| format!("unreadable row: {}", e))?;
    wire.into_entry()
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"{
        "wall": [
            {"id": "w1", "content": "first", "created_at": "2025-06-01T10:00:00Z", "season": "prayer_wall"},
            {"id": "w2", "content": "second", "created_at": "2025-05-01T10:00:00Z", "season": "prayer_wall"}
        ],
        "archiveSample": [
            {"id": 7, "content": "old one", "created_at": "2025-01-01T10:00:00Z", "season": "jubilee_2025"}
        ],
        "totalWall": 2,
        "totalArchive": 4000,
        "generatedAt": "2025-06-01T12:00:00Z"
    }"#;

    #[test]
    fn test_parse_full_snapshot() {
        let snap = Snapshot::from_json(FULL).unwrap();
        assert_eq!(snap.primary_entries.len(), 2);
        assert_eq!(snap.primary_entries[0].id, "w1");
        assert_eq!(snap.archive_entries.as_ref().map(Vec::len), Some(1));
        assert_eq!(snap.total_primary, 2);
        assert_eq!(snap.total_archive, Some(4000));
        assert!(snap.generated_at.is_some());
        assert!(snap.has_archive_lane());
    }

    #[test]
    fn test_parse_legacy_paginated_shape() {
        let body = r#"{"prayers":[{"id":"1","content":"a","created_at":"2025-06-01T10:00:00Z"}],"total":31,"page":1,"limit":50}"#;
        let snap = Snapshot::from_json(body).unwrap();
        assert_eq!(snap.primary_entries.len(), 1);
        assert_eq!(snap.total_primary, 31);
        assert!(!snap.has_archive_lane());
        assert_eq!(snap.total_archive, None);
    }

    #[test]
    fn test_malformed_entries_are_dropped() {
        let body = r#"{"wall":[
            {"id":"1","content":"ok","created_at":"2025-06-01T10:00:00Z"},
            {"id":"2","created_at":"2025-06-01T10:00:00Z"},
            {"content":"no id","created_at":"2025-06-01T10:00:00Z"},
            {"id":"4","content":"bad date","created_at":"soon"}
        ]}"#;
        let snap = Snapshot::from_json(body).unwrap();
        assert_eq!(snap.primary_entries.len(), 1);
        assert_eq!(snap.total_primary, 1);
    }

    #[test]
    fn test_epoch_created_at_is_kept() {
        let body = r#"{"wall":[
            {"id":"1","content":"epoch","created_at":1748772000},
            {"id":"2","content":"text","created_at":"2025-06-01T10:00:00Z"}
        ]}"#;
        let snap = Snapshot::from_json(body).unwrap();
        assert_eq!(snap.primary_entries.len(), 2);
        assert_eq!(snap.primary_entries[0].created_at, snap.primary_entries[1].created_at);
    }

    #[test]
    fn test_numeric_content_drops_only_that_row() {
        let body = r#"{"wall":[
            {"id":"1","content":42,"created_at":"2025-06-01T10:00:00Z"},
            {"id":"2","content":"kept","created_at":"2025-06-01T10:00:00Z"}
        ],"archiveSample":[
            {"id":"a","content":["list"],"created_at":"2025-01-01T10:00:00Z"},
            {"id":"b","content":"kept too","created_at":"2025-01-01T10:00:00Z"}
        ]}"#;
        let snap = Snapshot::from_json(body).unwrap();
        assert_eq!(snap.primary_entries.len(), 1);
        assert_eq!(snap.primary_entries[0].id, "2");
        assert_eq!(snap.archive_entries.unwrap()[0].id, "b");
    }

    #[test]
    fn test_null_and_scalar_rows_dropped() {
        let body = r#"{"wall":[
            null,
            {"id":"2","content":"kept","created_at":"2025-06-01T10:00:00Z"},
            "stray",
            7
        ]}"#;
        let snap = Snapshot::from_json(body).unwrap();
        assert_eq!(snap.primary_entries.len(), 1);
        assert_eq!(snap.primary_entries[0].id, "2");
        assert_eq!(snap.total_primary, 1);
    }

    #[test]
    fn test_epoch_generated_at() {
        let snap = Snapshot::from_json(r#"{"wall":[],"generatedAt":1748772000}"#).unwrap();
        assert_eq!(snap.generated_at.map(|dt| dt.timestamp()), Some(1748772000));
    }

    #[test]
    fn test_empty_archive_is_still_a_lane() {
        let body = r#"{"wall":[],"archiveSample":[]}"#;
        let snap = Snapshot::from_json(body).unwrap();
        assert!(snap.has_archive_lane());
        assert_eq!(snap.total_archive, Some(0));
    }

    #[test]
    fn test_null_lists_tolerated() {
        let snap = Snapshot::from_json(r#"{"wall":null,"archiveSample":null}"#).unwrap();
        assert!(snap.primary_entries.is_empty());
        assert!(!snap.has_archive_lane());
    }

    #[test]
    fn test_not_json_fails() {
        assert!(Snapshot::from_json("<html>502</html>").is_err());
    }

    #[test]
    fn test_route_affinity_moves_tagged_entries() {
        let now = Utc::now();
        let snap = Snapshot::new(vec![
            Entry::new("1", "a", now).with_affinity("wall"),
            Entry::new("2", "b", now).with_affinity("archive"),
            Entry::new("3", "c", now),
        ])
        .route_affinity("archive");

        let ids: Vec<&str> = snap.primary_entries.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);
        assert_eq!(snap.archive_entries.as_ref().unwrap()[0].id, "2");
        assert_eq!(snap.total_primary, 2);
        assert_eq!(snap.total_archive, Some(1));
    }

    #[test]
    fn test_route_affinity_keeps_supplied_archive() {
        let snap = Snapshot::from_json(FULL).unwrap().route_affinity("prayer_wall");
        assert_eq!(snap.primary_entries.len(), 2);
        assert_eq!(snap.archive_entries.unwrap().len(), 1);
    }
}
