//! Entry records and their wire representation

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single displayable entry, immutable once fetched
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Stable identifier, unique within one snapshot
    pub id: String,

    /// Free text shown on screen
    pub content: String,

    pub created_at: DateTime<Utc>,

    /// Optional tag naming the lane this entry belongs to at the source
    pub affinity: Option<String>,
}

impl Entry {
    /// Create an entry without a lane affinity
    pub fn new(id: impl Into<String>, content: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            created_at,
            affinity: None,
        }
    }

    /// Set the lane affinity tag
    pub fn with_affinity(mut self, affinity: impl Into<String>) -> Self {
        self.affinity = Some(affinity.into());
        self
    }

    /// Short human age relative to `now` ("Just now", "3h ago", "2w ago", ...)
    pub fn relative_age(&self, now: DateTime<Utc>) -> String {
        let hours = (now - self.created_at).num_hours().max(0);
        let days = hours / 24;

        if hours < 1 {
            "Just now".to_string()
        } else if hours < 24 {
            format!("{}h ago", hours)
        } else if days < 7 {
            format!("{}d ago", days)
        } else if days < 30 {
            format!("{}w ago", days / 7)
        } else if days < 365 {
            format!("{}mo ago", days / 30)
        } else {
            format!("{}y ago", days / 365)
        }
    }

    /// Long form creation date, e.g. "June 1, 2:05 PM"
    pub fn display_date(&self) -> String {
        self.created_at.format("%B %-d, %-I:%M %p").to_string()
    }
}

/// Entry as it arrives from a snapshot source.
///
/// Every field is an untyped optional value so one malformed row never sinks
/// a whole snapshot; `into_entry` decides what is usable.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WireEntry {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub content: Option<Value>,
    #[serde(default, alias = "createdAt", alias = "timestamp")]
    pub created_at: Option<Value>,
    #[serde(default, alias = "affinity", alias = "lane")]
    pub season: Option<Value>,
}

impl WireEntry {
    /// Convert to an `Entry`, or explain why the row is unusable
    pub fn into_entry(self) -> Result<Entry, String> {
        let id = match self.id {
            Some(Value::String(s)) if !s.is_empty() => s,
            Some(Value::Number(n)) => n.to_string(),
            Some(other) => return Err(format!("unusable id {}", other)),
            None => return Err("missing id".to_string()),
        };

        let content = match self.content {
            Some(Value::String(s)) => s,
            Some(other) => return Err(format!("entry {} has non-text content {}", id, other)),
            None => return Err(format!("entry {} has no content", id)),
        };

        let raw_ts = self
            .created_at
            .ok_or_else(|| format!("entry {} has no created_at", id))?;
        let created_at =
            timestamp_from_value(&raw_ts).ok_or_else(|| format!("entry {} has bad created_at {}", id, raw_ts))?;

        // A malformed tag only loses the routing hint, not the entry
        let affinity = match self.season {
            Some(Value::String(s)) if !s.is_empty() => Some(s),
            _ => None,
        };

        Ok(Entry {
            id,
            content,
            created_at,
            affinity,
        })
    }
}

/// Epoch values above this are milliseconds rather than seconds
const EPOCH_MILLIS_THRESHOLD: i64 = 1_000_000_000_000;

/// Timestamp from a string or a Unix epoch number (seconds or milliseconds)
pub(crate) fn timestamp_from_value(raw: &Value) -> Option<DateTime<Utc>> {
    match raw {
        Value::String(s) => parse_timestamp(s),
        Value::Number(n) => {
            let epoch = n.as_i64()?;
            if epoch.abs() >= EPOCH_MILLIS_THRESHOLD {
                DateTime::from_timestamp_millis(epoch)
            } else {
                DateTime::from_timestamp(epoch, 0)
            }
        }
        _ => None,
    }
}

/// Parse RFC 3339 timestamps, plus the offset-less form some stores emit
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}
