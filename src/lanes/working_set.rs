//! Working Set - the classified, immutable view of the latest snapshot
//!
//! A `WorkingSet` is built once per successful refresh and never mutated
//! afterwards. `SharedWorkingSet` publishes new ones by swapping an `Arc`
//! inside a `tokio::sync::watch` channel, so readers always see either the
//! old set or the new one, never a mix.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use sha2::{Digest, Sha256};
use tokio::sync::watch;

use crate::domain::{Entry, Lane, Snapshot};

/// Lanes derived from one snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct WorkingSet {
    recent: Vec<Entry>,
    older: Vec<Entry>,
    archive: Option<Vec<Entry>>,
    total_primary: u64,
    total_archive: Option<u64>,
    classified_at: Option<DateTime<Utc>>,
    fingerprint: String,
}

impl Default for WorkingSet {
    fn default() -> Self {
        Self::empty()
    }
}

impl WorkingSet {
    /// Set in place before the first successful refresh
    pub fn empty() -> Self {
        Self {
            recent: Vec::new(),
            older: Vec::new(),
            archive: None,
            total_primary: 0,
            total_archive: None,
            classified_at: None,
            fingerprint: fingerprint_lanes(&[], &[], None),
        }
    }

    /// Split the snapshot's primary lane into recent and older.
    ///
    /// An entry is recent when it was created strictly after `now - window`.
    /// Source order is preserved inside each lane. A window reaching past the
    /// earliest representable instant makes every entry recent.
    pub fn classify(snapshot: Snapshot, now: DateTime<Utc>, window: Duration) -> Self {
        let cutoff = now.checked_sub_signed(window).unwrap_or(DateTime::<Utc>::MIN_UTC);
        let (recent, older): (Vec<Entry>, Vec<Entry>) = snapshot
            .primary_entries
            .into_iter()
            .partition(|e| e.created_at > cutoff);

        let fingerprint = fingerprint_lanes(&recent, &older, snapshot.archive_entries.as_deref());

        Self {
            recent,
            older,
            archive: snapshot.archive_entries,
            total_primary: snapshot.total_primary,
            total_archive: snapshot.total_archive,
            classified_at: Some(now),
            fingerprint,
        }
    }

    /// Entries in `lane`; the instruction lane and a missing archive are empty
    pub fn lane(&self, lane: Lane) -> &[Entry] {
        match lane {
            Lane::Recent => &self.recent,
            Lane::Older => &self.older,
            Lane::Archive => self.archive.as_deref().unwrap_or(&[]),
            Lane::Instruction => &[],
        }
    }

    pub fn recent(&self) -> &[Entry] {
        &self.recent
    }

    pub fn older(&self) -> &[Entry] {
        &self.older
    }

    pub fn archive(&self) -> &[Entry] {
        self.lane(Lane::Archive)
    }

    /// Whether the source supplies an archive lane at all
    pub fn has_archive_lane(&self) -> bool {
        self.archive.is_some()
    }

    /// Entries held across all lanes
    pub fn total_entries(&self) -> usize {
        self.recent.len() + self.older.len() + self.archive().len()
    }

    pub fn is_empty(&self) -> bool {
        self.total_entries() == 0
    }

    /// Primary-lane total as reported by the source
    pub fn total_primary(&self) -> u64 {
        self.total_primary
    }

    /// Archive population as reported by the source
    pub fn total_archive(&self) -> Option<u64> {
        self.total_archive
    }

    /// When this set was classified; `None` until the first refresh lands
    pub fn classified_at(&self) -> Option<DateTime<Utc>> {
        self.classified_at
    }

    pub fn is_loaded(&self) -> bool {
        self.classified_at.is_some()
    }

    /// Hex SHA-256 over the ids and contents of every lane
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// First eight hex digits of the fingerprint
    pub fn short_fingerprint(&self) -> &str {
        &self.fingerprint[..8]
    }
}

fn fingerprint_lanes(recent: &[Entry], older: &[Entry], archive: Option<&[Entry]>) -> String {
    let mut hasher = Sha256::new();
    let lanes = [("recent", Some(recent)), ("older", Some(older)), ("archive", archive)];
    for (name, entries) in lanes {
        hasher.update(name.as_bytes());
        hasher.update([0u8]);
        for entry in entries.into_iter().flatten() {
            hasher.update(entry.id.as_bytes());
            hasher.update([0u8]);
            hasher.update(entry.content.as_bytes());
            hasher.update([b'\n']);
        }
    }
    hex::encode(hasher.finalize())
}

/// Single-writer publication point for the current `WorkingSet`
#[derive(Debug, Clone)]
pub struct SharedWorkingSet {
    tx: Arc<watch::Sender<Arc<WorkingSet>>>,
}

impl Default for SharedWorkingSet {
    fn default() -> Self {
        Self::new()
    }
}

impl SharedWorkingSet {
    /// Start from an empty, not-yet-loaded set
    pub fn new() -> Self {
        Self::with_initial(WorkingSet::empty())
    }

    pub fn with_initial(set: WorkingSet) -> Self {
        let (tx, _rx) = watch::channel(Arc::new(set));
        Self { tx: Arc::new(tx) }
    }

    /// The set as of right now; later publishes do not affect it
    pub fn current(&self) -> Arc<WorkingSet> {
        self.tx.borrow().clone()
    }

    /// Replace the whole set, returning the one now in place
    pub fn publish(&self, set: WorkingSet) -> Arc<WorkingSet> {
        let set = Arc::new(set);
        self.tx.send_replace(Arc::clone(&set));
        set
    }

    /// Receiver that wakes whenever a new set is published
    pub fn subscribe(&self) -> watch::Receiver<Arc<WorkingSet>> {
        self.tx.subscribe()
    }
}
