//! Data Refresher - keeps the Working Set fresh in the background
//!
//! Fetches once immediately, then on a fixed interval. A successful fetch is
//! classified and published as a whole new `WorkingSet`; a failed one is
//! logged and the previous set stays exactly as it was.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::config::Config;
use crate::error::FetchError;
use crate::lanes::{SharedWorkingSet, WorkingSet};
use crate::source::SnapshotSource;

/// Settings the refresher needs from the wider config
#[derive(Debug, Clone)]
pub struct RefreshSettings {
    pub interval: Duration,
    pub recent_window: chrono::Duration,
    pub archive_affinity: Option<String>,
}

impl Default for RefreshSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(300),
            recent_window: chrono::Duration::days(7),
            archive_affinity: None,
        }
    }
}

impl From<&Config> for RefreshSettings {
    fn from(config: &Config) -> Self {
        Self {
            interval: config.refresh.interval(),
            recent_window: config.refresh.recent_window(),
            archive_affinity: config.source.archive_affinity.clone(),
        }
    }
}

/// What a successful refresh did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshOutcome {
    pub recent: usize,
    pub older: usize,
    pub archive: usize,
    /// Whether the content differs from the set it replaced
    pub changed: bool,
}

/// Sole writer of the shared Working Set
pub struct Refresher {
    source: Arc<dyn SnapshotSource>,
    working_set: SharedWorkingSet,
    settings: RefreshSettings,
}

impl Refresher {
    pub fn new(source: Arc<dyn SnapshotSource>, working_set: SharedWorkingSet, settings: RefreshSettings) -> Self {
        Self {
            source,
            working_set,
            settings,
        }
    }

    /// Fetch and publish one snapshot, classifying against the current time
    pub async fn refresh(&self) -> Result<RefreshOutcome, FetchError> {
        self.refresh_at(Utc::now()).await
    }

    /// Fetch and publish one snapshot, classifying against `now`
    pub async fn refresh_at(&self, now: DateTime<Utc>) -> Result<RefreshOutcome, FetchError> {
        let mut snapshot = self.source.fetch_snapshot().await?;
        if let Some(affinity) = &self.settings.archive_affinity {
            snapshot = snapshot.route_affinity(affinity);
        }

        let set = WorkingSet::classify(snapshot, now, self.settings.recent_window);
        let changed = set.fingerprint() != self.working_set.current().fingerprint();
        let outcome = RefreshOutcome {
            recent: set.recent().len(),
            older: set.older().len(),
            archive: set.archive().len(),
            changed,
        };

        self.working_set.publish(set);
        Ok(outcome)
    }

    /// Refresh now and then every interval until `shutdown` flips to true.
    ///
    /// Failures never end the loop; the display keeps its stale set. A fetch
    /// in flight is abandoned as soon as shutdown is requested.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        info!(
            "Refresher started: source={}, interval={:?}",
            self.source.describe(),
            self.settings.interval
        );

        let mut interval = tokio::time::interval(self.settings.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    tokio::select! {
                        result = self.refresh() => self.log_outcome(result),
                        _ = shutdown_requested(&mut shutdown) => {
                            debug!("Shutdown during fetch from {}", self.source.describe());
                            break;
                        }
                    }
                }
                _ = shutdown_requested(&mut shutdown) => break,
            }
        }

        info!("Refresher stopped");
    }

    fn log_outcome(&self, result: Result<RefreshOutcome, FetchError>) {
        match result {
            Ok(outcome) if outcome.changed => info!(
                "Working set refreshed: {} recent, {} older, {} archive",
                outcome.recent, outcome.older, outcome.archive
            ),
            Ok(_) => debug!("Snapshot unchanged"),
            Err(e) => warn!(
                "Refresh from {} failed, keeping previous working set: {}",
                self.source.describe(),
                e
            ),
        }
    }

    /// Run on a background task
    pub fn spawn(self, shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
        tokio::spawn(self.run(shutdown))
    }
}

/// Resolves once shutdown is requested or the sender is gone
async fn shutdown_requested(shutdown: &mut watch::Receiver<bool>) {
    loop {
        if *shutdown.borrow_and_update() {
            return;
        }
        if shutdown.changed().await.is_err() {
            return;
        }
    }
}
