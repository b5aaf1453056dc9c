//! Scripted snapshot source for tests

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use super::SnapshotSource;
use crate::domain::Snapshot;
use crate::error::FetchError;

enum Scripted {
    Ok(Snapshot),
    Err(String),
    Hang,
}

/// Returns queued responses in order; an empty queue fails every call
#[derive(Default)]
pub struct MockSnapshotSource {
    responses: Mutex<VecDeque<Scripted>>,
    calls: AtomicUsize,
}

impl MockSnapshotSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful snapshot
    pub fn push_ok(&self, snapshot: Snapshot) {
        self.queue(Scripted::Ok(snapshot));
    }

    /// Queue a failure
    pub fn push_err(&self, message: impl Into<String>) {
        self.queue(Scripted::Err(message.into()));
    }

    /// Queue a fetch that never completes, like a store that stopped answering
    pub fn push_hang(&self) {
        self.queue(Scripted::Hang);
    }

    /// Number of fetches served so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn queue(&self, response: Scripted) {
        if let Ok(mut responses) = self.responses.lock() {
            responses.push_back(response);
        }
    }
}

#[async_trait]
impl SnapshotSource for MockSnapshotSource {
    async fn fetch_snapshot(&self) -> Result<Snapshot, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self
            .responses
            .lock()
            .map_err(|_| FetchError::Unavailable("mock poisoned".to_string()))?
            .pop_front();

        match next {
            Some(Scripted::Ok(snapshot)) => Ok(snapshot),
            Some(Scripted::Err(message)) => Err(FetchError::Unavailable(message)),
            Some(Scripted::Hang) => std::future::pending().await,
            None => Err(FetchError::Unavailable("no scripted response".to_string())),
        }
    }

    fn describe(&self) -> String {
        "mock".to_string()
    }
}
