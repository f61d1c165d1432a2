//! Fail-soft repository over a snapshot store.
//!
//! Every operation loads a fresh snapshot; nothing is cached between calls.
//! Mutations run as load, mutate, save under a single writer lock, so two
//! concurrent mutations can never overwrite each other's changes.

use crate::model::Snapshot;
use crate::store::SnapshotStore;
use tokio::sync::Mutex;
use tracing::{debug, error, instrument, warn};

/// Whether a mutation reached durable storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteStatus {
    /// The mutation changed nothing, so nothing was written.
    Unchanged,
    /// The new snapshot was written.
    Persisted,
    /// The write failed. The failure has already been logged.
    Failed,
}

/// Result of a mutation together with its write status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Committed<T> {
    /// Value returned by the mutation closure.
    pub value: T,
    /// What happened to the write.
    pub write: WriteStatus,
}

/// Repository of tutorials, stories and admins.
#[derive(Debug)]
pub struct Repository<S> {
    store: S,
    writer: Mutex<()>,
}

impl<S: SnapshotStore> Repository<S> {
    /// Creates a repository over a store.
    #[must_use]
    pub fn new(store: S) -> Self {
        Self {
            store,
            writer: Mutex::new(()),
        }
    }

    /// Returns the underlying store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Loads the whole snapshot.
    ///
    /// Absent, unreadable or malformed storage yields an empty snapshot.
    #[instrument(skip(self))]
    pub async fn load_all(&self) -> Snapshot {
        match self.store.read().await {
            Ok(Some(snapshot)) => snapshot,
            Ok(None) => {
                debug!("no stored snapshot, starting empty");
                Snapshot::default()
            }
            Err(report) => {
                warn!(error = %report, "failed to load snapshot, using empty snapshot");
                Snapshot::default()
            }
        }
    }

    /// Saves the whole snapshot. Failures are logged and reported as `false`.
    #[instrument(skip_all)]
    pub async fn save_all(&self, snapshot: &Snapshot) -> bool {
        match self.store.write(snapshot).await {
            Ok(()) => true,
            Err(report) => {
                error!(error = %report, "failed to save snapshot");
                false
            }
        }
    }

    /// Runs a read-modify-write cycle under the writer lock.
    ///
    /// The snapshot is only written when the closure changed it.
    pub async fn mutate<T, F>(&self, f: F) -> Committed<T>
    where
        F: FnOnce(&mut Snapshot) -> T + Send,
        T: Send,
    {
        let _writer = self.writer.lock().await;

        let before = self.load_all().await;
        let mut after = before.clone();
        let value = f(&mut after);

        let write = if after == before {
            WriteStatus::Unchanged
        } else if self.save_all(&after).await {
            WriteStatus::Persisted
        } else {
            WriteStatus::Failed
        };

        Committed { value, write }
    }
}
