//! Durable snapshot storage.
//!
//! The repository contract is read-whole / write-whole: a store holds exactly
//! one snapshot document and never exposes partial updates.

use crate::error::StoreError;
use crate::model::Snapshot;
use async_trait::async_trait;
use rootcause::prelude::Report;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::RwLock;

/// Trait for snapshot persistence backends.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Reads the stored snapshot. Returns `None` when nothing has been stored.
    async fn read(&self) -> Result<Option<Snapshot>, Report<StoreError>>;

    /// Replaces the stored snapshot.
    async fn write(&self, snapshot: &Snapshot) -> Result<(), Report<StoreError>>;
}

/// Single JSON document on the local filesystem.
///
/// Writes go to a sibling temp file which is then renamed over the document,
/// so readers never observe a half-written snapshot.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Creates a store for the given document path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the document path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let file_name = self
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "snapshot.json".to_string());
        self.path.with_file_name(format!(".{file_name}.tmp"))
    }

    fn write_failed(&self, err: std::io::Error) -> StoreError {
        StoreError::WriteFailed {
            path: self.path.clone(),
            reason: err.to_string(),
        }
    }
}

#[async_trait]
impl SnapshotStore for JsonFileStore {
    async fn read(&self) -> Result<Option<Snapshot>, Report<StoreError>> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(StoreError::ReadFailed {
                    path: self.path.clone(),
                    reason: e.to_string(),
                }
                .into());
            }
        };

        let snapshot = serde_json::from_slice(&bytes).map_err(|e| StoreError::DecodeFailed {
            reason: e.to_string(),
        })?;
        Ok(Some(snapshot))
    }

    async fn write(&self, snapshot: &Snapshot) -> Result<(), Report<StoreError>> {
        let json = serde_json::to_vec_pretty(snapshot).map_err(|e| StoreError::EncodeFailed {
            reason: e.to_string(),
        })?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| self.write_failed(e))?;
        }

        let temp_path = self.temp_path();
        fs::write(&temp_path, &json)
            .await
            .map_err(|e| self.write_failed(e))?;
        fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| self.write_failed(e))?;

        Ok(())
    }
}

/// In-process store, used by tests and ephemeral runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Option<Snapshot>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store already holding a snapshot.
    #[must_use]
    pub fn with_snapshot(snapshot: Snapshot) -> Self {
        Self {
            inner: RwLock::new(Some(snapshot)),
        }
    }

    /// Drops the stored snapshot, as if the document had been deleted.
    pub async fn clear(&self) {
        *self.inner.write().await = None;
    }
}

#[async_trait]
impl SnapshotStore for MemoryStore {
    async fn read(&self) -> Result<Option<Snapshot>, Report<StoreError>> {
        Ok(self.inner.read().await.clone())
    }

    async fn write(&self, snapshot: &Snapshot) -> Result<(), Report<StoreError>> {
        *self.inner.write().await = Some(snapshot.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EntryKind, MediaRef, Role};

    fn sample() -> Snapshot {
        let mut snapshot = Snapshot::default();
        snapshot.create_or_append(
            EntryKind::Tutorial,
            "Night Fighter",
            "A brief tale",
            Role::Fighter,
            MediaRef::new("55"),
        );
        snapshot
    }

    #[tokio::test]
    async fn missing_file_reads_as_none() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = JsonFileStore::new(dir.path().join("data.json"));

        let read = store.read().await.expect("read succeeds");
        assert!(read.is_none());
    }

    #[tokio::test]
    async fn write_then_read() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = JsonFileStore::new(dir.path().join("nested").join("data.json"));

        store.write(&sample()).await.expect("write");
        let read = store.read().await.expect("read").expect("present");

        assert_eq!(read, sample());
        assert!(!store.temp_path().exists());
    }

    #[tokio::test]
    async fn malformed_file_is_a_decode_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("data.json");
        std::fs::write(&path, b"{ not json").expect("seed file");

        let store = JsonFileStore::new(path);
        assert!(store.read().await.is_err());
    }

    #[tokio::test]
    async fn memory_store_clear() {
        let store = MemoryStore::with_snapshot(sample());
        assert!(store.read().await.expect("read").is_some());

        store.clear().await;
        assert!(store.read().await.expect("read").is_none());
    }
}
