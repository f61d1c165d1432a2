//! Arrival-ordered action log with an optional daily file mirror.

use crate::error::AuditError;
use crate::record::ActionRecord;
use chrono::Local;
use rootcause::prelude::Report;
use std::path::{Path, PathBuf};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::warn;

/// Appends records to `actions_YYYY-MM-DD.log` files in one directory.
#[derive(Debug, Clone)]
pub struct DailyFileSink {
    dir: PathBuf,
}

impl DailyFileSink {
    /// Creates a sink writing into `dir`. The directory is created on first
    /// append.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory the log files are written to.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Log file a record belongs to, chosen by its local calendar day.
    #[must_use]
    pub fn path_for(&self, record: &ActionRecord) -> PathBuf {
        let day = record.timestamp.with_timezone(&Local).format("%Y-%m-%d");
        self.dir.join(format!("actions_{day}.log"))
    }

    /// Appends one line for `record`.
    pub async fn append(&self, record: &ActionRecord) -> Result<(), Report<AuditError>> {
        let path = self.path_for(record);
        let sink_failed = |e: std::io::Error| AuditError::SinkFailed {
            path: path.clone(),
            reason: e.to_string(),
        };

        fs::create_dir_all(&self.dir).await.map_err(sink_failed)?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(sink_failed)?;

        let mut line = record.log_line();
        line.push('\n');
        file.write_all(line.as_bytes()).await.map_err(sink_failed)?;
        file.flush().await.map_err(sink_failed)?;
        Ok(())
    }
}

/// Process-wide action log.
///
/// Appends are serialized: the in-memory push and the file write for one
/// record complete before the next record is accepted.
#[derive(Debug, Default)]
pub struct AuditLog {
    records: Mutex<Vec<ActionRecord>>,
    sink: Option<DailyFileSink>,
}

impl AuditLog {
    /// Creates an in-memory log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a log mirrored to daily files.
    #[must_use]
    pub fn with_sink(sink: DailyFileSink) -> Self {
        Self {
            records: Mutex::default(),
            sink: Some(sink),
        }
    }

    /// Appends a record. Sink failures are logged and do not drop the record.
    pub async fn record(&self, record: ActionRecord) {
        let mut records = self.records.lock().await;
        if let Some(sink) = &self.sink {
            if let Err(report) = sink.append(&record).await {
                warn!(error = %report, action = %record.action, "failed to write action log line");
            }
        }
        records.push(record);
    }

    /// Copy of every record in arrival order.
    pub async fn records(&self) -> Vec<ActionRecord> {
        self.records.lock().await.clone()
    }

    /// Number of records.
    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }

    /// Returns true if nothing has been recorded.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
