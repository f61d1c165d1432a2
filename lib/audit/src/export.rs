//! Turning the action log into a downloadable file.

use crate::error::AuditError;
use crate::record::ActionRecord;
use async_trait::async_trait;
use chrono::Local;
use rootcause::prelude::Report;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;

/// A file produced by an exporter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFile {
    /// Where the file was written.
    pub path: PathBuf,
    /// Name to present to the user.
    pub file_name: String,
}

/// Trait for action-log exporters.
#[async_trait]
pub trait ActionExporter: Send + Sync {
    /// Writes the records to a file.
    async fn export(&self, records: &[ActionRecord]) -> Result<ExportedFile, Report<AuditError>>;
}

#[derive(Serialize)]
struct ExportDocument<'a> {
    generated_at: String,
    total_actions: usize,
    actions: Vec<ReportRow<'a>>,
}

#[derive(Serialize)]
struct ReportRow<'a> {
    user_id: i64,
    username: &'a str,
    first_name: &'a str,
    last_name: &'a str,
    action: &'static str,
    details: &'a str,
    timestamp: String,
}

impl<'a> From<&'a ActionRecord> for ReportRow<'a> {
    fn from(record: &'a ActionRecord) -> Self {
        Self {
            user_id: record.user_id.get(),
            username: &record.username,
            first_name: &record.first_name,
            last_name: &record.last_name,
            action: record.action.label(),
            details: &record.details,
            timestamp: record
                .timestamp
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string(),
        }
    }
}

/// Writes a timestamped JSON report into a directory.
#[derive(Debug, Clone)]
pub struct JsonExporter {
    dir: PathBuf,
}

impl JsonExporter {
    /// Creates an exporter writing into `dir`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Output directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl ActionExporter for JsonExporter {
    async fn export(&self, records: &[ActionRecord]) -> Result<ExportedFile, Report<AuditError>> {
        let now = Local::now();
        let file_name = format!("user_actions_{}.json", now.format("%Y%m%d_%H%M%S_%3f"));
        let path = self.dir.join(&file_name);

        let document = ExportDocument {
            generated_at: now.format("%Y-%m-%d %H:%M:%S").to_string(),
            total_actions: records.len(),
            actions: records.iter().map(ReportRow::from).collect(),
        };
        let json = serde_json::to_vec_pretty(&document).map_err(|e| AuditError::EncodeFailed {
            reason: e.to_string(),
        })?;

        let export_failed = |e: std::io::Error| AuditError::ExportFailed {
            path: path.clone(),
            reason: e.to_string(),
        };
        fs::create_dir_all(&self.dir).await.map_err(export_failed)?;
        fs::write(&path, json).await.map_err(export_failed)?;

        info!(path = %path.display(), records = records.len(), "exported action report");
        Ok(ExportedFile { path, file_name })
    }
}
