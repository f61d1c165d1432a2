//! Error types for the audit crate.

use std::fmt;
use std::path::PathBuf;

/// Errors from audit persistence and export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuditError {
    /// A record could not be appended to the daily log file.
    SinkFailed { path: PathBuf, reason: String },
    /// Records could not be serialized for export.
    EncodeFailed { reason: String },
    /// The export file could not be written.
    ExportFailed { path: PathBuf, reason: String },
}

impl fmt::Display for AuditError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SinkFailed { path, reason } => {
                write!(f, "failed to append to {}: {reason}", path.display())
            }
            Self::EncodeFailed { reason } => {
                write!(f, "failed to encode action records: {reason}")
            }
            Self::ExportFailed { path, reason } => {
                write!(f, "failed to write export {}: {reason}", path.display())
            }
        }
    }
}

impl std::error::Error for AuditError {}
