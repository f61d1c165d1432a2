//! Error types for the content crate.

use std::fmt;
use std::path::PathBuf;

/// Errors from snapshot storage operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The storage document could not be read.
    ReadFailed { path: PathBuf, reason: String },
    /// The storage document is not a valid snapshot.
    DecodeFailed { reason: String },
    /// The snapshot could not be serialized.
    EncodeFailed { reason: String },
    /// The storage document could not be written.
    WriteFailed { path: PathBuf, reason: String },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadFailed { path, reason } => {
                write!(f, "failed to read {}: {reason}", path.display())
            }
            Self::DecodeFailed { reason } => {
                write!(f, "failed to decode snapshot: {reason}")
            }
            Self::EncodeFailed { reason } => {
                write!(f, "failed to encode snapshot: {reason}")
            }
            Self::WriteFailed { path, reason } => {
                write!(f, "failed to write {}: {reason}", path.display())
            }
        }
    }
}

impl std::error::Error for StoreError {}
