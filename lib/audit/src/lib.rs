//! User action auditing for hero-guide.
//!
//! Every handled event appends an [`ActionRecord`] to the [`AuditLog`], in
//! arrival order. Records are mirrored to daily text files, summarized by
//! [`Statistics`] and handed to an [`ActionExporter`] on request.

pub mod error;
pub mod export;
pub mod log;
pub mod record;
pub mod stats;

pub use error::AuditError;
pub use export::{ActionExporter, ExportedFile, JsonExporter};
pub use log::{AuditLog, DailyFileSink};
pub use record::{ActionKind, ActionRecord};
pub use stats::{Statistics, TOP_VIEWED_LIMIT};
