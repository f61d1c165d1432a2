//! Content repository for hero-guide.
//!
//! This crate provides:
//!
//! - **Model**: tutorials and hero stories (`ContentEntry`), hero roles,
//!   admin records and the full repository `Snapshot`
//! - **Store**: durable snapshot persistence (`SnapshotStore`)
//! - **Repository**: fail-soft load-all / save-all with a single writer
//! - **Selector**: pure queries over a snapshot

pub mod error;
pub mod model;
pub mod repository;
pub mod selector;
pub mod store;

pub use error::StoreError;
pub use model::{
    AdminRecord, AppendOutcome, Collection, ContentEntry, EntryKind, MediaRef, Role, Snapshot,
};
pub use repository::{Committed, Repository, WriteStatus};
pub use selector::EntryRef;
pub use store::{JsonFileStore, MemoryStore, SnapshotStore};
