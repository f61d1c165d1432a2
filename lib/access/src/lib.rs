//! Admin authorization for hero-guide.
//!
//! Privileged actions are allowed for the configured super-admin and for
//! every username in the repository's admin list. The policy is evaluated
//! against a fresh snapshot on every privileged step, so admin-list edits
//! apply to the very next event.

pub mod error;
pub mod policy;

pub use error::AccessError;
pub use policy::{AccessPolicy, Privilege, normalize_username};
