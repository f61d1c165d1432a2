//! Core domain types and utilities for the hero-guide assistant.
//!
//! This crate provides the identifier types, the sender profile and the
//! error handling alias shared by every other hero-guide crate.

pub mod error;
pub mod id;
pub mod sender;

pub use error::Result;
pub use id::{ActionId, ChatId, ParseIdError, UserId};
pub use sender::Sender;
