//! The chat user behind an inbound event.

use crate::id::UserId;
use serde::{Deserialize, Serialize};

/// Profile of the user who sent an event.
///
/// Any of the name fields may be empty; the messaging provider does not
/// require users to set them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sender {
    /// Provider identity.
    pub id: UserId,
    /// Username without the leading '@'.
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

impl Sender {
    /// Creates a sender with only an identity and username.
    #[must_use]
    pub fn new(id: UserId, username: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            first_name: String::new(),
            last_name: String::new(),
        }
    }

    /// Name to address the user by.
    #[must_use]
    pub fn display_name(&self) -> &str {
        if !self.first_name.is_empty() {
            &self.first_name
        } else if !self.username.is_empty() {
            &self.username
        } else {
            "there"
        }
    }
}
