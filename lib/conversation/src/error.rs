//! Error types for the conversation crate.
//!
//! - `ConversationError`: malformed inbound events
//! - `TransportError`: failures reported by the outbound transport

use std::fmt;

/// Errors from interpreting inbound events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversationError {
    /// The button payload names no known action.
    UnknownButton { payload: String },
    /// The button action needs an argument after the ':'.
    MissingArgument { action: &'static str },
}

impl fmt::Display for ConversationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownButton { payload } => write!(f, "unknown button payload: {payload}"),
            Self::MissingArgument { action } => {
                write!(f, "button action '{action}' requires an argument")
            }
        }
    }
}

impl std::error::Error for ConversationError {}

/// Errors from the outbound transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// A message could not be delivered.
    SendFailed { reason: String },
    /// A media item could not be copied or forwarded.
    MediaFailed { message_id: i64, reason: String },
    /// A document could not be uploaded.
    DocumentFailed { reason: String },
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SendFailed { reason } => write!(f, "failed to send message: {reason}"),
            Self::MediaFailed { message_id, reason } => {
                write!(f, "failed to relay media {message_id}: {reason}")
            }
            Self::DocumentFailed { reason } => write!(f, "failed to send document: {reason}"),
        }
    }
}

impl std::error::Error for TransportError {}
