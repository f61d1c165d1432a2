//! Error types for the bot host.

use std::fmt;

/// Errors that stop the bot.
#[derive(Debug)]
pub enum BotError {
    /// Configuration is missing or invalid.
    Config { reason: String },
    /// The console input could not be read.
    Console { reason: String },
}

impl fmt::Display for BotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config { reason } => write!(f, "invalid configuration: {reason}"),
            Self::Console { reason } => write!(f, "console input failed: {reason}"),
        }
    }
}

impl std::error::Error for BotError {}
