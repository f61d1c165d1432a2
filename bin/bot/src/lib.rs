//! Chat bot host for hero-guide.
//!
//! Wires configuration, the content repository, the audit log and the
//! conversation engine into a [`Dispatcher`], and provides a JSON-lines
//! console transport for local operation.

pub mod config;
pub mod console;
pub mod dispatch;
pub mod error;

pub use config::BotConfig;
pub use console::ConsoleTransport;
pub use dispatch::Dispatcher;
pub use error::BotError;
