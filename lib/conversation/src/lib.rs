//! Conversation engine for hero-guide.
//!
//! This crate provides:
//!
//! - **Events**: inbound commands, text and button payloads
//! - **Sessions**: per-user workflow state and the exclusive `SessionStore`
//! - **Transition**: the pure state machine mapping an event to steps
//! - **Engine**: executes steps against the repository and the audit log
//! - **Relay**: the outbound `Transport` seam and media delivery

pub mod engine;
pub mod error;
pub mod event;
pub mod mutation;
pub mod outbound;
pub mod relay;
pub mod state;
pub mod store;
pub mod text;
pub mod transition;

pub use engine::Engine;
pub use error::{ConversationError, TransportError};
pub use event::{Button, ButtonAction, Inbound, InboundEvent};
pub use mutation::{Mutation, MutationOutcome};
pub use outbound::{
    Caption, ExportRequest, InlineButton, Keyboard, Outbound, OutboundMessage, RelayRequest,
};
pub use relay::{MediaRelay, RelayReport, Transport};
pub use state::{Browsing, Session, SessionState};
pub use store::SessionStore;
pub use transition::{Context, Step, Transition, transition};
