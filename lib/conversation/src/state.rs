//! Per-user conversation state.
//!
//! Each workflow state carries exactly the data its next step needs. The
//! browsing marker lives beside the state so that abandoning a workflow
//! does not forget which list the user was looking at.

use hero_guide_content::{EntryKind, Role};
use hero_guide_core::UserId;
use serde::{Deserialize, Serialize};

/// Where a user is inside a workflow.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SessionState {
    /// No workflow in progress.
    #[default]
    Idle,
    /// Creating an entry; waiting for its title.
    AwaitingTitle {
        kind: EntryKind,
        preset_role: Option<Role>,
    },
    /// Creating an entry; waiting for its bio.
    AwaitingBio {
        kind: EntryKind,
        title: String,
        preset_role: Option<Role>,
    },
    /// Creating an entry; waiting for one of the six roles.
    AwaitingRole {
        kind: EntryKind,
        title: String,
        bio: String,
    },
    /// Creating an entry; waiting for the source message number.
    AwaitingVideoId {
        kind: EntryKind,
        title: String,
        bio: String,
        role: Role,
    },
    /// An entry was opened and its media relayed.
    EntrySelected { kind: EntryKind, title: String },
    /// Waiting for the second tap of a two-phase delete.
    ConfirmDelete { kind: EntryKind, title: String },
    AwaitingNewBio { kind: EntryKind, title: String },
    AwaitingNewRole { kind: EntryKind, title: String },
    AwaitingNewVideo { kind: EntryKind, title: String },
    AwaitingNewAdminName,
}

impl SessionState {
    /// Returns true if the state consumes the next free-text message.
    #[must_use]
    pub fn awaits_input(&self) -> bool {
        !matches!(
            self,
            Self::Idle | Self::EntrySelected { .. } | Self::ConfirmDelete { .. }
        )
    }
}

/// The list a user is browsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Browsing {
    pub kind: EntryKind,
    /// Set once the user picked a role from the role list.
    pub role: Option<Role>,
}

impl Browsing {
    /// Browsing the role list of a kind.
    #[must_use]
    pub fn roles(kind: EntryKind) -> Self {
        Self { kind, role: None }
    }

    /// Browsing the entries of one role.
    #[must_use]
    pub fn role(kind: EntryKind, role: Role) -> Self {
        Self {
            kind,
            role: Some(role),
        }
    }
}

/// Conversation record of one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: UserId,
    pub state: SessionState,
    pub browsing: Option<Browsing>,
}

impl Session {
    /// Creates an idle session.
    #[must_use]
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            state: SessionState::Idle,
            browsing: None,
        }
    }

    /// Ends any workflow and forgets the browsing marker.
    pub fn reset(&mut self) {
        self.state = SessionState::Idle;
        self.browsing = None;
    }

    /// Ends any workflow but keeps the browsing marker.
    pub fn abandon_workflow(&mut self) {
        self.state = SessionState::Idle;
    }

    /// Kind of the list being browsed, tutorials when nothing was browsed.
    #[must_use]
    pub fn browsing_kind(&self) -> EntryKind {
        self.browsing.map_or(EntryKind::Tutorial, |b| b.kind)
    }

    /// Role to preset when creating an entry of `kind` from the current list.
    #[must_use]
    pub fn preset_role(&self, kind: EntryKind) -> Option<Role> {
        self.browsing
            .filter(|browsing| browsing.kind == kind)
            .and_then(|browsing| browsing.role)
    }

    /// Returns true if no workflow is in progress and nothing is remembered.
    #[must_use]
    pub fn is_clear(&self) -> bool {
        self.state == SessionState::Idle && self.browsing.is_none()
    }
}
