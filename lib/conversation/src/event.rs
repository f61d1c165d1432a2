//! Inbound events and button payloads.

use crate::error::ConversationError;
use hero_guide_content::EntryKind;
use hero_guide_core::{ChatId, Sender};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An event received from the messaging provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inbound {
    /// Chat replies go to.
    pub chat: ChatId,
    pub sender: Sender,
    pub event: InboundEvent,
}

/// What the user sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundEvent {
    /// A `/command`, name without the slash.
    Command {
        name: String,
        #[serde(default)]
        args: String,
    },
    /// Free text, including reply-keyboard labels.
    Text { text: String },
    /// An inline button press carrying an `action:argument` payload.
    Button { payload: String },
}

/// Action named by an inline button payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ButtonAction {
    Delete(EntryKind),
    ConfirmDelete(EntryKind),
    CancelDelete(EntryKind),
    UpdateBio(EntryKind),
    UpdateRole(EntryKind),
    AddVideo(EntryKind),
    AddAdmin,
    RemoveAdmin,
    ConfirmRemoveAdmin,
    DownloadLogs,
}

impl ButtonAction {
    const ALL: [ButtonAction; 16] = [
        Self::Delete(EntryKind::Tutorial),
        Self::Delete(EntryKind::Story),
        Self::ConfirmDelete(EntryKind::Tutorial),
        Self::ConfirmDelete(EntryKind::Story),
        Self::CancelDelete(EntryKind::Tutorial),
        Self::CancelDelete(EntryKind::Story),
        Self::UpdateBio(EntryKind::Tutorial),
        Self::UpdateBio(EntryKind::Story),
        Self::UpdateRole(EntryKind::Tutorial),
        Self::UpdateRole(EntryKind::Story),
        Self::AddVideo(EntryKind::Tutorial),
        Self::AddVideo(EntryKind::Story),
        Self::AddAdmin,
        Self::RemoveAdmin,
        Self::ConfirmRemoveAdmin,
        Self::DownloadLogs,
    ];

    /// Wire name used before the ':' in payloads.
    #[must_use]
    pub fn name(&self) -> &'static str {
        use EntryKind::{Story, Tutorial};
        match self {
            Self::Delete(Tutorial) => "delete_tutorial",
            Self::Delete(Story) => "delete_story",
            Self::ConfirmDelete(Tutorial) => "confirm_delete",
            Self::ConfirmDelete(Story) => "confirm_delete_story",
            Self::CancelDelete(Tutorial) => "cancel_delete",
            Self::CancelDelete(Story) => "cancel_delete_story",
            Self::UpdateBio(Tutorial) => "update_bio",
            Self::UpdateBio(Story) => "update_story_bio",
            Self::UpdateRole(Tutorial) => "update_role",
            Self::UpdateRole(Story) => "update_story_role",
            Self::AddVideo(Tutorial) => "add_video",
            Self::AddVideo(Story) => "add_story_video",
            Self::AddAdmin => "add_admin",
            Self::RemoveAdmin => "remove_admin",
            Self::ConfirmRemoveAdmin => "confirm_remove_admin",
            Self::DownloadLogs => "download_logs",
        }
    }

    /// Looks up an action by wire name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|action| action.name() == name)
    }

    /// Returns true if the payload must carry an argument.
    #[must_use]
    pub fn takes_argument(&self) -> bool {
        !matches!(
            self,
            Self::CancelDelete(_) | Self::AddAdmin | Self::RemoveAdmin | Self::DownloadLogs
        )
    }
}

/// A parsed inline button payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub action: ButtonAction,
    /// Everything after the first ':'. Titles may themselves contain ':'.
    pub argument: String,
}

impl Button {
    /// Creates a button payload.
    #[must_use]
    pub fn new(action: ButtonAction, argument: impl Into<String>) -> Self {
        Self {
            action,
            argument: argument.into(),
        }
    }

    /// Creates a payload without an argument.
    #[must_use]
    pub fn bare(action: ButtonAction) -> Self {
        Self::new(action, String::new())
    }
}

impl FromStr for Button {
    type Err = ConversationError;

    fn from_str(payload: &str) -> Result<Self, Self::Err> {
        let (name, argument) = payload.split_once(':').unwrap_or((payload, ""));
        let action = ButtonAction::from_name(name).ok_or_else(|| ConversationError::UnknownButton {
            payload: payload.to_string(),
        })?;
        if action.takes_argument() && argument.is_empty() {
            return Err(ConversationError::MissingArgument {
                action: action.name(),
            });
        }
        Ok(Self::new(action, argument))
    }
}

impl fmt::Display for Button {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.argument.is_empty() {
            f.write_str(self.action.name())
        } else {
            write!(f, "{}:{}", self.action.name(), self.argument)
        }
    }
}
