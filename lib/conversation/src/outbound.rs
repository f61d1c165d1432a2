//! Outbound descriptors.
//!
//! The engine never formats platform markup. It emits logical messages,
//! keyboards and relay requests that a [`Transport`](crate::relay::Transport)
//! turns into provider calls.

use crate::event::Button;
use hero_guide_audit::ActionRecord;
use hero_guide_content::{EntryKind, MediaRef, Role};
use hero_guide_core::ChatId;
use serde::Serialize;

/// A labelled inline button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InlineButton {
    pub label: String,
    pub payload: String,
}

impl InlineButton {
    /// Creates an inline button for a parsed payload.
    #[must_use]
    pub fn new(label: impl Into<String>, payload: &Button) -> Self {
        Self {
            label: label.into(),
            payload: payload.to_string(),
        }
    }
}

/// Keyboard attached to a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "rows", rename_all = "snake_case")]
pub enum Keyboard {
    /// Persistent keyboard of labels that are sent back as text.
    Reply(Vec<Vec<String>>),
    /// Buttons under a message that are sent back as payloads.
    Inline(Vec<Vec<InlineButton>>),
}

impl Keyboard {
    /// Builds a reply keyboard from rows of labels.
    #[must_use]
    pub fn reply<R, L>(rows: R) -> Self
    where
        R: IntoIterator,
        R::Item: IntoIterator<Item = L>,
        L: Into<String>,
    {
        Self::Reply(
            rows.into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
        )
    }

    /// Every label or payload on the keyboard.
    pub fn labels(&self) -> Vec<&str> {
        match self {
            Self::Reply(rows) => rows.iter().flatten().map(String::as_str).collect(),
            Self::Inline(rows) => rows.iter().flatten().map(|b| b.label.as_str()).collect(),
        }
    }
}

/// A text message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutboundMessage {
    pub chat: ChatId,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyboard: Option<Keyboard>,
}

impl OutboundMessage {
    /// Creates a message without a keyboard.
    #[must_use]
    pub fn new(chat: ChatId, text: impl Into<String>) -> Self {
        Self {
            chat,
            text: text.into(),
            keyboard: None,
        }
    }

    /// Attaches a keyboard.
    #[must_use]
    pub fn with_keyboard(mut self, keyboard: Keyboard) -> Self {
        self.keyboard = Some(keyboard);
        self
    }
}

/// Metadata shown with the first media item of an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caption {
    pub kind: EntryKind,
    pub title: String,
    pub role: Option<Role>,
    pub bio: String,
}

impl Caption {
    /// Renders the caption text.
    #[must_use]
    pub fn render(&self) -> String {
        let mut text = format!("{} {}", self.kind.icon(), self.title);
        if let Some(role) = self.role {
            text.push_str(&format!("\n🎮 Role: {role}"));
        }
        text.push_str("\n\n");
        text.push_str(&self.bio);
        text
    }
}

/// Request to deliver an entry's media into a chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayRequest {
    pub chat: ChatId,
    pub caption: Caption,
    pub media: Vec<MediaRef>,
}

/// Request to export the action log into a chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRequest {
    pub chat: ChatId,
    pub records: Vec<ActionRecord>,
}

/// Everything the engine can ask the transport to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    Message(OutboundMessage),
    Relay(RelayRequest),
    Export(ExportRequest),
}

impl Outbound {
    /// Returns the message, if this is one.
    #[must_use]
    pub fn as_message(&self) -> Option<&OutboundMessage> {
        match self {
            Self::Message(message) => Some(message),
            _ => None,
        }
    }
}

impl From<OutboundMessage> for Outbound {
    fn from(message: OutboundMessage) -> Self {
        Self::Message(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::ButtonAction;

    #[test]
    fn caption_with_and_without_role() {
        let mut caption = Caption {
            kind: EntryKind::Tutorial,
            title: "Night Fighter".to_string(),
            role: Some(Role::Fighter),
            bio: "A brief tale".to_string(),
        };
        assert_eq!(caption.render(), "📚 Night Fighter\n🎮 Role: Fighter\n\nA brief tale");

        caption.kind = EntryKind::Story;
        caption.role = None;
        assert_eq!(caption.render(), "📖 Night Fighter\n\nA brief tale");
    }

    #[test]
    fn keyboards_serialize_as_tagged_rows() {
        let keyboard = Keyboard::Inline(vec![vec![InlineButton::new(
            "Add",
            &Button::bare(ButtonAction::AddAdmin),
        )]]);
        let json = serde_json::to_value(&keyboard).expect("encode");
        assert_eq!(json["type"], "inline");
        assert_eq!(json["rows"][0][0]["payload"], "add_admin");

        let reply = Keyboard::reply([["Tutorials", "Hero stories"]]);
        assert_eq!(reply.labels(), vec!["Tutorials", "Hero stories"]);
    }
}
