//! Action records.

use chrono::{DateTime, Local, Utc};
use hero_guide_core::{ActionId, Sender, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// What the user did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Started,
    BrowsedTutorials,
    BrowsedStories,
    RoleFiltered,
    EntryViewed,
    ReturnedToRoles,
    WentBack,
    ButtonPressed,
    CreateStarted,
    TitleEntered,
    BioEntered,
    RoleChosen,
    RolePreset,
    EntrySaved,
    BioUpdated,
    RoleUpdated,
    VideoAdded,
    EntryDeleted,
    ManageOpened,
    StatisticsRequested,
    AdminsListed,
    AdminAdded,
    AdminRemoved,
    ReportDownloaded,
}

impl ActionKind {
    /// Label written to the daily log and the export.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Started => "Started the bot",
            Self::BrowsedTutorials => "Opened tutorials",
            Self::BrowsedStories => "Opened hero stories",
            Self::RoleFiltered => "Filtered by role",
            Self::EntryViewed => "Viewed entry",
            Self::ReturnedToRoles => "Returned to roles",
            Self::WentBack => "Went back",
            Self::ButtonPressed => "Pressed button",
            Self::CreateStarted => "Admin: started creating entry",
            Self::TitleEntered => "Admin: entered title",
            Self::BioEntered => "Admin: entered bio",
            Self::RoleChosen => "Admin: chose role",
            Self::RolePreset => "Admin: role preset from list",
            Self::EntrySaved => "Admin: saved entry",
            Self::BioUpdated => "Admin: updated bio",
            Self::RoleUpdated => "Admin: updated role",
            Self::VideoAdded => "Admin: added video",
            Self::EntryDeleted => "Admin: deleted entry",
            Self::ManageOpened => "Admin: opened management",
            Self::StatisticsRequested => "Admin: requested statistics",
            Self::AdminsListed => "Admin: listed admins",
            Self::AdminAdded => "Admin added",
            Self::AdminRemoved => "Admin removed",
            Self::ReportDownloaded => "Admin: downloaded report",
        }
    }

    /// Returns true for records that count as a view of the entry named in
    /// their details.
    #[must_use]
    pub fn is_view(&self) -> bool {
        matches!(self, Self::EntryViewed)
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One audited user action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub id: ActionId,
    pub user_id: UserId,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub action: ActionKind,
    pub details: String,
    pub timestamp: DateTime<Utc>,
}

impl ActionRecord {
    /// Creates a record for `sender`, stamped with the current time.
    #[must_use]
    pub fn new(sender: &Sender, action: ActionKind, details: impl Into<String>) -> Self {
        Self {
            id: ActionId::new(),
            user_id: sender.id,
            username: sender.username.clone(),
            first_name: sender.first_name.clone(),
            last_name: sender.last_name.clone(),
            action,
            details: details.into(),
            timestamp: Utc::now(),
        }
    }

    /// Formats the record as one daily log line, without the newline.
    #[must_use]
    pub fn log_line(&self) -> String {
        format!(
            "[{}] User: {} (ID: {}), Action: {}, Details: {}",
            self.timestamp
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M:%S"),
            self.username,
            self.user_id,
            self.action,
            self.details
        )
    }
}
