//! Repository mutations requested by workflows.

use crate::text;
use hero_guide_audit::ActionKind;
use hero_guide_content::{AdminRecord, AppendOutcome, EntryKind, MediaRef, Role, Snapshot};

/// A change to the repository, applied under the writer lock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    CreateOrAppend {
        kind: EntryKind,
        title: String,
        bio: String,
        role: Role,
        video: MediaRef,
    },
    ReplaceBio {
        kind: EntryKind,
        title: String,
        bio: String,
    },
    ReplaceRole {
        kind: EntryKind,
        title: String,
        role: Role,
    },
    AddVideo {
        kind: EntryKind,
        title: String,
        video: MediaRef,
    },
    DeleteEntry {
        kind: EntryKind,
        title: String,
    },
    AddAdmin {
        username: String,
        added_by: String,
    },
    RemoveAdmin {
        username: String,
    },
}

/// What applying a mutation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    Created,
    Appended,
    Updated,
    /// The target entry is gone.
    NotFound,
    /// The admin was added by someone else in the meantime.
    AlreadyAdmin,
    /// The admin was removed by someone else in the meantime.
    NotAdmin,
}

impl MutationOutcome {
    /// Returns true if the repository changed.
    #[must_use]
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Created | Self::Appended | Self::Updated)
    }
}

impl From<AppendOutcome> for MutationOutcome {
    fn from(outcome: AppendOutcome) -> Self {
        match outcome {
            AppendOutcome::Created => Self::Created,
            AppendOutcome::Appended => Self::Appended,
        }
    }
}

fn updated_or(applied: bool, otherwise: MutationOutcome) -> MutationOutcome {
    if applied {
        MutationOutcome::Updated
    } else {
        otherwise
    }
}

impl Mutation {
    /// Applies the mutation to a snapshot.
    pub fn apply(&self, snapshot: &mut Snapshot) -> MutationOutcome {
        use MutationOutcome::{NotAdmin, NotFound};
        match self {
            Self::CreateOrAppend {
                kind,
                title,
                bio,
                role,
                video,
            } => snapshot
                .create_or_append(*kind, title, bio, *role, video.clone())
                .into(),
            Self::ReplaceBio { kind, title, bio } => {
                updated_or(snapshot.replace_bio(*kind, title, bio), NotFound)
            }
            Self::ReplaceRole { kind, title, role } => {
                updated_or(snapshot.replace_role(*kind, title, *role), NotFound)
            }
            Self::AddVideo { kind, title, video } => {
                updated_or(snapshot.push_video(*kind, title, video.clone()), NotFound)
            }
            Self::DeleteEntry { kind, title } => {
                updated_or(snapshot.remove_entry(*kind, title), NotFound)
            }
            Self::AddAdmin { username, added_by } => updated_or(
                snapshot.add_admin(AdminRecord::new(username.as_str(), added_by.as_str())),
                MutationOutcome::AlreadyAdmin,
            ),
            Self::RemoveAdmin { username } => updated_or(snapshot.remove_admin(username), NotAdmin),
        }
    }

    /// Returns true for admin-list edits.
    #[must_use]
    pub fn is_admin_edit(&self) -> bool {
        matches!(self, Self::AddAdmin { .. } | Self::RemoveAdmin { .. })
    }

    /// Audit action and details recorded when the mutation applied.
    #[must_use]
    pub fn audit(&self) -> (ActionKind, String) {
        match self {
            Self::CreateOrAppend { kind, title, .. } => {
                (ActionKind::EntrySaved, format!("{kind}: {title}"))
            }
            Self::ReplaceBio { kind, title, .. } => {
                (ActionKind::BioUpdated, format!("{kind}: {title}"))
            }
            Self::ReplaceRole { kind, title, role } => {
                (ActionKind::RoleUpdated, format!("{kind}: {title} -> {role}"))
            }
            Self::AddVideo { kind, title, video } => {
                (ActionKind::VideoAdded, format!("{kind}: {title} ({video})"))
            }
            Self::DeleteEntry { kind, title } => {
                (ActionKind::EntryDeleted, format!("{kind}: {title}"))
            }
            Self::AddAdmin { username, .. } => (ActionKind::AdminAdded, username.clone()),
            Self::RemoveAdmin { username } => (ActionKind::AdminRemoved, username.clone()),
        }
    }

    /// Message reporting the outcome to the user.
    #[must_use]
    pub fn reply(&self, outcome: MutationOutcome) -> String {
        match (self, outcome) {
            (Self::AddAdmin { username, .. }, MutationOutcome::AlreadyAdmin) => {
                text::already_admin(username)
            }
            (Self::AddAdmin { username, .. }, _) => text::admin_added(username),
            (Self::RemoveAdmin { .. }, MutationOutcome::NotAdmin) => {
                text::NOT_IN_ADMIN_LIST.to_string()
            }
            (Self::RemoveAdmin { username }, _) => text::admin_removed(username),
            (
                Self::CreateOrAppend { kind, .. }
                | Self::ReplaceBio { kind, .. }
                | Self::ReplaceRole { kind, .. }
                | Self::AddVideo { kind, .. }
                | Self::DeleteEntry { kind, .. },
                MutationOutcome::NotFound,
            ) => text::not_found(*kind),
            (Self::CreateOrAppend { kind, title, .. }, MutationOutcome::Created) => {
                format!("The {} '{title}' was created with its first video!", kind.noun())
            }
            (Self::CreateOrAppend { kind, title, .. }, _) => {
                format!("A video was added to the existing {} '{title}'!", kind.noun())
            }
            (Self::ReplaceBio { kind, title, .. }, _) => {
                format!("The bio of the {} '{title}' was updated!", kind.noun())
            }
            (Self::ReplaceRole { kind, title, role }, _) => {
                format!("The role of the {} '{title}' is now '{role}'!", kind.noun())
            }
            (Self::AddVideo { kind, title, .. }, _) => {
                format!("A new video was added to the {} '{title}'!", kind.noun())
            }
            (Self::DeleteEntry { kind, title }, _) => {
                format!("The {} '{title}' was deleted.", kind.noun())
            }
        }
    }
}
