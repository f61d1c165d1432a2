//! User-facing labels, messages and keyboards.

use crate::event::{Button, ButtonAction};
use crate::outbound::{InlineButton, Keyboard, OutboundMessage};
use hero_guide_access::Privilege;
use hero_guide_audit::Statistics;
use hero_guide_content::{AdminRecord, ContentEntry, EntryKind, Role};
use hero_guide_core::ChatId;
use std::collections::BTreeMap;

pub const TUTORIALS: &str = "Tutorials";
pub const STORIES: &str = "Hero stories";
pub const NEW_TUTORIAL: &str = "➕ New tutorial";
pub const MANAGE_TUTORIALS: &str = "🔧 Manage tutorials";
pub const NEW_STORY: &str = "➕ New hero story";
pub const MANAGE_STORIES: &str = "🔧 Manage hero stories";
pub const STATISTICS: &str = "📊 Statistics";
pub const ADMINS: &str = "👥 Admins";
pub const BACK: &str = "⬅️ Back";
pub const BACK_TO_ROLES: &str = "⬅️ Roles";

pub const GREETING: &str = "Welcome! Pick a section below.";
pub const ADMIN_PANEL: &str = "Admin panel";
pub const DENIED: &str = "This action is for admins only.";
pub const NOT_UNDERSTOOD: &str = "Sorry, I didn't understand that.";
pub const UNKNOWN_COMMAND: &str = "Unknown command.";
pub const INVALID_ROLE: &str = "That is not a valid role. Please pick one of the buttons.";
pub const INVALID_VIDEO: &str =
    "The video ID must be the positive message number from the source channel. Try again:";
pub const EMPTY_TITLE: &str = "The title cannot be empty. Send a title:";
pub const VIDEO_PROMPT: &str = "Now send the video ID (message number in the source channel):";
pub const PRESS_BACK: &str = "Press the button to go back.";
pub const DELETE_CANCELLED: &str = "Deletion cancelled.";
pub const DELETE_EXPIRED: &str = "This confirmation has expired. Open the list and try again.";
pub const ADMIN_PROMPT: &str = "Send the new admin's username (like @username):";
pub const EMPTY_USERNAME: &str = "The username cannot be empty. Send it like @username:";
pub const INVALID_USERNAME: &str = "A username cannot contain spaces. Send it like @username:";
pub const ALREADY_ADMIN_SELF: &str = "You are already an admin.";
pub const SUPER_ADMIN_TARGET: &str = "This user is the main admin.";
pub const SUPER_ADMIN_REMOVAL: &str = "❌ The main admin cannot be removed.";
pub const NOT_IN_ADMIN_LIST: &str = "❌ This user is not in the admin list.";
pub const NO_EXTRA_ADMINS: &str = "There are no additional admins.";
pub const CHOOSE_ADMIN_TO_REMOVE: &str = "Choose an admin to remove:";
pub const REPORT_CAPTION: &str = "User action log";
pub const REPORT_FAILED: &str = "Failed to create the report.";

/// Capitalizes the first letter of a phrase.
fn capitalized(phrase: &str) -> String {
    let mut chars = phrase.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Label of the create button for a kind.
#[must_use]
pub fn create_label(kind: EntryKind) -> &'static str {
    match kind {
        EntryKind::Tutorial => NEW_TUTORIAL,
        EntryKind::Story => NEW_STORY,
    }
}

/// Reply keyboard of the main menu for a privilege.
#[must_use]
pub fn menu_keyboard(privilege: Privilege) -> Keyboard {
    let mut rows = vec![vec![TUTORIALS, STORIES]];
    if privilege.is_admin() {
        rows.push(vec![NEW_TUTORIAL, MANAGE_TUTORIALS]);
        rows.push(vec![NEW_STORY, MANAGE_STORIES]);
        rows.push(vec![STATISTICS, ADMINS]);
    }
    Keyboard::reply(rows)
}

/// Main menu message for a privilege.
#[must_use]
pub fn menu(chat: ChatId, privilege: Privilege) -> OutboundMessage {
    let text = if privilege.is_admin() {
        ADMIN_PANEL
    } else {
        GREETING
    };
    OutboundMessage::new(chat, text).with_keyboard(menu_keyboard(privilege))
}

/// The six roles, two per row.
fn role_rows() -> Vec<Vec<&'static str>> {
    Role::ALL
        .chunks(2)
        .map(|pair| pair.iter().map(Role::label).collect())
        .collect()
}

/// Role keyboard used while choosing a role for an entry.
#[must_use]
pub fn role_choice_keyboard() -> Keyboard {
    Keyboard::reply(role_rows())
}

/// Role keyboard used while browsing.
#[must_use]
pub fn role_browse_keyboard() -> Keyboard {
    let mut rows = role_rows();
    rows.push(vec![BACK]);
    Keyboard::reply(rows)
}

/// Keyboard holding only the back button.
#[must_use]
pub fn back_keyboard() -> Keyboard {
    Keyboard::reply([[BACK]])
}

/// Role list of a kind.
#[must_use]
pub fn role_list(chat: ChatId, kind: EntryKind, has_entries: bool) -> OutboundMessage {
    let text = if has_entries {
        format!("Which role's {} would you like to see?", kind.plural())
    } else {
        format!(
            "There are no {} yet, but you can still pick a role.",
            kind.plural()
        )
    };
    OutboundMessage::new(chat, text).with_keyboard(role_browse_keyboard())
}

/// Entries of one role, one title per row.
#[must_use]
pub fn role_entries(
    chat: ChatId,
    kind: EntryKind,
    role: Role,
    titles: &[&str],
    privilege: Privilege,
) -> OutboundMessage {
    let mut rows: Vec<Vec<String>> = titles.iter().map(|t| vec![t.to_string()]).collect();
    let text = if titles.is_empty() {
        if privilege.is_admin() {
            rows.push(vec![create_label(kind).to_string()]);
        }
        format!("There are no {} for {role} yet.", kind.plural())
    } else {
        format!("{} for {role}:", capitalized(kind.plural()))
    };
    rows.push(vec![BACK_TO_ROLES.to_string()]);
    OutboundMessage::new(chat, text).with_keyboard(Keyboard::Reply(rows))
}

/// Back prompt sent after an entry's media.
#[must_use]
pub fn press_back(chat: ChatId) -> OutboundMessage {
    OutboundMessage::new(chat, PRESS_BACK).with_keyboard(back_keyboard())
}

/// Prompt for the title of a new entry.
#[must_use]
pub fn title_prompt(kind: EntryKind) -> String {
    format!("Send the title of the new {}:", kind.noun())
}

/// Prompt for the bio of a new entry.
#[must_use]
pub fn bio_prompt(kind: EntryKind, title: &str) -> String {
    format!("Send a short bio for the {} '{title}':", kind.noun())
}

/// Prompt for the role of a new entry.
#[must_use]
pub fn role_prompt(kind: EntryKind, title: &str) -> String {
    format!("Choose a role for the {} '{title}':", kind.noun())
}

/// Video prompt when the role came from the list being browsed.
#[must_use]
pub fn preset_role_prompt(role: Role) -> String {
    format!("Role set to '{role}' automatically.\n{VIDEO_PROMPT}")
}

/// Prompt for a replacement bio.
#[must_use]
pub fn new_bio_prompt(kind: EntryKind, title: &str) -> String {
    format!("Send the new bio for the {} '{title}':", kind.noun())
}

/// Prompt for a replacement role.
#[must_use]
pub fn new_role_prompt(kind: EntryKind, title: &str) -> String {
    format!("Choose the new role for the {} '{title}':", kind.noun())
}

/// Prompt for an additional video.
#[must_use]
pub fn new_video_prompt(kind: EntryKind, title: &str) -> String {
    format!("Send the video ID to add to the {} '{title}':", kind.noun())
}

/// Reported when an entry vanished before a workflow finished.
#[must_use]
pub fn not_found(kind: EntryKind) -> String {
    format!("{} not found.", capitalized(kind.noun()))
}

/// Two-phase delete confirmation.
#[must_use]
pub fn delete_confirmation(chat: ChatId, kind: EntryKind, title: &str) -> OutboundMessage {
    let keyboard = Keyboard::Inline(vec![vec![
        InlineButton::new(
            "❌ Yes, delete",
            &Button::new(ButtonAction::ConfirmDelete(kind), title),
        ),
        InlineButton::new("🔙 Cancel", &Button::bare(ButtonAction::CancelDelete(kind))),
    ]]);
    OutboundMessage::new(
        chat,
        format!("Do you really want to delete the {} '{title}'?", kind.noun()),
    )
    .with_keyboard(keyboard)
}

/// Intro of a manage list.
#[must_use]
pub fn manage_intro(kind: EntryKind) -> String {
    format!("These {} exist. Choose one to manage:", kind.plural())
}

/// Reported when a manage list would be empty.
#[must_use]
pub fn nothing_to_manage(kind: EntryKind) -> String {
    format!("There are no {} yet.", kind.plural())
}

/// One entry of a manage list with its inline actions.
#[must_use]
pub fn manage_entry(chat: ChatId, kind: EntryKind, title: &str, entry: &ContentEntry) -> OutboundMessage {
    let mut text = format!("{} {title}", kind.icon());
    if let Some(role) = entry.role {
        text.push_str(&format!(" | Role: {role}"));
    }
    let keyboard = Keyboard::Inline(vec![
        vec![
            InlineButton::new("✏️ Edit bio", &Button::new(ButtonAction::UpdateBio(kind), title)),
            InlineButton::new(
                "🎮 Change role",
                &Button::new(ButtonAction::UpdateRole(kind), title),
            ),
            InlineButton::new("🎬 Add video", &Button::new(ButtonAction::AddVideo(kind), title)),
        ],
        vec![InlineButton::new(
            "❌ Delete",
            &Button::new(ButtonAction::Delete(kind), title),
        )],
    ]);
    OutboundMessage::new(chat, text).with_keyboard(keyboard)
}

/// Admin list with add and remove buttons.
#[must_use]
pub fn admin_list(
    chat: ChatId,
    super_admin: &str,
    admins: &BTreeMap<String, AdminRecord>,
) -> OutboundMessage {
    let mut text = format!("👤 Main admin: @{super_admin}\n\n📋 Additional admins:\n");
    if admins.is_empty() {
        text.push_str(NO_EXTRA_ADMINS);
    } else {
        for (i, (username, record)) in admins.iter().enumerate() {
            text.push_str(&format!(
                "{}. @{username} (added by @{}, {})\n",
                i + 1,
                record.added_by,
                record.added_at.format("%Y-%m-%d %H:%M:%S")
            ));
        }
    }
    let keyboard = Keyboard::Inline(vec![vec![
        InlineButton::new("➕ Add admin", &Button::bare(ButtonAction::AddAdmin)),
        InlineButton::new("❌ Remove admin", &Button::bare(ButtonAction::RemoveAdmin)),
    ]]);
    OutboundMessage::new(chat, text).with_keyboard(keyboard)
}

/// Picker with one button per removable admin.
#[must_use]
pub fn removal_picker(chat: ChatId, admins: &BTreeMap<String, AdminRecord>) -> OutboundMessage {
    let rows = admins
        .keys()
        .map(|username| {
            vec![InlineButton::new(
                format!("@{username}"),
                &Button::new(ButtonAction::ConfirmRemoveAdmin, username.as_str()),
            )]
        })
        .collect();
    OutboundMessage::new(chat, CHOOSE_ADMIN_TO_REMOVE).with_keyboard(Keyboard::Inline(rows))
}

/// Reported when an admin already exists.
#[must_use]
pub fn already_admin(username: &str) -> String {
    format!("@{username} is already an admin.")
}

/// Reported after an admin was added.
#[must_use]
pub fn admin_added(username: &str) -> String {
    format!("✅ @{username} added to admins.")
}

/// Reported after an admin was removed.
#[must_use]
pub fn admin_removed(username: &str) -> String {
    format!("✅ @{username} removed from admins.")
}

/// Statistics summary with the report button.
#[must_use]
pub fn statistics(chat: ChatId, stats: &Statistics) -> OutboundMessage {
    let mut text = format!(
        "📊 Bot statistics:\n\n\
         • Users: {}\n\
         • Tutorials: {}\n\
         • Hero stories: {}\n\
         • Actions: {}\n\n\
         🔝 Most viewed:\n",
        stats.unique_users, stats.total_tutorials, stats.total_stories, stats.total_actions
    );
    if stats.top_viewed.is_empty() {
        text.push_str("No views yet.");
    }
    for (i, (title, views)) in stats.top_viewed.iter().enumerate() {
        text.push_str(&format!("{}. {title} - {views} views\n", i + 1));
    }
    let keyboard = Keyboard::Inline(vec![vec![InlineButton::new(
        "📥 Download report",
        &Button::bare(ButtonAction::DownloadLogs),
    )]]);
    OutboundMessage::new(chat, text).with_keyboard(keyboard)
}

/// Informational text for an entry without media.
#[must_use]
pub fn no_media(kind: EntryKind, caption: &str) -> String {
    format!("{caption}\n\nThere are no videos in this {} yet.", kind.noun())
}

/// Reported when a media item could be neither copied nor forwarded.
#[must_use]
pub fn media_failed(media: &str) -> String {
    format!("Failed to send video. ID: {media}")
}
