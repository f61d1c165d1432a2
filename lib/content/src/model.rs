//! Content model: entries, roles, admins and the repository snapshot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Which collection an entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    /// Short video lessons.
    Tutorial,
    /// Narrative hero stories.
    Story,
}

impl EntryKind {
    /// Returns the other kind.
    #[must_use]
    pub fn other(&self) -> Self {
        match self {
            Self::Tutorial => Self::Story,
            Self::Story => Self::Tutorial,
        }
    }

    /// Human-readable singular noun.
    #[must_use]
    pub fn noun(&self) -> &'static str {
        match self {
            Self::Tutorial => "tutorial",
            Self::Story => "hero story",
        }
    }

    /// Human-readable plural noun.
    #[must_use]
    pub fn plural(&self) -> &'static str {
        match self {
            Self::Tutorial => "tutorials",
            Self::Story => "hero stories",
        }
    }

    /// Icon shown in front of entry titles.
    #[must_use]
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Tutorial => "📚",
            Self::Story => "📖",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.noun())
    }
}

/// Hero role an entry is filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "Marksman/ADK")]
    Marksman,
    Tank,
    Fighter,
    Assassin,
    Support,
    Mage,
}

impl Role {
    /// Every role, in keyboard order.
    pub const ALL: [Role; 6] = [
        Role::Marksman,
        Role::Tank,
        Role::Fighter,
        Role::Assassin,
        Role::Support,
        Role::Mage,
    ];

    /// The label users see and type.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Marksman => "Marksman/ADK",
            Self::Tank => "Tank",
            Self::Fighter => "Fighter",
            Self::Assassin => "Assassin",
            Self::Support => "Support",
            Self::Mage => "Mage",
        }
    }

    /// Parses an exact role label.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|role| role.label() == label)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Opaque reference to a video stored in the source channel.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MediaRef(String);

impl MediaRef {
    /// Wraps a stored reference.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Parses operator input, accepting only positive message numbers.
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        match trimmed.parse::<i64>() {
            Ok(id) if id > 0 => Some(Self(trimmed.to_string())),
            _ => None,
        }
    }

    /// Returns the reference as stored.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Message number inside the source channel, if the reference is numeric.
    #[must_use]
    pub fn message_id(&self) -> Option<i64> {
        self.0.trim().parse().ok().filter(|id| *id > 0)
    }
}

impl fmt::Display for MediaRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A tutorial or hero story. The title is the key of its collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentEntry {
    /// Short description shown with the first video.
    #[serde(default)]
    pub bio: String,
    /// Role the entry is filed under; empty until a workflow sets it.
    #[serde(default, with = "stored_role")]
    pub role: Option<Role>,
    /// Videos in insertion order.
    #[serde(default)]
    pub videos: Vec<MediaRef>,
}

impl ContentEntry {
    /// Creates an entry holding a single video.
    #[must_use]
    pub fn new(bio: impl Into<String>, role: Option<Role>, video: MediaRef) -> Self {
        Self {
            bio: bio.into(),
            role,
            videos: vec![video],
        }
    }
}

/// An operator granted admin rights by another admin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminRecord {
    /// Username without the leading '@'.
    pub username: String,
    /// Username of the admin who granted the rights.
    pub added_by: String,
    /// When the rights were granted.
    pub added_at: DateTime<Utc>,
}

impl AdminRecord {
    /// Creates a record stamped with the current time.
    #[must_use]
    pub fn new(username: impl Into<String>, added_by: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            added_by: added_by.into(),
            added_at: Utc::now(),
        }
    }
}

/// Entries of one kind keyed by title.
pub type Collection = BTreeMap<String, ContentEntry>;

/// Result of the create-or-append commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendOutcome {
    /// A new entry was created.
    Created,
    /// The video was appended to an existing entry.
    Appended,
}

/// Full copy of the repository at one load instant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tutorials: Collection,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub admins: BTreeMap<String, AdminRecord>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub stories: Collection,
}

impl Snapshot {
    /// Returns the collection for a kind.
    #[must_use]
    pub fn collection(&self, kind: EntryKind) -> &Collection {
        match kind {
            EntryKind::Tutorial => &self.tutorials,
            EntryKind::Story => &self.stories,
        }
    }

    /// Returns the collection for a kind, mutably.
    pub fn collection_mut(&mut self, kind: EntryKind) -> &mut Collection {
        match kind {
            EntryKind::Tutorial => &mut self.tutorials,
            EntryKind::Story => &mut self.stories,
        }
    }

    /// Looks up an entry by exact title.
    #[must_use]
    pub fn entry(&self, kind: EntryKind, title: &str) -> Option<&ContentEntry> {
        self.collection(kind).get(title)
    }

    /// Creates the entry or appends the video to it.
    ///
    /// Tutorials keep their bio on append and only take the role when theirs
    /// is empty. Stories take the collected bio and role.
    pub fn create_or_append(
        &mut self,
        kind: EntryKind,
        title: &str,
        bio: &str,
        role: Role,
        video: MediaRef,
    ) -> AppendOutcome {
        let collection = self.collection_mut(kind);
        let Some(entry) = collection.get_mut(title) else {
            collection.insert(title.to_string(), ContentEntry::new(bio, Some(role), video));
            return AppendOutcome::Created;
        };

        entry.videos.push(video);
        match kind {
            EntryKind::Tutorial => {
                if entry.role.is_none() {
                    entry.role = Some(role);
                }
            }
            EntryKind::Story => {
                entry.bio = bio.to_string();
                entry.role = Some(role);
            }
        }
        AppendOutcome::Appended
    }

    /// Replaces an entry's bio. Returns false if the entry does not exist.
    pub fn replace_bio(&mut self, kind: EntryKind, title: &str, bio: &str) -> bool {
        self.collection_mut(kind)
            .get_mut(title)
            .map(|entry| entry.bio = bio.to_string())
            .is_some()
    }

    /// Replaces an entry's role. Returns false if the entry does not exist.
    pub fn replace_role(&mut self, kind: EntryKind, title: &str, role: Role) -> bool {
        self.collection_mut(kind)
            .get_mut(title)
            .map(|entry| entry.role = Some(role))
            .is_some()
    }

    /// Appends a video to an existing entry. Returns false if it does not exist.
    pub fn push_video(&mut self, kind: EntryKind, title: &str, video: MediaRef) -> bool {
        self.collection_mut(kind)
            .get_mut(title)
            .map(|entry| entry.videos.push(video))
            .is_some()
    }

    /// Removes an entry. Returns false if it did not exist.
    pub fn remove_entry(&mut self, kind: EntryKind, title: &str) -> bool {
        self.collection_mut(kind).remove(title).is_some()
    }

    /// Inserts an admin record unless the username is already present.
    pub fn add_admin(&mut self, record: AdminRecord) -> bool {
        if self.admins.contains_key(&record.username) {
            return false;
        }
        self.admins.insert(record.username.clone(), record);
        true
    }

    /// Removes an admin record. Returns false if it did not exist.
    pub fn remove_admin(&mut self, username: &str) -> bool {
        self.admins.remove(username).is_some()
    }
}

/// Collections written as `null` decode as empty.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Stored role field: `""` means no role.
///
/// Labels that are not one of the six roles decode as no role rather than
/// failing the whole document.
mod stored_role {
    use super::Role;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(role: &Option<Role>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(role.map(|r| r.label()).unwrap_or(""))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Role>, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().and_then(Role::from_label))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video(id: &str) -> MediaRef {
        MediaRef::new(id)
    }

    #[test]
    fn role_labels_round_trip() {
        for role in Role::ALL {
            assert_eq!(Role::from_label(role.label()), Some(role));
        }
        assert_eq!(Role::from_label("fighter"), None);
        assert_eq!(Role::from_label(""), None);
    }

    #[test]
    fn media_ref_parse_requires_positive_number() {
        assert_eq!(MediaRef::parse(" 55 ").map(|m| m.message_id()), Some(Some(55)));
        assert!(MediaRef::parse("abc").is_none());
        assert!(MediaRef::parse("0").is_none());
        assert!(MediaRef::parse("-4").is_none());
        assert_eq!(MediaRef::new("legacy").message_id(), None);
    }

    #[test]
    fn create_then_append_keeps_video_order() {
        let mut snapshot = Snapshot::default();
        let first = snapshot.create_or_append(
            EntryKind::Tutorial,
            "Night Fighter",
            "A brief tale",
            Role::Fighter,
            video("55"),
        );
        let second = snapshot.create_or_append(
            EntryKind::Tutorial,
            "Night Fighter",
            "Other bio",
            Role::Tank,
            video("56"),
        );

        assert_eq!(first, AppendOutcome::Created);
        assert_eq!(second, AppendOutcome::Appended);
        let entry = snapshot
            .entry(EntryKind::Tutorial, "Night Fighter")
            .expect("entry exists");
        assert_eq!(entry.videos, vec![video("55"), video("56")]);
        assert_eq!(entry.bio, "A brief tale");
        assert_eq!(entry.role, Some(Role::Fighter));
    }

    #[test]
    fn tutorial_append_fills_empty_role_only() {
        let mut snapshot = Snapshot::default();
        snapshot.tutorials.insert(
            "Old".to_string(),
            ContentEntry {
                bio: "kept".to_string(),
                role: None,
                videos: vec![video("1")],
            },
        );

        snapshot.create_or_append(EntryKind::Tutorial, "Old", "new", Role::Mage, video("2"));

        let entry = snapshot.entry(EntryKind::Tutorial, "Old").expect("entry");
        assert_eq!(entry.role, Some(Role::Mage));
        assert_eq!(entry.bio, "kept");
        assert_eq!(entry.videos.len(), 2);
    }

    #[test]
    fn story_append_takes_collected_bio_and_role() {
        let mut snapshot = Snapshot::default();
        snapshot.create_or_append(EntryKind::Story, "Saga", "first", Role::Tank, video("1"));
        snapshot.create_or_append(EntryKind::Story, "Saga", "second", Role::Support, video("2"));

        let entry = snapshot.entry(EntryKind::Story, "Saga").expect("entry");
        assert_eq!(entry.bio, "second");
        assert_eq!(entry.role, Some(Role::Support));
        assert_eq!(entry.videos, vec![video("1"), video("2")]);
        assert!(snapshot.tutorials.is_empty());
    }

    #[test]
    fn replacements_report_missing_entries() {
        let mut snapshot = Snapshot::default();
        assert!(!snapshot.replace_bio(EntryKind::Tutorial, "ghost", "x"));
        assert!(!snapshot.replace_role(EntryKind::Story, "ghost", Role::Tank));
        assert!(!snapshot.push_video(EntryKind::Tutorial, "ghost", video("3")));
        assert!(!snapshot.remove_entry(EntryKind::Story, "ghost"));
    }

    #[test]
    fn admin_records_are_unique() {
        let mut snapshot = Snapshot::default();
        assert!(snapshot.add_admin(AdminRecord::new("newop", "boss")));
        assert!(!snapshot.add_admin(AdminRecord::new("newop", "someone")));
        assert_eq!(snapshot.admins.len(), 1);
        assert_eq!(snapshot.admins["newop"].added_by, "boss");
        assert!(snapshot.remove_admin("newop"));
        assert!(!snapshot.remove_admin("newop"));
    }

    #[test]
    fn decodes_legacy_document() {
        let json = r#"{
            "tutorials": {
                "Night Fighter": {"bio": "A brief tale", "role": "Fighter", "videos": ["55"]},
                "Untagged": {"bio": "", "role": "", "videos": []}
            },
            "admins": null,
            "stories": {
                "Saga": {"bio": "b", "role": "Somebody", "videos": ["7"]}
            }
        }"#;
        let snapshot: Snapshot = serde_json::from_str(json).expect("decode");

        assert_eq!(
            snapshot.entry(EntryKind::Tutorial, "Night Fighter").and_then(|e| e.role),
            Some(Role::Fighter)
        );
        assert_eq!(snapshot.entry(EntryKind::Tutorial, "Untagged").and_then(|e| e.role), None);
        assert_eq!(snapshot.entry(EntryKind::Story, "Saga").and_then(|e| e.role), None);
        assert!(snapshot.admins.is_empty());
    }

    #[test]
    fn empty_role_is_stored_as_empty_string() {
        let entry = ContentEntry {
            bio: "b".to_string(),
            role: None,
            videos: Vec::new(),
        };
        let json = serde_json::to_value(&entry).expect("encode");
        assert_eq!(json["role"], "");

        let tagged = ContentEntry::new("b", Some(Role::Marksman), video("9"));
        let json = serde_json::to_value(&tagged).expect("encode");
        assert_eq!(json["role"], "Marksman/ADK");
        assert_eq!(json["videos"][0], "9");
    }
}
