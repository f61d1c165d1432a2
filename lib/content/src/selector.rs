//! Pure queries over a repository snapshot.
//!
//! Collections are ordered maps, so every listing comes back in
//! lexicographic title order.

use crate::model::{ContentEntry, EntryKind, MediaRef, Role, Snapshot};

/// A borrowed entry together with its key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryRef<'a> {
    /// Collection the entry lives in.
    pub kind: EntryKind,
    /// Entry title.
    pub title: &'a str,
    /// The entry itself.
    pub entry: &'a ContentEntry,
}

/// Titles of every entry of `kind` filed under `role`.
#[must_use]
pub fn filter_by_role(snapshot: &Snapshot, kind: EntryKind, role: Role) -> Vec<&str> {
    snapshot
        .collection(kind)
        .iter()
        .filter(|(_, entry)| entry.role == Some(role))
        .map(|(title, _)| title.as_str())
        .collect()
}

/// Resolves an exact title within one collection.
#[must_use]
pub fn resolve_title<'a>(snapshot: &'a Snapshot, kind: EntryKind, text: &str) -> Option<EntryRef<'a>> {
    snapshot
        .collection(kind)
        .get_key_value(text)
        .map(|(title, entry)| EntryRef {
            kind,
            title: title.as_str(),
            entry,
        })
}

/// Resolves a title, looking in `preferred` before the other collection.
#[must_use]
pub fn resolve_any<'a>(
    snapshot: &'a Snapshot,
    preferred: EntryKind,
    text: &str,
) -> Option<EntryRef<'a>> {
    resolve_title(snapshot, preferred, text)
        .or_else(|| resolve_title(snapshot, preferred.other(), text))
}

/// Every entry of a kind, in title order.
pub fn entries(snapshot: &Snapshot, kind: EntryKind) -> impl Iterator<Item = EntryRef<'_>> {
    snapshot
        .collection(kind)
        .iter()
        .map(move |(title, entry)| EntryRef {
            kind,
            title: title.as_str(),
            entry,
        })
}

/// Media of an entry in relay order.
#[must_use]
pub fn media_sequence(entry: &ContentEntry) -> &[MediaRef] {
    &entry.videos
}
