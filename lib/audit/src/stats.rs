//! Usage statistics derived from the action log.

use crate::record::ActionRecord;
use hero_guide_content::Snapshot;
use std::collections::{BTreeMap, HashSet};

/// Number of entries in the most-viewed ranking.
pub const TOP_VIEWED_LIMIT: usize = 5;

/// Summary shown to admins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statistics {
    pub unique_users: usize,
    pub total_tutorials: usize,
    pub total_stories: usize,
    pub total_actions: usize,
    /// Most viewed entries, as `"<kind>: <title>"`, with their view counts,
    /// highest first. Equal counts are ordered by name.
    pub top_viewed: Vec<(String, usize)>,
}

impl Statistics {
    /// Computes statistics over the records and the current snapshot.
    #[must_use]
    pub fn compute(records: &[ActionRecord], snapshot: &Snapshot) -> Self {
        let unique_users = records
            .iter()
            .map(|r| r.user_id)
            .collect::<HashSet<_>>()
            .len();

        let mut views: BTreeMap<&str, usize> = BTreeMap::new();
        for record in records.iter().filter(|r| r.action.is_view()) {
            *views.entry(record.details.as_str()).or_default() += 1;
        }
        let mut top_viewed: Vec<(String, usize)> = views
            .into_iter()
            .map(|(title, count)| (title.to_string(), count))
            .collect();
        // Stable sort keeps the map's title order among equal counts.
        top_viewed.sort_by(|a, b| b.1.cmp(&a.1));
        top_viewed.truncate(TOP_VIEWED_LIMIT);

        Self {
            unique_users,
            total_tutorials: snapshot.tutorials.len(),
            total_stories: snapshot.stories.len(),
            total_actions: records.len(),
            top_viewed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::ActionKind;
    use hero_guide_content::{EntryKind, MediaRef, Role};
    use hero_guide_core::{Sender, UserId};

    fn view(user: i64, title: &str) -> ActionRecord {
        ActionRecord::new(
            &Sender::new(UserId::new(user), "u"),
            ActionKind::EntryViewed,
            title,
        )
    }

    #[test]
    fn counts_and_ranking() {
        let mut snapshot = Snapshot::default();
        snapshot.create_or_append(EntryKind::Tutorial, "A", "", Role::Tank, MediaRef::new("1"));
        snapshot.create_or_append(EntryKind::Story, "S", "", Role::Mage, MediaRef::new("2"));

        let mut records = vec![
            view(1, "B"),
            view(2, "A"),
            view(1, "A"),
            view(3, "C"),
            view(3, "B"),
            view(3, "A"),
            view(2, "D"),
            view(2, "E"),
            view(2, "F"),
        ];
        records.push(ActionRecord::new(
            &Sender::new(UserId::new(4), "x"),
            ActionKind::Started,
            "A",
        ));

        let stats = Statistics::compute(&records, &snapshot);

        assert_eq!(stats.unique_users, 4);
        assert_eq!(stats.total_tutorials, 1);
        assert_eq!(stats.total_stories, 1);
        assert_eq!(stats.total_actions, 10);
        assert_eq!(
            stats.top_viewed,
            vec![
                ("A".to_string(), 3),
                ("B".to_string(), 2),
                ("C".to_string(), 1),
                ("D".to_string(), 1),
                ("E".to_string(), 1),
            ]
        );
    }

    #[test]
    fn same_title_in_both_kinds_ranks_separately() {
        let records = vec![
            view(1, "tutorial: Saga"),
            view(2, "story: Saga"),
            view(3, "story: Saga"),
        ];

        let stats = Statistics::compute(&records, &Snapshot::default());

        assert_eq!(
            stats.top_viewed,
            vec![
                ("story: Saga".to_string(), 2),
                ("tutorial: Saga".to_string(), 1),
            ]
        );
    }

    #[test]
    fn empty_log() {
        let stats = Statistics::compute(&[], &Snapshot::default());
        assert_eq!(stats.unique_users, 0);
        assert!(stats.top_viewed.is_empty());
    }
}
