//! # Ordering
//!
//! Chronological views over a snapshot. Dedup keys are fixed-width timestamps, so sorting the
//! keys as text sorts the items by creation time.

use crate::domain::types::{Item, TimelineSnapshot};

/// Items oldest first.
pub fn sort_chronological(snapshot: &TimelineSnapshot) -> Vec<Item> {
    let mut entries: Vec<(&String, &Item)> = snapshot.entries().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));
    entries.into_iter().map(|(_, item)| item.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::item_at;

    #[test]
    fn test_output_is_non_decreasing() {
        let snapshot = TimelineSnapshot::from_items(vec![
            item_at("d", 3600),
            item_at("a", 0),
            item_at("c", 61),
            item_at("b", 59),
        ]);
        let sorted = sort_chronological(&snapshot);
        assert_eq!(sorted.len(), 4);
        assert!(sorted.windows(2).all(|w| w[0].created_at <= w[1].created_at));
        let ids: Vec<&str> = sorted.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_ordering_spans_day_and_year_boundaries() {
        let snapshot = TimelineSnapshot::from_items(vec![
            item_at("next-year", 366 * 86_400),
            item_at("next-day", 86_400),
            item_at("first", 1),
        ]);
        let ids: Vec<String> = sort_chronological(&snapshot).into_iter().map(|i| i.id).collect();
        assert_eq!(ids, vec!["first", "next-day", "next-year"]);
    }

    #[test]
    fn test_empty_snapshot_sorts_to_nothing() {
        assert!(sort_chronological(&TimelineSnapshot::new()).is_empty());
    }
}
