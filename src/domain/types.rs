//! # Domain Types
//!
//! Feed items, timeline keys and snapshots, plus the chat-side event and message types.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Format of the dedup key. Fixed width, so text order is chronological order.
pub const DEDUP_KEY_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// Second-precision key an item is stored under within its timeline.
pub fn dedup_key(created_at: &DateTime<Utc>) -> String {
    created_at.format(DEDUP_KEY_FORMAT).to_string()
}

/// One feed post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    #[serde(with = "whole_seconds")]
    pub created_at: DateTime<Utc>,
    pub author: Author,
    pub body: String,
    pub permalink: String,
    pub counts: Counts,
    #[serde(default)]
    pub media: Vec<MediaAttachment>,
}

impl Item {
    pub fn dedup_key(&self) -> String {
        dedup_key(&self.created_at)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    pub handle: String,
    #[serde(default)]
    pub profile_url: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counts {
    pub replies: u64,
    pub reblogs: u64,
    pub favorites: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaAttachment {
    pub preview_url: String,
}

/// Timestamps are stored at the dedup granularity so a reload reproduces the same key.
mod whole_seconds {
    use chrono::{DateTime, SubsecRound, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&ts.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|ts| ts.with_timezone(&Utc).trunc_subsecs(0))
            .map_err(serde::de::Error::custom)
    }
}

/// Drops sub-second precision, the granularity items are deduplicated at.
pub fn truncate_to_seconds(ts: DateTime<Utc>) -> DateTime<Utc> {
    ts.trunc_subsecs(0)
}

/// Which timeline a request refers to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TimelineKey {
    Home,
    Local,
    Public,
    /// Tag or list query (e.g. "tag/rust"). Reserved, not served yet.
    #[allow(dead_code)]
    Custom(String),
}

impl TimelineKey {
    /// The timelines the bot serves.
    pub const CANONICAL: [TimelineKey; 3] = [TimelineKey::Home, TimelineKey::Local, TimelineKey::Public];

    pub fn as_str(&self) -> &str {
        match self {
            TimelineKey::Home => "home",
            TimelineKey::Local => "local",
            TimelineKey::Public => "public",
            TimelineKey::Custom(name) => name,
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, TimelineKey::Custom(_))
    }
}

impl fmt::Display for TimelineKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every item known for one timeline, keyed by dedup key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimelineSnapshot {
    items: BTreeMap<String, Item>,
}

impl TimelineSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a snapshot from one fetch. Items sharing a dedup key: the later one wins.
    pub fn from_items(items: impl IntoIterator<Item = Item>) -> Self {
        let mut snapshot = Self::new();
        for item in items {
            snapshot.items.insert(item.dedup_key(), item);
        }
        snapshot
    }

    /// Adds fetched items whose dedup key is not stored yet. Stored items are never replaced.
    /// Returns the number of keys added.
    pub fn merge(&mut self, fetched: impl IntoIterator<Item = Item>) -> usize {
        let fresh: BTreeMap<String, Item> = fetched
            .into_iter()
            .map(|item| (item.dedup_key(), item))
            .filter(|(key, _)| !self.items.contains_key(key))
            .collect();
        let added = fresh.len();
        self.items.extend(fresh);
        added
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[allow(dead_code)]
    pub fn get(&self, key: &str) -> Option<&Item> {
        self.items.get(key)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&String, &Item)> {
        self.items.iter()
    }
}

/// A message seen in a room the bot has joined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundEvent {
    pub room_id: String,
    pub sender_id: String,
    pub raw_text: String,
}

/// A message a command handler wants delivered to the invoking room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundMessage {
    Text(String),
    /// Markdown
    Formatted(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn item_at_millis(id: &str, secs: u32, millis: u32) -> Item {
        Item {
            id: id.to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, secs).unwrap()
                + chrono::Duration::milliseconds(millis as i64),
            author: Author {
                handle: "alice".to_string(),
                profile_url: "https://example.social/@alice".to_string(),
            },
            body: format!("<p>post {}</p>", id),
            permalink: format!("https://example.social/@alice/{}", id),
            counts: Counts::default(),
            media: Vec::new(),
        }
    }

    #[test]
    fn test_dedup_key_is_second_precision_and_fixed_width() {
        let item = item_at_millis("1", 5, 750);
        assert_eq!(item.dedup_key(), "2024/01/01 00:00:05");
        assert_eq!(item.dedup_key().len(), "YYYY/MM/DD hh:mm:ss".len());
    }

    #[test]
    fn test_initial_build_later_item_wins_collision() {
        let snapshot = TimelineSnapshot::from_items(vec![item_at_millis("first", 3, 100), item_at_millis("second", 3, 900)]);
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.get("2024/01/01 00:00:03").unwrap().id, "second");
    }

    #[test]
    fn test_merge_never_replaces_stored_items() {
        let mut snapshot = TimelineSnapshot::from_items(vec![item_at_millis("old", 3, 0)]);
        let added = snapshot.merge(vec![item_at_millis("clash", 3, 500), item_at_millis("new", 4, 0)]);
        assert_eq!(added, 1);
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.get("2024/01/01 00:00:03").unwrap().id, "old");
        assert_eq!(snapshot.get("2024/01/01 00:00:04").unwrap().id, "new");
    }

    #[test]
    fn test_merge_within_batch_later_item_wins() {
        let mut snapshot = TimelineSnapshot::new();
        snapshot.merge(vec![item_at_millis("a", 9, 0), item_at_millis("b", 9, 10)]);
        assert_eq!(snapshot.get("2024/01/01 00:00:09").unwrap().id, "b");
    }

    #[test]
    fn test_serialized_timestamp_round_trips_to_dedup_key() {
        let item = item_at_millis("1", 7, 250);
        let json = serde_json::to_string(&item).unwrap();
        assert!(json.contains("\"2024-01-01T00:00:07Z\""));
        let back: Item = serde_json::from_str(&json).unwrap();
        assert_eq!(back.dedup_key(), item.dedup_key());
        assert_eq!(back.created_at, truncate_to_seconds(item.created_at));
    }

    #[test]
    fn test_snapshot_serializes_as_plain_map() {
        let snapshot = TimelineSnapshot::from_items(vec![item_at_millis("1", 1, 0)]);
        let value = serde_json::to_value(&snapshot).unwrap();
        assert!(value.get("2024/01/01 00:00:01").is_some());
    }

    #[test]
    fn test_timeline_key_names() {
        assert_eq!(TimelineKey::Home.as_str(), "home");
        assert_eq!(TimelineKey::Custom("tag/rust".to_string()).as_str(), "tag/rust");
        assert_eq!(TimelineKey::Public.to_string(), "public");
        assert!(TimelineKey::Custom("list/1".to_string()).is_custom());
    }
}
