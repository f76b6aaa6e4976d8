//! Shared doubles for the feed and chat capabilities.

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::domain::error::{BotError, BotResult};
use crate::domain::traits::{ChatTransport, FeedProvider};
use crate::domain::types::{Author, Counts, Item, MediaAttachment, TimelineKey};

/// An item created `secs` seconds after 2024-01-01T00:00:00Z.
pub fn item_at(id: &str, secs: i64) -> Item {
    Item {
        id: id.to_string(),
        created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + chrono::Duration::seconds(secs),
        author: Author {
            handle: "alice".to_string(),
            profile_url: "https://example.social/@alice".to_string(),
        },
        body: format!("<p>post {}</p>", id),
        permalink: format!("https://example.social/@alice/{}", id),
        counts: Counts {
            replies: 1,
            reblogs: 2,
            favorites: 3,
        },
        media: Vec::new(),
    }
}

pub fn with_media(mut item: Item, urls: &[&str]) -> Item {
    item.media = urls
        .iter()
        .map(|u| MediaAttachment {
            preview_url: u.to_string(),
        })
        .collect();
    item
}

/// Feed that serves a configurable batch and counts fetches.
#[derive(Default)]
pub struct FakeFeed {
    batch: Mutex<Vec<Item>>,
    failing: Mutex<bool>,
    fetches: AtomicUsize,
}

impl FakeFeed {
    pub fn with_items(items: Vec<Item>) -> Self {
        let feed = Self::default();
        feed.set_items(items);
        feed
    }

    pub fn set_items(&self, items: Vec<Item>) {
        *self.batch.lock().unwrap() = items;
    }

    pub fn set_failing(&self, failing: bool) {
        *self.failing.lock().unwrap() = failing;
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FeedProvider for FakeFeed {
    async fn fetch_timeline(&self, _key: &TimelineKey) -> BotResult<Vec<Item>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if *self.failing.lock().unwrap() {
            return Err(BotError::fetch("HTTP 401: invalid token"));
        }
        Ok(self.batch.lock().unwrap().clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sent {
    pub room_id: String,
    pub text: String,
    pub formatted: bool,
}

/// Transport that records every message instead of sending it.
#[derive(Default)]
pub struct RecordingTransport {
    sent: Mutex<Vec<Sent>>,
    failing: Mutex<bool>,
}

impl RecordingTransport {
    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    pub fn set_failing(&self, failing: bool) {
        *self.failing.lock().unwrap() = failing;
    }

    fn record(&self, room_id: &str, text: &str, formatted: bool) -> BotResult<()> {
        if *self.failing.lock().unwrap() {
            return Err(BotError::Transport("room not joined".to_string()));
        }
        self.sent.lock().unwrap().push(Sent {
            room_id: room_id.to_string(),
            text: text.to_string(),
            formatted,
        });
        Ok(())
    }
}

#[async_trait]
impl ChatTransport for RecordingTransport {
    async fn send_text(&self, room_id: &str, text: &str) -> BotResult<()> {
        self.record(room_id, text, false)
    }

    async fn send_formatted(&self, room_id: &str, text: &str) -> BotResult<()> {
        self.record(room_id, text, true)
    }
}

/// Feed whose fetches never complete.
pub struct StalledFeed;

#[async_trait]
impl FeedProvider for StalledFeed {
    async fn fetch_timeline(&self, _key: &TimelineKey) -> BotResult<Vec<Item>> {
        std::future::pending().await
    }
}
