//! # Domain Traits
//!
//! Abstract interfaces for the two external capabilities: the remote feed and the chat transport.
//! The Infrastructure layer implements them for Mastodon and Matrix; tests use in-memory doubles.

use async_trait::async_trait;

use crate::domain::error::BotResult;
use crate::domain::types::{Item, TimelineKey};

/// Abstract interface for a social feed (e.g., Mastodon)
#[async_trait]
pub trait FeedProvider: Send + Sync {
    /// Fetch the current page of a timeline. Order is not significant.
    async fn fetch_timeline(&self, key: &TimelineKey) -> BotResult<Vec<Item>>;
}

/// Abstract interface for a room-scoped chat transport (e.g., Matrix)
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Send a plain text message to the room
    async fn send_text(&self, room_id: &str, text: &str) -> BotResult<()>;

    /// Send a Markdown formatted message to the room
    async fn send_formatted(&self, room_id: &str, text: &str) -> BotResult<()>;
}
