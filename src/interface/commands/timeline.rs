//! # Timeline Commands
//!
//! Handles `!home`, `!local` and `!public`: serve the cached snapshot (fetching only the first
//! time) and post it as a digest.

use async_trait::async_trait;
use std::sync::Arc;

use super::CommandHandler;
use crate::application::digest_formatter::DigestFormatter;
use crate::application::ordering::sort_chronological;
use crate::application::sync::TimelineSyncEngine;
use crate::domain::error::BotResult;
use crate::domain::types::{OutboundMessage, TimelineKey};

pub struct TimelineCommand {
    key: TimelineKey,
    engine: Arc<TimelineSyncEngine>,
}

impl TimelineCommand {
    pub fn new(key: TimelineKey, engine: Arc<TimelineSyncEngine>) -> Self {
        Self { key, engine }
    }
}

#[async_trait]
impl CommandHandler for TimelineCommand {
    async fn handle(&self, _room_id: &str, _args: &[String]) -> BotResult<Vec<OutboundMessage>> {
        let snapshot = self.engine.sync(&self.key, false).await?;
        if snapshot.is_empty() {
            tracing::debug!("{} timeline is empty, nothing to post", self.key);
            return Ok(Vec::new());
        }
        let digest = DigestFormatter::render(&sort_chronological(&snapshot));
        Ok(vec![OutboundMessage::Formatted(digest)])
    }
}
