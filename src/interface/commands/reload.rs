//! # Reload Command
//!
//! Handles `!reload`: forced refresh of all three timelines, acknowledged with a short text.
//! The digest itself is left to `!home` / `!local` / `!public`.

use async_trait::async_trait;
use std::sync::Arc;

use super::CommandHandler;
use crate::application::sync::TimelineSyncEngine;
use crate::domain::error::BotResult;
use crate::domain::types::OutboundMessage;

pub struct ReloadCommand {
    engine: Arc<TimelineSyncEngine>,
}

impl ReloadCommand {
    pub fn new(engine: Arc<TimelineSyncEngine>) -> Self {
        Self { engine }
    }
}

#[async_trait]
impl CommandHandler for ReloadCommand {
    async fn handle(&self, _room_id: &str, _args: &[String]) -> BotResult<Vec<OutboundMessage>> {
        for (key, snapshot) in self.engine.reload_all().await? {
            tracing::info!("Reloaded {} timeline: {} items", key, snapshot.len());
        }
        Ok(vec![OutboundMessage::Text(crate::strings::messages::RELOADED.to_string())])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::TimelineKey;
    use crate::infrastructure::store::ItemStore;
    use crate::test_support::{FakeFeed, item_at};
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_reload_refetches_even_when_cached() {
        let dir = TempDir::new().unwrap();
        let feed = Arc::new(FakeFeed::with_items(vec![item_at("1", 0)]));
        let engine = Arc::new(TimelineSyncEngine::new(feed.clone(), ItemStore::new(dir.path())));
        engine.sync(&TimelineKey::Home, false).await.unwrap();

        feed.set_items(vec![item_at("1", 0), item_at("2", 1)]);
        let out = ReloadCommand::new(engine.clone()).handle("!r:x", &[]).await.unwrap();

        assert_eq!(out, vec![OutboundMessage::Text(crate::strings::messages::RELOADED.to_string())]);
        assert_eq!(feed.fetches(), 4);
        assert_eq!(engine.sync(&TimelineKey::Home, false).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_reload_failure_has_no_acknowledgement() {
        let dir = TempDir::new().unwrap();
        let feed = Arc::new(FakeFeed::default());
        feed.set_failing(true);
        let engine = Arc::new(TimelineSyncEngine::new(feed, ItemStore::new(dir.path())));

        assert!(ReloadCommand::new(engine).handle("!r:x", &[]).await.is_err());
    }
}
