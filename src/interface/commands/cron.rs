//! # Poll Commands
//!
//! Handles `!cron` (start posting the home timeline to this room periodically) and `!stop`.

use async_trait::async_trait;
use std::sync::Arc;

use super::CommandHandler;
use crate::application::poller::{PollStart, PollingSupervisor};
use crate::domain::error::BotResult;
use crate::domain::types::OutboundMessage;
use crate::strings::messages;

pub struct CronCommand {
    supervisor: Arc<PollingSupervisor>,
}

impl CronCommand {
    pub fn new(supervisor: Arc<PollingSupervisor>) -> Self {
        Self { supervisor }
    }
}

#[async_trait]
impl CommandHandler for CronCommand {
    async fn handle(&self, room_id: &str, _args: &[String]) -> BotResult<Vec<OutboundMessage>> {
        let reply = match self.supervisor.start(room_id).await {
            PollStart::Started => messages::poll_started(self.supervisor.interval()),
            PollStart::AlreadyRunning => messages::POLL_ALREADY_RUNNING.to_string(),
        };
        Ok(vec![OutboundMessage::Text(reply)])
    }
}

pub struct StopCommand {
    supervisor: Arc<PollingSupervisor>,
}

impl StopCommand {
    pub fn new(supervisor: Arc<PollingSupervisor>) -> Self {
        Self { supervisor }
    }
}

#[async_trait]
impl CommandHandler for StopCommand {
    async fn handle(&self, room_id: &str, _args: &[String]) -> BotResult<Vec<OutboundMessage>> {
        let reply = if self.supervisor.stop(room_id).await {
            messages::POLL_STOPPED
        } else {
            messages::POLL_NOT_RUNNING
        };
        Ok(vec![OutboundMessage::Text(reply.to_string())])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::sync::TimelineSyncEngine;
    use crate::infrastructure::store::ItemStore;
    use crate::test_support::{FakeFeed, RecordingTransport};
    use std::time::Duration;
    use tempfile::TempDir;

    fn supervisor(dir: &TempDir) -> Arc<PollingSupervisor> {
        let engine = Arc::new(TimelineSyncEngine::new(Arc::new(FakeFeed::default()), ItemStore::new(dir.path())));
        Arc::new(PollingSupervisor::new(
            engine,
            Arc::new(RecordingTransport::default()),
            Duration::from_secs(60),
        ))
    }

    fn text(out: Vec<OutboundMessage>) -> String {
        match out.as_slice() {
            [OutboundMessage::Text(t)] => t.clone(),
            other => panic!("expected one text reply, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_second_cron_is_rejected_until_stopped() {
        let dir = TempDir::new().unwrap();
        let supervisor = supervisor(&dir);
        let cron = CronCommand::new(supervisor.clone());
        let stop = StopCommand::new(supervisor.clone());

        assert_eq!(text(cron.handle("!r:x", &[]).await.unwrap()), messages::poll_started(Duration::from_secs(60)));
        assert_eq!(text(cron.handle("!r:x", &[]).await.unwrap()), messages::POLL_ALREADY_RUNNING);
        assert_eq!(text(stop.handle("!r:x", &[]).await.unwrap()), messages::POLL_STOPPED);
        assert_eq!(text(stop.handle("!r:x", &[]).await.unwrap()), messages::POLL_NOT_RUNNING);
        assert!(supervisor.active_rooms().await.is_empty());
    }
}
