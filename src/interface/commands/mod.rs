//! # Command Handlers
//!
//! One handler per chat command (e.g. `!home`, `!reload`, `!cron`).
//! The canonical table is built once at startup and handed to the dispatcher.

pub mod cron;
pub mod echo;
pub mod help;
pub mod reload;
pub mod timeline;

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

use crate::application::poller::PollingSupervisor;
use crate::application::sync::TimelineSyncEngine;
use crate::domain::error::BotResult;
use crate::domain::types::{OutboundMessage, TimelineKey};

/// Turns a command invocation into the messages to send back to the room.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    async fn handle(&self, room_id: &str, args: &[String]) -> BotResult<Vec<OutboundMessage>>;
}

/// Command name -> handler. Names match exactly and case-sensitively.
#[derive(Default, Clone)]
pub struct CommandTable {
    handlers: HashMap<String, Arc<dyn CommandHandler>>,
}

impl CommandTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(mut self, name: &str, handler: impl CommandHandler + 'static) -> Self {
        self.handlers.insert(name.to_string(), Arc::new(handler));
        self
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn CommandHandler>> {
        self.handlers.get(name).cloned()
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

pub fn canonical_table(engine: Arc<TimelineSyncEngine>, supervisor: Arc<PollingSupervisor>) -> CommandTable {
    CommandTable::new()
        .register("help", help::HelpCommand)
        .register("echo", echo::EchoCommand)
        .register("home", timeline::TimelineCommand::new(TimelineKey::Home, engine.clone()))
        .register("local", timeline::TimelineCommand::new(TimelineKey::Local, engine.clone()))
        .register("public", timeline::TimelineCommand::new(TimelineKey::Public, engine.clone()))
        .register("reload", reload::ReloadCommand::new(engine))
        .register("cron", cron::CronCommand::new(supervisor.clone()))
        .register("stop", cron::StopCommand::new(supervisor))
}
