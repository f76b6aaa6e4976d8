//! # Command Dispatcher
//!
//! Routes incoming room messages to the handler bound to their command (e.g., `!home`).
//! Messages from the bot itself, messages without the prefix and unknown commands are ignored.
//! Handler failures are reported back to the room; they never stop the dispatch loop.

use std::sync::Arc;
use tokio::task::JoinHandle;

use crate::application::parsing::parse_command;
use crate::domain::traits::ChatTransport;
use crate::domain::types::{InboundEvent, OutboundMessage};
use crate::interface::commands::CommandTable;
use crate::strings::messages;

/// What the dispatcher did with one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Sent by the bot's own account
    OwnMessage,
    NotACommand,
    UnknownCommand(String),
    Handled { command: String, sent: usize },
    Failed { command: String, error: String },
}

pub struct CommandDispatcher {
    own_user_id: String,
    prefix: String,
    commands: CommandTable,
    transport: Arc<dyn ChatTransport>,
}

impl CommandDispatcher {
    pub fn new(
        own_user_id: impl Into<String>,
        prefix: impl Into<String>,
        commands: CommandTable,
        transport: Arc<dyn ChatTransport>,
    ) -> Self {
        Self {
            own_user_id: own_user_id.into(),
            prefix: prefix.into(),
            commands,
            transport,
        }
    }

    pub async fn dispatch(&self, event: &InboundEvent) -> DispatchOutcome {
        // Answering ourselves would loop forever.
        if event.sender_id == self.own_user_id {
            return DispatchOutcome::OwnMessage;
        }

        let Some(parsed) = parse_command(&self.prefix, &event.raw_text) else {
            return DispatchOutcome::NotACommand;
        };

        let Some(handler) = self.commands.get(&parsed.name) else {
            tracing::debug!("Ignoring unknown command '{}' from {}", parsed.name, event.sender_id);
            return DispatchOutcome::UnknownCommand(parsed.name);
        };

        tracing::info!(
            "Router dispatching cmd='{}' args='{}' sender='{}' room='{}'",
            parsed.name,
            parsed.args.join(" "),
            event.sender_id,
            event.room_id
        );

        match handler.handle(&event.room_id, &parsed.args).await {
            Ok(replies) => {
                let sent = self.deliver(&event.room_id, replies).await;
                DispatchOutcome::Handled {
                    command: parsed.name,
                    sent,
                }
            }
            Err(e) => {
                if e.is_storage() {
                    tracing::error!("Command '{}' hit a storage failure in {}: {}", parsed.name, event.room_id, e);
                } else {
                    tracing::warn!("Command '{}' failed in {}: {}", parsed.name, event.room_id, e);
                }
                let notice = OutboundMessage::Text(messages::command_failed(&parsed.name, &e.to_string()));
                self.deliver(&event.room_id, vec![notice]).await;
                DispatchOutcome::Failed {
                    command: parsed.name,
                    error: e.to_string(),
                }
            }
        }
    }

    /// Dispatches on a task of its own, so a stalled handler in one room never holds up the
    /// event loop feeding the others.
    pub fn spawn_dispatch(self: &Arc<Self>, event: InboundEvent) -> JoinHandle<DispatchOutcome> {
        let dispatcher = Arc::clone(self);
        tokio::spawn(async move {
            let outcome = dispatcher.dispatch(&event).await;
            tracing::debug!("Dispatched message from {}: {:?}", event.sender_id, outcome);
            outcome
        })
    }

    /// Sends each reply in order. Failed sends are logged and not retried.
    async fn deliver(&self, room_id: &str, replies: Vec<OutboundMessage>) -> usize {
        let mut sent = 0;
        for reply in replies {
            let result = match &reply {
                OutboundMessage::Text(text) => self.transport.send_text(room_id, text).await,
                OutboundMessage::Formatted(text) => self.transport.send_formatted(room_id, text).await,
            };
            match result {
                Ok(()) => sent += 1,
                Err(e) => tracing::warn!("Failed to send reply to {}: {}", room_id, e),
            }
        }
        sent
    }
}
