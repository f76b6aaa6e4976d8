//! # Echo Command
//!
//! Handles the `!echo` command.
//! Repeats the arguments back to the room.

use async_trait::async_trait;

use super::CommandHandler;
use crate::domain::error::BotResult;
use crate::domain::types::OutboundMessage;

/// `!echo say something` -> `say something`
pub struct EchoCommand;

#[async_trait]
impl CommandHandler for EchoCommand {
    async fn handle(&self, _room_id: &str, args: &[String]) -> BotResult<Vec<OutboundMessage>> {
        if args.is_empty() {
            return Ok(Vec::new());
        }
        Ok(vec![OutboundMessage::Text(args.join(" "))])
    }
}
