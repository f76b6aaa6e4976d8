//! # Help Command
//!
//! Handles the `!help` command.
//! Displays the command list to the user.

use async_trait::async_trait;

use super::CommandHandler;
use crate::domain::error::BotResult;
use crate::domain::types::OutboundMessage;

pub struct HelpCommand;

#[async_trait]
impl CommandHandler for HelpCommand {
    async fn handle(&self, _room_id: &str, _args: &[String]) -> BotResult<Vec<OutboundMessage>> {
        Ok(vec![OutboundMessage::Formatted(crate::strings::help::MAIN.to_string())])
    }
}
