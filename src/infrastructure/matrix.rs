//! # Matrix Service Adapter
//!
//! Implements the `ChatTransport` trait for the Matrix protocol using the `matrix_sdk`.
//! This module acts as the bridge between the room-scoped transport interface used by the dispatcher
//! and poll loops, and the specific implementation details of the Matrix SDK.

use crate::domain::error::{BotError, BotResult};
use crate::domain::traits::ChatTransport;
use async_trait::async_trait;
use matrix_sdk::Client;
use matrix_sdk::room::Room;
use matrix_sdk::ruma::RoomId;
use matrix_sdk::ruma::events::room::message::RoomMessageEventContent;

#[derive(Clone)]
pub struct MatrixService {
    client: Client,
}

impl MatrixService {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn room(&self, room_id: &str) -> BotResult<Room> {
        let id = RoomId::parse(room_id).map_err(|e| BotError::Transport(e.to_string()))?;
        self.client
            .get_room(&id)
            .ok_or_else(|| BotError::Transport(format!("Room {} is not known to this client", room_id)))
    }

    async fn send(&self, room_id: &str, content: RoomMessageEventContent) -> BotResult<()> {
        let room = self.room(room_id)?;
        room.send(content)
            .await
            .map(|_| ())
            .map_err(|e| BotError::Transport(e.to_string()))
    }
}

#[async_trait]
impl ChatTransport for MatrixService {
    async fn send_text(&self, room_id: &str, text: &str) -> BotResult<()> {
        tracing::info!("Bot sending text to {}: {}", room_id, text);
        self.send(room_id, RoomMessageEventContent::text_plain(text)).await
    }

    async fn send_formatted(&self, room_id: &str, text: &str) -> BotResult<()> {
        tracing::info!("Bot sending digest to {} ({} chars)", room_id, text.len());
        self.send(room_id, RoomMessageEventContent::text_markdown(text)).await
    }
}
