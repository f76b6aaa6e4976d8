//! # Polling Supervisor
//!
//! Background loops that periodically refresh the home timeline and post it to a room.
//! At most one loop runs per room; each one owns a cancellation token kept in the registry.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::application::digest_formatter::DigestFormatter;
use crate::application::ordering::sort_chronological;
use crate::application::sync::TimelineSyncEngine;
use crate::domain::error::BotResult;
use crate::domain::traits::ChatTransport;
use crate::domain::types::TimelineKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollStart {
    Started,
    AlreadyRunning,
}

pub struct PollingSupervisor {
    engine: Arc<TimelineSyncEngine>,
    transport: Arc<dyn ChatTransport>,
    interval: Duration,
    loops: Mutex<HashMap<String, CancellationToken>>,
}

impl PollingSupervisor {
    pub fn new(engine: Arc<TimelineSyncEngine>, transport: Arc<dyn ChatTransport>, interval: Duration) -> Self {
        Self {
            engine,
            transport,
            interval,
            loops: Mutex::new(HashMap::new()),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Starts a loop for the room unless one is already running there.
    pub async fn start(&self, room_id: &str) -> PollStart {
        let mut loops = self.loops.lock().await;
        if let Some(token) = loops.get(room_id)
            && !token.is_cancelled()
        {
            return PollStart::AlreadyRunning;
        }

        let token = CancellationToken::new();
        loops.insert(room_id.to_string(), token.clone());
        tokio::spawn(run_loop(
            self.engine.clone(),
            self.transport.clone(),
            room_id.to_string(),
            self.interval,
            token,
        ));
        PollStart::Started
    }

    /// Cancels the room's loop. `false` if none was running.
    pub async fn stop(&self, room_id: &str) -> bool {
        match self.loops.lock().await.remove(room_id) {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }

    pub async fn active_rooms(&self) -> Vec<String> {
        let mut rooms: Vec<String> = self.loops.lock().await.keys().cloned().collect();
        rooms.sort();
        rooms
    }

    pub async fn shutdown(&self) {
        for (room_id, token) in self.loops.lock().await.drain() {
            tracing::info!("Stopping poll loop for {}", room_id);
            token.cancel();
        }
    }
}

async fn run_loop(
    engine: Arc<TimelineSyncEngine>,
    transport: Arc<dyn ChatTransport>,
    room_id: String,
    interval: Duration,
    token: CancellationToken,
) {
    tracing::info!("Poll loop started for {} every {:?}", room_id, interval);
    loop {
        // A started cycle always runs to completion so a save is never cut short.
        if let Err(e) = poll_once(&engine, transport.as_ref(), &room_id).await {
            tracing::warn!("Poll cycle for {} failed: {}", room_id, e);
        }

        tokio::select! {
            _ = token.cancelled() => break,
            _ = tokio::time::sleep(interval) => {}
        }
    }
    tracing::info!("Poll loop for {} stopped", room_id);
}

/// One refresh-and-post cycle. Returns whether a digest was sent.
pub async fn poll_once(engine: &TimelineSyncEngine, transport: &dyn ChatTransport, room_id: &str) -> BotResult<bool> {
    let snapshot = engine.sync(&TimelineKey::Home, true).await?;
    if snapshot.is_empty() {
        return Ok(false);
    }

    tracing::debug!("Posting home digest ({} items) to {}", snapshot.len(), room_id);
    let digest = DigestFormatter::render(&sort_chronological(&snapshot));
    transport.send_formatted(room_id, &digest).await?;
    Ok(true)
}
