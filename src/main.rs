//! # Main Entry Point
//!
//! Wires the bridge together:
//! - Domain: Configuration, Types, Traits
//! - Infrastructure: Mastodon feed, Matrix transport, Item store
//! - Application: Sync engine, Dispatcher, Poller, Logging
//! - Interface: Command Handlers
//!

mod application;
mod domain;
mod infrastructure;
mod interface;
mod strings;

#[cfg(test)]
mod test_support;

use anyhow::{Context, Result};
use clap::Parser;
use matrix_sdk::{
    Client,
    config::SyncSettings,
    room::Room,
    ruma::events::room::{
        member::{MembershipState, StrippedRoomMemberEvent},
        message::{MessageType, SyncRoomMessageEvent},
    },
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::application::poller::PollingSupervisor;
use crate::application::router::CommandDispatcher;
use crate::application::sync::TimelineSyncEngine;
use crate::domain::config::AppConfig;
use crate::domain::types::InboundEvent;
use crate::infrastructure::mastodon::MastodonClient;
use crate::infrastructure::matrix::MatrixService;
use crate::infrastructure::store::ItemStore;
use crate::interface::commands::canonical_table;
use crate::strings::messages;

#[derive(Parser, Debug)]
#[command(name = "mastobridge", about = "Posts Mastodon timelines into Matrix rooms")]
struct Cli {
    /// Path to the YAML configuration
    #[arg(short, long, default_value = "data/config.yaml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Load Configuration
    let cli = Cli::parse();
    let config = AppConfig::load(&cli.config)?;

    // 2. Logging Setup
    let _log_guard = application::logging::init(&config.logging)?;
    tracing::info!("Starting mastobridge...");

    // 3. Mastodon + Sync Engine
    let feed = Arc::new(
        MastodonClient::connect(&config.services.mastodon)
            .await
            .context("Failed to connect to Mastodon")?,
    );
    let store = ItemStore::new(&config.bot.cache_dir);
    tracing::info!("Caching timelines in {}", store.root().display());
    let engine = Arc::new(TimelineSyncEngine::new(feed, store));

    // Warm the cache so the first `!home` is answered without a fetch.
    if let Err(e) = engine.reload_all().await {
        tracing::warn!("Initial timeline load failed: {}", e);
    }

    // 4. Matrix Setup
    let client = Client::builder()
        .homeserver_url(&config.services.matrix.homeserver)
        .build()
        .await?;

    client
        .matrix_auth()
        .login_username(
            &config.services.matrix.username,
            &config.services.matrix.password,
        )
        .initial_device_display_name("mastobridge")
        .send()
        .await
        .context("Matrix login failed")?;

    tracing::info!("Logged in as {}", config.services.matrix.username);

    if let Some(name) = &config.services.matrix.display_name
        && let Err(e) = client.account().set_display_name(Some(name.as_str())).await
    {
        tracing::warn!("Failed to set display name: {}", e);
    }

    let own_user_id = client
        .user_id()
        .context("Matrix session has no user id")?
        .to_string();

    // 5. Application Components
    let transport = Arc::new(MatrixService::new(client.clone()));
    let supervisor = Arc::new(PollingSupervisor::new(
        engine.clone(),
        transport.clone(),
        config.bot.poll_interval(),
    ));
    let commands = canonical_table(engine.clone(), supervisor.clone());
    tracing::info!("Listening for {}{{{}}}", config.bot.prefix, commands.names().join(","));
    let dispatcher = Arc::new(CommandDispatcher::new(
        own_user_id,
        config.bot.prefix.clone(),
        commands,
        transport,
    ));

    // 6. Event Handlers
    let start_time = SystemTime::now();
    client.add_event_handler(move |ev: SyncRoomMessageEvent, room: Room| {
        let dispatcher = dispatcher.clone();
        async move {
            let Some(original_msg) = ev.as_original() else {
                return;
            };

            // Ignore history delivered by the first sync
            let event_time = UNIX_EPOCH + Duration::from_millis(ev.origin_server_ts().get().into());
            if event_time < start_time {
                return;
            }

            let MessageType::Text(text_content) = &original_msg.content.msgtype else {
                return;
            };

            let event = InboundEvent {
                room_id: room.room_id().to_string(),
                sender_id: original_msg.sender.to_string(),
                raw_text: text_content.body.clone(),
            };
            dispatcher.spawn_dispatch(event);
        }
    });

    if config.bot.join_on_invite {
        client.add_event_handler(|ev: StrippedRoomMemberEvent, room: Room| async move {
            if ev.content.membership == MembershipState::Invite {
                tracing::info!("{}", messages::invite_received(room.room_id().as_str()));
                if let Err(e) = room.join().await {
                    tracing::error!(
                        "{}",
                        messages::join_invite_fail(room.room_id().as_str(), &e.to_string())
                    );
                }
            }
        });
    }

    // 7. Sync Loop
    tracing::info!("{}", messages::SYNC_LOOP_START);
    tokio::select! {
        result = client.sync(SyncSettings::default()) => {
            result.context("Matrix sync loop failed")?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("{}", messages::SHUTDOWN);
        }
    }

    tracing::info!("Stopping {} poll loop(s)", supervisor.active_rooms().await.len());
    supervisor.shutdown().await;
    Ok(())
}
