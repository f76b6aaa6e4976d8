//! # Timeline Sync Engine
//!
//! Keeps one snapshot per timeline. A non-forced sync is served from memory or the item store
//! without touching the network; a forced sync (or a first sync) fetches from the feed and merges
//! newly seen items into the stored snapshot.
//!
//! The fetch runs outside any lock. The load-merge-persist step for a timeline runs while holding
//! that timeline's slot mutex, so concurrent reloads and poll cycles cannot drop each other's items.

use futures::future::try_join_all;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::error::{BotError, BotResult};
use crate::domain::traits::FeedProvider;
use crate::domain::types::{TimelineKey, TimelineSnapshot};
use crate::infrastructure::store::ItemStore;

/// In-memory copy of one timeline. `None` until first loaded or built.
type Slot = Arc<Mutex<Option<TimelineSnapshot>>>;

pub struct TimelineSyncEngine {
    feed: Arc<dyn FeedProvider>,
    store: ItemStore,
    slots: Mutex<HashMap<TimelineKey, Slot>>,
}

impl TimelineSyncEngine {
    pub fn new(feed: Arc<dyn FeedProvider>, store: ItemStore) -> Self {
        Self {
            feed,
            store,
            slots: Mutex::new(HashMap::new()),
        }
    }

    async fn slot(&self, key: &TimelineKey) -> Slot {
        let mut slots = self.slots.lock().await;
        slots.entry(key.clone()).or_default().clone()
    }

    pub async fn sync(&self, key: &TimelineKey, force_refresh: bool) -> BotResult<TimelineSnapshot> {
        if key.is_custom() {
            return Err(BotError::Unimplemented(format!("custom timeline '{}'", key)));
        }
        let slot = self.slot(key).await;

        if !force_refresh {
            let mut cached = slot.lock().await;
            if let Some(snapshot) = cached.as_ref() {
                return Ok(snapshot.clone());
            }
            if let Some(snapshot) = self.store.load(key).await? {
                *cached = Some(snapshot.clone());
                return Ok(snapshot);
            }
        }

        let fetched = self.feed.fetch_timeline(key).await?;

        let mut cached = slot.lock().await;
        let existing = match cached.as_ref() {
            Some(snapshot) => Some(snapshot.clone()),
            None => self.store.load(key).await?,
        };

        let snapshot = match existing {
            Some(mut snapshot) => {
                let added = snapshot.merge(fetched);
                tracing::info!("Merged {} new items into {} ({} total)", added, key, snapshot.len());
                snapshot
            }
            None => {
                let snapshot = TimelineSnapshot::from_items(fetched);
                tracing::info!("Built {} snapshot with {} items", key, snapshot.len());
                snapshot
            }
        };

        self.store.save(key, &snapshot).await?;
        *cached = Some(snapshot.clone());
        Ok(snapshot)
    }

    /// Forced sync of the home, local and public timelines.
    pub async fn reload_all(&self) -> BotResult<Vec<(TimelineKey, TimelineSnapshot)>> {
        let syncs = TimelineKey::CANONICAL.into_iter().map(|key| async move {
            let snapshot = self.sync(&key, true).await?;
            Ok::<_, BotError>((key, snapshot))
        });
        try_join_all(syncs).await
    }

    /// No command reaches this yet.
    #[allow(dead_code)]
    pub async fn search(&self, query: &str) -> BotResult<TimelineSnapshot> {
        Err(BotError::Unimplemented(format!("search for '{}'", query)))
    }

    #[allow(dead_code)]
    pub async fn clear_cache(&self) -> BotResult<()> {
        Err(BotError::Unimplemented("clearing the cache".to_string()))
    }
}
