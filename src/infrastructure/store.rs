//! # Item Store
//!
//! Durable per-timeline persistence of seen feed items.
//! One JSON file per timeline under the cache directory. Saves go through a temporary sibling file
//! that is flushed and renamed over the destination, so a crash leaves either the old or the new
//! snapshot on disk.

use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

use crate::domain::error::{BotError, BotResult};
use crate::domain::paths::timeline_file_name;
use crate::domain::types::{TimelineKey, TimelineSnapshot};

#[derive(Debug, Clone)]
pub struct ItemStore {
    root: PathBuf,
}

impl ItemStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, key: &TimelineKey) -> PathBuf {
        self.root.join(timeline_file_name(key))
    }

    /// Loads the persisted snapshot. `None` when the timeline was never saved.
    pub async fn load(&self, key: &TimelineKey) -> BotResult<Option<TimelineSnapshot>> {
        let path = self.path_for(key);
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let snapshot = serde_json::from_str(&content)
            .map_err(|source| BotError::CorruptSnapshot { path: path.clone(), source })?;
        tracing::debug!("Loaded snapshot for {} from {}", key, path.display());
        Ok(Some(snapshot))
    }

    pub async fn save(&self, key: &TimelineKey, snapshot: &TimelineSnapshot) -> BotResult<()> {
        tokio::fs::create_dir_all(&self.root).await?;

        let path = self.path_for(key);
        let temp_path = path.with_extension("json.tmp");
        let content = serde_json::to_vec_pretty(snapshot)
            .map_err(|source| BotError::CorruptSnapshot { path: path.clone(), source })?;

        let written = async {
            let mut file = tokio::fs::File::create(&temp_path).await?;
            file.write_all(&content).await?;
            file.sync_all().await?;
            drop(file);
            // Atomic rename
            tokio::fs::rename(&temp_path, &path).await?;
            Ok::<_, std::io::Error>(())
        }
        .await;

        // No half-written temp file survives a failed save.
        if let Err(e) = written {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        tracing::debug!("Saved {} items for {} to {}", snapshot.len(), key, path.display());
        Ok(())
    }
}
