//! # Domain Errors
//!
//! The error taxonomy shared by the sync engine, the command handlers and the adapters.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BotError {
    /// The remote feed was unreachable or rejected our credentials.
    #[error("Fetching the timeline failed: {reason}")]
    FetchFailed { reason: String },

    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Snapshot at {path} is unreadable: {source}")]
    CorruptSnapshot {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Sending the message failed: {0}")]
    Transport(String),

    #[error("Not implemented yet: {0}")]
    Unimplemented(String),
}

impl BotError {
    pub fn fetch(reason: impl Into<String>) -> Self {
        Self::FetchFailed {
            reason: reason.into(),
        }
    }

    /// Storage failures, as opposed to remote or transport failures.
    pub fn is_storage(&self) -> bool {
        matches!(self, Self::Storage(_) | Self::CorruptSnapshot { .. })
    }
}

pub type BotResult<T> = Result<T, BotError>;
