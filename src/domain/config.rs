//! # Configuration
//!
//! Manages the loading and parsing of the bridge's configuration file (`config.yaml`).
//! Defines the structs for the Matrix and Mastodon services, bot behaviour and logging.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::domain::paths::DEFAULT_CACHE_DIR;

/// Main application configuration structure.
/// Matches the layout of `data/config.yaml`.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub services: ServicesConfig,
    #[serde(default)]
    pub bot: BotConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_yaml(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }
}

/// Configuration for the connected services.
#[derive(Debug, Deserialize, Clone)]
pub struct ServicesConfig {
    pub matrix: MatrixConfig,
    pub mastodon: MastodonConfig,
}

/// Specific configuration for the Matrix service.
#[derive(Debug, Deserialize, Clone)]
pub struct MatrixConfig {
    pub homeserver: String,
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

/// Specific configuration for the Mastodon account whose timelines are bridged.
#[derive(Debug, Deserialize, Clone)]
pub struct MastodonConfig {
    pub api_base_url: String,
    /// Pre-issued token. When absent the bot registers an app and logs in with mail/password.
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub user_mail: Option<String>,
    #[serde(default)]
    pub user_password: Option<String>,
    #[serde(default = "default_client_name")]
    pub client_name: String,
    /// Where the registered app's client credentials are kept
    #[serde(default = "default_secret_file")]
    pub secret: String,
    /// Where the user token is kept after login
    #[serde(default = "default_token_file")]
    pub token: String,
}

/// Bot behaviour.
#[derive(Debug, Deserialize, Clone)]
pub struct BotConfig {
    #[serde(default = "default_prefix")]
    pub prefix: String,
    #[serde(default = "default_cache_dir")]
    pub cache_dir: String,
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
    #[serde(default = "default_true")]
    pub join_on_invite: bool,
}

impl BotConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            cache_dir: default_cache_dir(),
            poll_interval_secs: default_poll_interval(),
            join_on_invite: true,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_dir")]
    pub dir: String,
    #[serde(default = "default_log_file")]
    pub file: String,
    /// EnvFilter directive, used when RUST_LOG is not set
    #[serde(default)]
    pub filter: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: default_log_dir(),
            file: default_log_file(),
            filter: None,
        }
    }
}

fn default_client_name() -> String {
    "matrix-mastodon-bot".to_string()
}
fn default_secret_file() -> String {
    format!("{}/clientcred.secret", DEFAULT_CACHE_DIR)
}
fn default_token_file() -> String {
    format!("{}/usercred.secret", DEFAULT_CACHE_DIR)
}
fn default_prefix() -> String {
    "!".to_string()
}
fn default_cache_dir() -> String {
    DEFAULT_CACHE_DIR.to_string()
}
fn default_poll_interval() -> u64 {
    300
}
fn default_true() -> bool {
    true
}
fn default_log_dir() -> String {
    "data".to_string()
}
fn default_log_file() -> String {
    "session.log".to_string()
}
