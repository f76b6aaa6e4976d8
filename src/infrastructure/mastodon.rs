//! # Mastodon Feed Adapter
//!
//! Implements the `FeedProvider` trait over the Mastodon REST API using `reqwest`.
//! Also handles first-run credentials: app registration and password login, cached on disk.

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::domain::config::MastodonConfig;
use crate::domain::error::{BotError, BotResult};
use crate::domain::traits::FeedProvider;
use crate::domain::types::{Author, Counts, Item, MediaAttachment, TimelineKey, truncate_to_seconds};

const OOB_REDIRECT: &str = "urn:ietf:wg:oauth:2.0:oob";
const SCOPES: &str = "read";
const NO_QUERY: &[(&str, &str)] = &[];
const LOCAL_ONLY: &[(&str, &str)] = &[("local", "true")];

/// Mastodon status, reduced to the fields the digest uses
#[derive(Debug, Deserialize)]
struct Status {
    id: String,
    created_at: DateTime<Utc>,
    account: Account,
    #[serde(default)]
    content: String,
    url: Option<String>,
    uri: String,
    #[serde(default)]
    replies_count: u64,
    #[serde(default)]
    reblogs_count: u64,
    #[serde(default)]
    favourites_count: u64,
    #[serde(default)]
    media_attachments: Vec<Attachment>,
}

#[derive(Debug, Deserialize)]
struct Account {
    acct: String,
    #[serde(default)]
    url: String,
}

#[derive(Debug, Deserialize)]
struct Attachment {
    preview_url: Option<String>,
    url: Option<String>,
}

impl From<Status> for Item {
    fn from(status: Status) -> Self {
        Item {
            id: status.id,
            created_at: truncate_to_seconds(status.created_at),
            author: Author {
                handle: status.account.acct,
                profile_url: status.account.url,
            },
            body: status.content,
            permalink: status.url.unwrap_or(status.uri),
            counts: Counts {
                replies: status.replies_count,
                reblogs: status.reblogs_count,
                favorites: status.favourites_count,
            },
            media: status
                .media_attachments
                .into_iter()
                .filter_map(|a| a.preview_url.or(a.url))
                .map(|preview_url| MediaAttachment { preview_url })
                .collect(),
        }
    }
}

/// Client credentials of the registered app, as kept in the `secret` file
#[derive(Debug, Serialize, Deserialize)]
struct ClientCredentials {
    client_id: String,
    client_secret: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

pub struct MastodonClient {
    http: Client,
    base_url: String,
    access_token: String,
}

impl MastodonClient {
    pub fn with_token(base_url: &str, access_token: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token: access_token.into(),
        }
    }

    /// Builds an authenticated client. Uses the configured token if there is one, otherwise
    /// registers the app (once) and logs in with the configured mail and password.
    pub async fn connect(config: &MastodonConfig) -> Result<Self> {
        if let Some(token) = &config.access_token {
            return Ok(Self::with_token(&config.api_base_url, token.clone()));
        }

        let (Some(mail), Some(password)) = (&config.user_mail, &config.user_password) else {
            bail!("Mastodon needs either access_token or user_mail and user_password");
        };

        let mut client = Self::with_token(&config.api_base_url, String::new());
        let credentials = client.load_or_register_app(config).await?;
        let token = client.password_login(&credentials, mail, password).await?;

        write_secret(Path::new(&config.token), &token).await?;
        tracing::info!("Logged in to {} as {}", client.base_url, mail);
        client.access_token = token;
        Ok(client)
    }

    async fn load_or_register_app(&self, config: &MastodonConfig) -> Result<ClientCredentials> {
        let secret_path = Path::new(&config.secret);
        if let Ok(content) = tokio::fs::read_to_string(secret_path).await {
            return serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse {}", secret_path.display()));
        }

        tracing::info!("Registering app '{}' with {}", config.client_name, self.base_url);
        let response = self
            .http
            .post(format!("{}/api/v1/apps", self.base_url))
            .form(&[
                ("client_name", config.client_name.as_str()),
                ("redirect_uris", OOB_REDIRECT),
                ("scopes", SCOPES),
            ])
            .send()
            .await
            .context("App registration request failed")?
            .error_for_status()
            .context("App registration was rejected")?;
        let credentials: ClientCredentials = response
            .json()
            .await
            .context("Failed to parse app registration response")?;

        write_secret(secret_path, &serde_json::to_string_pretty(&credentials)?).await?;
        Ok(credentials)
    }

    async fn password_login(&self, credentials: &ClientCredentials, mail: &str, password: &str) -> Result<String> {
        let response = self
            .http
            .post(format!("{}/oauth/token", self.base_url))
            .form(&[
                ("grant_type", "password"),
                ("client_id", credentials.client_id.as_str()),
                ("client_secret", credentials.client_secret.as_str()),
                ("username", mail),
                ("password", password),
                ("scope", SCOPES),
            ])
            .send()
            .await
            .context("Login request failed")?
            .error_for_status()
            .context("Login was rejected")?;
        let token: TokenResponse = response.json().await.context("Failed to parse login response")?;
        Ok(token.access_token)
    }

    /// Endpoint path and query for a timeline
    fn timeline_endpoint(key: &TimelineKey) -> BotResult<(&'static str, &'static [(&'static str, &'static str)])> {
        match key {
            TimelineKey::Home => Ok(("/api/v1/timelines/home", NO_QUERY)),
            TimelineKey::Local => Ok(("/api/v1/timelines/public", LOCAL_ONLY)),
            TimelineKey::Public => Ok(("/api/v1/timelines/public", NO_QUERY)),
            TimelineKey::Custom(name) => Err(BotError::Unimplemented(format!("custom timeline '{}'", name))),
        }
    }
}

#[async_trait]
impl FeedProvider for MastodonClient {
    async fn fetch_timeline(&self, key: &TimelineKey) -> BotResult<Vec<Item>> {
        let (path, query) = Self::timeline_endpoint(key)?;
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.access_token)
            .query(query)
            .send()
            .await
            .map_err(|e| BotError::fetch(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            return Err(BotError::fetch(format!("HTTP {}: {}", status, body)));
        }

        let statuses: Vec<Status> = response
            .json()
            .await
            .map_err(|e| BotError::fetch(format!("Failed to parse timeline: {}", e)))?;

        tracing::debug!("Fetched {} statuses from {} timeline", statuses.len(), key);
        Ok(statuses.into_iter().map(Item::from).collect())
    }
}

async fn write_secret(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, content)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))
}
