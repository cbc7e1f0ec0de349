//! qBittorrent torrent client implementation.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::config::QBittorrentConfig;

use super::{parse_tags, TorrentClient, TorrentClientError, TorrentInfo};

/// qBittorrent client implementation.
pub struct QBittorrentClient {
    client: Client,
    config: QBittorrentConfig,
    /// Whether a login succeeded (the SID cookie lives in the cookie jar).
    session: Arc<RwLock<Option<String>>>,
}

impl QBittorrentClient {
    /// Create a new qBittorrent client.
    pub fn new(config: QBittorrentConfig) -> Result<Self, TorrentClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .cookie_store(true)
            .build()
            .map_err(|e| TorrentClientError::Internal(format!("HTTP client: {}", e)))?;

        Ok(Self {
            client,
            config,
            session: Arc::new(RwLock::new(None)),
        })
    }

    /// Get the base URL without trailing slash.
    fn base_url(&self) -> String {
        self.config.base_url()
    }

    /// Login and store session cookie.
    async fn login(&self) -> Result<(), TorrentClientError> {
        let url = format!("{}/api/v2/auth/login", self.base_url());

        let params = [
            ("username", self.config.username.as_str()),
            ("password", self.config.password.as_str()),
        ];

        let response = self
            .client
            .post(&url)
            .form(&params)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if body.contains("Ok.") {
            debug!("qBittorrent login successful");
            let mut session = self.session.write().await;
            *session = Some("authenticated".to_string());
            Ok(())
        } else if body.contains("Fails.") || status == StatusCode::FORBIDDEN {
            Err(TorrentClientError::AuthenticationFailed(
                "Invalid credentials".to_string(),
            ))
        } else {
            Err(TorrentClientError::AuthenticationFailed(format!(
                "Unexpected response (HTTP {}): {}",
                status,
                body.chars().take(100).collect::<String>()
            )))
        }
    }

    /// Ensure we have a valid session, logging in if needed.
    async fn ensure_authenticated(&self) -> Result<(), TorrentClientError> {
        let session = self.session.read().await;
        if session.is_some() {
            return Ok(());
        }
        drop(session);
        self.login().await
    }

    /// Send an authenticated request and return the response body.
    ///
    /// A 403 means the session cookie expired: the session is dropped, the
    /// client logs in again and the request is retried once.
    async fn execute<F>(&self, build: F) -> Result<String, TorrentClientError>
    where
        F: Fn(&Client) -> RequestBuilder,
    {
        self.ensure_authenticated().await?;

        let response = build(&self.client)
            .send()
            .await
            .map_err(map_transport_error)?;

        let response = if response.status() == StatusCode::FORBIDDEN {
            warn!("qBittorrent session expired, re-authenticating");
            {
                let mut session = self.session.write().await;
                *session = None;
            }
            self.login().await?;

            build(&self.client)
                .send()
                .await
                .map_err(map_transport_error)?
        } else {
            response
        };

        let status = response.status();
        if !status.is_success() {
            return Err(TorrentClientError::ApiError(format!("HTTP {}", status)));
        }

        response
            .text()
            .await
            .map_err(|e| TorrentClientError::ApiError(e.to_string()))
    }
}

/// Map a transport-level reqwest failure onto the client error taxonomy.
fn map_transport_error(e: reqwest::Error) -> TorrentClientError {
    if e.is_timeout() {
        TorrentClientError::Timeout
    } else if e.is_connect() {
        TorrentClientError::ConnectionFailed(e.to_string())
    } else {
        TorrentClientError::ApiError(e.to_string())
    }
}

/// qBittorrent torrent info response (subset of `/api/v2/torrents/info`).
#[derive(Debug, Deserialize)]
struct QBTorrentInfo {
    hash: String,
    name: String,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    tags: Option<String>,
    state: String,
    total_size: i64,
    added_on: i64,
}

impl QBTorrentInfo {
    fn into_torrent_info(self) -> TorrentInfo {
        TorrentInfo {
            hash: self.hash.to_lowercase(),
            name: self.name,
            category: self.category.unwrap_or_default(),
            tags: self.tags.as_deref().map(parse_tags).unwrap_or_default(),
            state: self.state,
            size_bytes: self.total_size.max(0) as u64,
            added_on: self.added_on,
        }
    }
}

/// Parse a `/api/v2/torrents/info` body into a snapshot.
///
/// The snapshot is ordered by `(added_on, hash)` so that anything depending on
/// iteration order (such as dedupe tie-breaks) is stable across runs.
fn parse_torrent_list(body: &str) -> Result<Vec<TorrentInfo>, TorrentClientError> {
    let torrents: Vec<QBTorrentInfo> = serde_json::from_str(body)
        .map_err(|e| TorrentClientError::ApiError(format!("Failed to parse response: {}", e)))?;

    let mut results: Vec<TorrentInfo> =
        torrents.into_iter().map(|t| t.into_torrent_info()).collect();
    results.sort_by(|a, b| {
        a.added_on
            .cmp(&b.added_on)
            .then_with(|| a.hash.cmp(&b.hash))
    });

    Ok(results)
}

#[async_trait]
impl TorrentClient for QBittorrentClient {
    fn name(&self) -> &str {
        "qbittorrent"
    }

    async fn list_torrents(&self) -> Result<Vec<TorrentInfo>, TorrentClientError> {
        let url = format!("{}/api/v2/torrents/info", self.base_url());
        let body = self.execute(|client| client.get(&url)).await?;
        parse_torrent_list(&body)
    }

    async fn remove_torrent(&self, hash: &str, delete_files: bool) -> Result<(), TorrentClientError> {
        let url = format!("{}/api/v2/torrents/delete", self.base_url());
        let hash_lower = hash.to_lowercase();
        let delete_str = if delete_files { "true" } else { "false" };

        self.execute(|client| {
            client
                .post(&url)
                .form(&[("hashes", hash_lower.as_str()), ("deleteFiles", delete_str)])
        })
        .await?;

        Ok(())
    }
}
