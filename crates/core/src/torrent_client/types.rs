//! Types for torrent client operations.

use std::collections::BTreeSet;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during torrent client operations.
#[derive(Debug, Error)]
pub enum TorrentClientError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Torrent not found: {0}")]
    TorrentNotFound(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Normalized view of one torrent, as seen by the cleanup policies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TorrentInfo {
    /// Info hash (lowercase hex).
    pub hash: String,
    /// Torrent name.
    pub name: String,
    /// Category/label. Empty when unset.
    #[serde(default)]
    pub category: String,
    /// Tags, trimmed and lowercased. See [`parse_tags`].
    #[serde(default)]
    pub tags: BTreeSet<String>,
    /// Raw client state string (e.g. `stalledDL`, `uploading`).
    pub state: String,
    /// Total size in bytes.
    pub size_bytes: u64,
    /// When the torrent was added (Unix seconds).
    pub added_on: i64,
}

impl TorrentInfo {
    /// Create a record with no category, no tags and zero size.
    pub fn new(hash: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            hash: hash.into(),
            name: name.into(),
            category: String::new(),
            tags: BTreeSet::new(),
            state: String::new(),
            size_bytes: 0,
            added_on: 0,
        }
    }

    /// Set the category.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Set tags from a comma-joined field.
    pub fn with_tags(mut self, raw: &str) -> Self {
        self.tags = parse_tags(raw);
        self
    }

    /// Set the raw client state.
    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = state.into();
        self
    }

    /// Set the total size in bytes.
    pub fn with_size(mut self, size_bytes: u64) -> Self {
        self.size_bytes = size_bytes;
        self
    }

    /// Set the added-on timestamp.
    pub fn with_added_on(mut self, added_on: i64) -> Self {
        self.added_on = added_on;
        self
    }

    /// Seconds elapsed between `added_on` and `now`.
    pub fn age_secs(&self, now: i64) -> i64 {
        now - self.added_on
    }

    /// Size in GiB, for display.
    pub fn size_gb(&self) -> f64 {
        self.size_bytes as f64 / (1024u64 * 1024 * 1024) as f64
    }
}

/// Parse a comma-joined tag field into a normalized tag set.
///
/// Each component is trimmed and lowercased; empty components are dropped, so
/// an empty source yields an empty set.
pub fn parse_tags(raw: &str) -> BTreeSet<String> {
    raw.split(',')
        .map(|tag| tag.trim().to_lowercase())
        .filter(|tag| !tag.is_empty())
        .collect()
}

/// Trait for torrent client backends.
#[async_trait]
pub trait TorrentClient: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &str;

    /// List every torrent known to the client.
    async fn list_torrents(&self) -> Result<Vec<TorrentInfo>, TorrentClientError>;

    /// Remove a torrent.
    /// If `delete_files` is true, also delete downloaded files.
    async fn remove_torrent(&self, hash: &str, delete_files: bool)
        -> Result<(), TorrentClientError>;
}
