//! Mock torrent client for testing.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::torrent_client::{TorrentClient, TorrentClientError, TorrentInfo};

/// A recorded torrent removal for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedRemoval {
    /// Hash passed to `remove_torrent`.
    pub hash: String,
    /// Whether files were to be deleted too.
    pub delete_files: bool,
    /// When the request was made.
    pub timestamp: chrono::DateTime<Utc>,
}

/// Mock implementation of the TorrentClient trait.
///
/// Provides controllable behavior for testing:
/// - Serve a fixed snapshot, in insertion order
/// - Track removals for assertions
/// - Simulate listing failures and per-torrent removal failures
///
/// # Example
///
/// ```rust,ignore
/// let client = MockTorrentClient::with_torrents(vec![fixtures::torrent("abc", "Name")]);
///
/// client.remove_torrent("abc", true).await?;
///
/// let removed = client.removed_torrents().await;
/// assert_eq!(removed.len(), 1);
/// assert!(!client.has_torrent("abc").await);
/// ```
#[derive(Debug, Default)]
pub struct MockTorrentClient {
    /// Current torrents, in snapshot order.
    torrents: Arc<RwLock<Vec<TorrentInfo>>>,
    /// Recorded remove_torrent calls (successful or not).
    removed: Arc<RwLock<Vec<RecordedRemoval>>>,
    /// If set, the next list_torrents call fails with this error.
    list_error: Arc<RwLock<Option<TorrentClientError>>>,
    /// Removal failures keyed by hash.
    removal_errors: Arc<RwLock<HashMap<String, TorrentClientError>>>,
    /// Number of list_torrents calls.
    list_calls: Arc<RwLock<usize>>,
}

impl MockTorrentClient {
    /// Create a mock client with no torrents.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock client serving the given snapshot.
    pub fn with_torrents(torrents: Vec<TorrentInfo>) -> Self {
        Self {
            torrents: Arc::new(RwLock::new(torrents)),
            ..Self::default()
        }
    }

    /// Append a torrent to the snapshot.
    pub async fn add_mock_torrent(&self, info: TorrentInfo) {
        self.torrents.write().await.push(info);
    }

    /// Get all recorded remove_torrent calls.
    pub async fn removed_torrents(&self) -> Vec<RecordedRemoval> {
        self.removed.read().await.clone()
    }

    /// Configure the next list_torrents call to fail with the given error.
    pub async fn set_list_error(&self, error: TorrentClientError) {
        *self.list_error.write().await = Some(error);
    }

    /// Make every removal of `hash` fail with the given error.
    pub async fn fail_removal(&self, hash: &str, error: TorrentClientError) {
        self.removal_errors
            .write()
            .await
            .insert(hash.to_string(), error);
    }

    /// Check if a torrent exists.
    pub async fn has_torrent(&self, hash: &str) -> bool {
        self.torrents.read().await.iter().any(|t| t.hash == hash)
    }

    /// Get the number of torrents.
    pub async fn torrent_count(&self) -> usize {
        self.torrents.read().await.len()
    }

    /// Number of times the snapshot was fetched.
    pub async fn list_calls(&self) -> usize {
        *self.list_calls.read().await
    }
}

/// Rebuild an error; `TorrentClientError` is not `Clone`.
fn copy_error(error: &TorrentClientError) -> TorrentClientError {
    match error {
        TorrentClientError::ConnectionFailed(m) => TorrentClientError::ConnectionFailed(m.clone()),
        TorrentClientError::AuthenticationFailed(m) => {
            TorrentClientError::AuthenticationFailed(m.clone())
        }
        TorrentClientError::TorrentNotFound(m) => TorrentClientError::TorrentNotFound(m.clone()),
        TorrentClientError::ApiError(m) => TorrentClientError::ApiError(m.clone()),
        TorrentClientError::Timeout => TorrentClientError::Timeout,
        TorrentClientError::Internal(m) => TorrentClientError::Internal(m.clone()),
    }
}

#[async_trait]
impl TorrentClient for MockTorrentClient {
    fn name(&self) -> &str {
        "mock"
    }

    async fn list_torrents(&self) -> Result<Vec<TorrentInfo>, TorrentClientError> {
        *self.list_calls.write().await += 1;

        if let Some(err) = self.list_error.write().await.take() {
            return Err(err);
        }

        Ok(self.torrents.read().await.clone())
    }

    async fn remove_torrent(
        &self,
        hash: &str,
        delete_files: bool,
    ) -> Result<(), TorrentClientError> {
        self.removed.write().await.push(RecordedRemoval {
            hash: hash.to_string(),
            delete_files,
            timestamp: Utc::now(),
        });

        if let Some(err) = self.removal_errors.read().await.get(hash) {
            return Err(copy_error(err));
        }

        let mut torrents = self.torrents.write().await;
        let before = torrents.len();
        torrents.retain(|t| t.hash != hash);
        if torrents.len() < before {
            Ok(())
        } else {
            Err(TorrentClientError::TorrentNotFound(hash.to_string()))
        }
    }
}
