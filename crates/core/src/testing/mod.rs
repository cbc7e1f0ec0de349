//! Testing utilities and a mock torrent client.
//!
//! # Example
//!
//! ```rust,ignore
//! use qbit_cleanup_core::testing::{fixtures, MockTorrentClient};
//!
//! let client = MockTorrentClient::with_torrents(vec![
//!     fixtures::movie("a", "Foo (2020)", 3),
//!     fixtures::movie("b", "Foo (2021)", 7),
//! ]);
//! ```

mod mock_torrent_client;

pub use mock_torrent_client::{MockTorrentClient, RecordedRemoval};

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::cleanup::{BYTES_PER_GB, MOVIES_CATEGORY};
    use crate::torrent_client::TorrentInfo;

    /// Create a seeding torrent with no category, no tags, zero size, added
    /// at the epoch.
    pub fn torrent(hash: &str, name: &str) -> TorrentInfo {
        TorrentInfo::new(hash, name).with_state("uploading")
    }

    /// Create a movies-category torrent of `size_gb` GiB.
    pub fn movie(hash: &str, name: &str, size_gb: u64) -> TorrentInfo {
        torrent(hash, name)
            .with_category(MOVIES_CATEGORY)
            .with_size(size_gb * BYTES_PER_GB)
    }
}
