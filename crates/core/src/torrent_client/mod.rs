//! Torrent client abstraction.
//!
//! The cleanup engine only needs two operations from a client: a snapshot of
//! every torrent and a delete-by-hash effect. `TorrentClient` captures those,
//! and `QBittorrentClient` implements them against the qBittorrent Web API.

mod qbittorrent;
mod types;

pub use qbittorrent::QBittorrentClient;
pub use types::*;
