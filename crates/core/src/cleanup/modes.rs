//! Per-torrent rules for the `autobrr` and `aged` modes.

use crate::torrent_client::TorrentInfo;

use super::policy::{is_stalled, PolicyConfig};

/// Category used by the autobrr ingestion pipeline.
pub const AUTOBRR_CATEGORY: &str = "autobrr";

/// Reasons to delete under `autobrr`: stalled and in the autobrr category.
///
/// Age, size, tags and name exclusions play no part here.
pub fn autobrr_reasons(torrent: &TorrentInfo) -> Vec<String> {
    let mut reasons = Vec::new();
    if is_stalled(torrent) && torrent.category.eq_ignore_ascii_case(AUTOBRR_CATEGORY) {
        reasons.push(format!("stalled & category '{}'", AUTOBRR_CATEGORY));
    }
    reasons
}

/// Reasons to delete under `aged`: old and small, with no protecting tag or name.
pub fn aged_reasons(torrent: &TorrentInfo, policy: &PolicyConfig, now: i64) -> Vec<String> {
    let mut reasons = Vec::new();
    if policy.is_aged(torrent, now)
        && policy.is_small(torrent)
        && !policy.has_excluded_tag(torrent)
        && !policy.name_excluded(torrent)
    {
        reasons.push(format!(
            "> {} days old & <= {}GB (no excluded tags)",
            policy.age_threshold_days(),
            policy.size_threshold_gb()
        ));
    }
    reasons
}
