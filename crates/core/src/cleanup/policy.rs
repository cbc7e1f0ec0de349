//! Predicate library over a torrent and the run's policy.

use std::collections::BTreeSet;

use crate::config::PolicySettings;
use crate::torrent_client::TorrentInfo;

/// Seconds in a day.
pub const SECS_PER_DAY: i64 = 86_400;

/// Bytes in a GiB.
pub const BYTES_PER_GB: u64 = 1024 * 1024 * 1024;

/// State prefix reported by qBittorrent for torrents with no active peers.
const STALLED_PREFIX: &str = "stalled";

/// Immutable policy inputs for one run.
///
/// Tag and name lists are normalized (trimmed, lowercased) once at
/// construction so the predicates can compare directly against a
/// [`TorrentInfo`]'s already-normalized tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyConfig {
    excluded_tags: BTreeSet<String>,
    name_exclusions: Vec<String>,
    cross_seed_tag: String,
    age_threshold_days: u64,
    size_threshold_gb: u64,
}

impl PolicyConfig {
    pub fn new(settings: &PolicySettings) -> Self {
        Self {
            excluded_tags: settings
                .excluded_tags
                .iter()
                .map(|t| t.trim().to_lowercase())
                .filter(|t| !t.is_empty())
                .collect(),
            name_exclusions: settings
                .name_exclusions
                .iter()
                .map(|n| n.trim().to_lowercase())
                .filter(|n| !n.is_empty())
                .collect(),
            cross_seed_tag: settings.cross_seed_tag.trim().to_lowercase(),
            age_threshold_days: settings.age_threshold_days,
            size_threshold_gb: settings.size_threshold_gb,
        }
    }

    pub fn age_threshold_days(&self) -> u64 {
        self.age_threshold_days
    }

    pub fn size_threshold_gb(&self) -> u64 {
        self.size_threshold_gb
    }

    pub fn age_threshold_secs(&self) -> i64 {
        (self.age_threshold_days as i64).saturating_mul(SECS_PER_DAY)
    }

    pub fn size_threshold_bytes(&self) -> u64 {
        self.size_threshold_gb.saturating_mul(BYTES_PER_GB)
    }

    pub fn cross_seed_tag(&self) -> &str {
        &self.cross_seed_tag
    }

    /// Any of the torrent's tags is in the excluded set.
    pub fn has_excluded_tag(&self, torrent: &TorrentInfo) -> bool {
        torrent
            .tags
            .iter()
            .any(|tag| self.excluded_tags.contains(tag))
    }

    /// Any name exclusion occurs in the torrent name, ignoring case.
    pub fn name_excluded(&self, torrent: &TorrentInfo) -> bool {
        let name = torrent.name.to_lowercase();
        self.name_exclusions
            .iter()
            .any(|pattern| name.contains(pattern.as_str()))
    }

    /// At least the age threshold has elapsed since the torrent was added.
    pub fn is_aged(&self, torrent: &TorrentInfo, now: i64) -> bool {
        torrent.age_secs(now) >= self.age_threshold_secs()
    }

    /// Size is at or below the size threshold.
    pub fn is_small(&self, torrent: &TorrentInfo) -> bool {
        torrent.size_bytes <= self.size_threshold_bytes()
    }

    pub fn has_cross_seed_tag(&self, torrent: &TorrentInfo) -> bool {
        torrent.tags.contains(&self.cross_seed_tag)
    }
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self::new(&PolicySettings::default())
    }
}

impl From<&PolicySettings> for PolicyConfig {
    fn from(settings: &PolicySettings) -> Self {
        Self::new(settings)
    }
}

/// The client reports a stalled state (`stalledDL`, `stalledUP`).
///
/// Case-sensitive: qBittorrent states are camelCase with a lowercase prefix.
pub fn is_stalled(torrent: &TorrentInfo) -> bool {
    torrent.state.starts_with(STALLED_PREFIX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;

    const NOW: i64 = 1_700_000_000;

    #[test]
    fn test_has_excluded_tag() {
        let policy = PolicyConfig::default();

        let tagged = fixtures::torrent("a", "Show").with_tags("TV, misc");
        assert!(policy.has_excluded_tag(&tagged));

        let untagged = fixtures::torrent("b", "Show");
        assert!(!policy.has_excluded_tag(&untagged));

        let other = fixtures::torrent("c", "Show").with_tags("music");
        assert!(!policy.has_excluded_tag(&other));
    }

    #[test]
    fn test_excluded_tags_are_normalized() {
        let policy = PolicyConfig::new(&PolicySettings {
            excluded_tags: vec![" Keep ".to_string()],
            ..Default::default()
        });
        let torrent = fixtures::torrent("a", "X").with_tags("keep");
        assert!(policy.has_excluded_tag(&torrent));
    }

    #[test]
    fn test_name_excluded_is_case_insensitive() {
        let policy = PolicyConfig::default();
        assert!(policy.name_excluded(&fixtures::torrent("a", "Great.EBOOK.Collection")));
        assert!(policy.name_excluded(&fixtures::torrent("b", "Game [NSW]")));
        assert!(!policy.name_excluded(&fixtures::torrent("c", "Some.Movie (2020)")));
    }

    #[test]
    fn test_is_stalled_prefix() {
        assert!(is_stalled(&fixtures::torrent("a", "X").with_state("stalledDL")));
        assert!(is_stalled(&fixtures::torrent("b", "X").with_state("stalledUP")));
        assert!(!is_stalled(&fixtures::torrent("c", "X").with_state("uploading")));
        assert!(!is_stalled(&fixtures::torrent("d", "X").with_state("StalledDL")));
    }

    #[test]
    fn test_is_aged_boundary() {
        let policy = PolicyConfig::default();
        let threshold = policy.age_threshold_secs();

        let exactly = fixtures::torrent("a", "X").with_added_on(NOW - threshold);
        assert!(policy.is_aged(&exactly, NOW));

        let younger = fixtures::torrent("b", "X").with_added_on(NOW - threshold + 1);
        assert!(!policy.is_aged(&younger, NOW));
    }

    #[test]
    fn test_is_aged_monotonic_in_now() {
        let policy = PolicyConfig::default();
        let torrent = fixtures::torrent("a", "X").with_added_on(NOW);

        let mut was_aged = false;
        for day in 0..40 {
            let aged = policy.is_aged(&torrent, NOW + day * SECS_PER_DAY);
            assert!(!was_aged || aged, "is_aged flipped back at day {}", day);
            was_aged = aged;
        }
        assert!(was_aged);
    }

    #[test]
    fn test_is_small_inclusive() {
        let policy = PolicyConfig::default();
        let limit = policy.size_threshold_bytes();

        assert!(policy.is_small(&fixtures::torrent("a", "X").with_size(limit)));
        assert!(policy.is_small(&fixtures::torrent("b", "X").with_size(limit - 1)));
        assert!(!policy.is_small(&fixtures::torrent("c", "X").with_size(limit + 1)));
    }

    #[test]
    fn test_has_cross_seed_tag() {
        let policy = PolicyConfig::default();
        assert!(policy.has_cross_seed_tag(&fixtures::torrent("a", "X").with_tags("Cross-Seed")));
        assert!(!policy.has_cross_seed_tag(&fixtures::torrent("b", "X").with_tags("crossseed")));
    }

    #[test]
    fn test_thresholds_from_settings() {
        let policy = PolicyConfig::new(&PolicySettings {
            age_threshold_days: 2,
            size_threshold_gb: 3,
            ..Default::default()
        });
        assert_eq!(policy.age_threshold_secs(), 2 * SECS_PER_DAY);
        assert_eq!(policy.size_threshold_bytes(), 3 * BYTES_PER_GB);
    }
}
