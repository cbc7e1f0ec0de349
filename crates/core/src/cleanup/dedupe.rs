//! Duplicate movie release grouping.
//!
//! Movies are grouped by base name (the title before the first `" ("`, which
//! conventionally precedes the release year). Within each group, protected
//! members are dropped, the largest remaining release is kept and the rest are
//! duplicates.

use std::collections::HashMap;

use crate::torrent_client::TorrentInfo;

use super::policy::PolicyConfig;

/// Only torrents in this category are ever grouped.
pub const MOVIES_CATEGORY: &str = "movies";

/// Separator between a release title and its year/quality suffix.
const BASE_NAME_SEPARATOR: &str = " (";

/// Grouping key for a release name.
///
/// `"Some.Movie (2020) 1080p"` becomes `"some.movie"`; a name without the
/// separator keys on the whole trimmed, lowercased name.
pub fn grouping_key(name: &str) -> String {
    let base = match name.find(BASE_NAME_SEPARATOR) {
        Some(idx) => &name[..idx],
        None => name,
    };
    base.trim().to_lowercase()
}

/// Releases sharing a grouping key, in snapshot order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateGroup<'a> {
    pub key: String,
    pub members: Vec<&'a TorrentInfo>,
}

/// What to do with one duplicate group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupResolution<'a> {
    /// `keeper` stays; every entry of `duplicates` should go.
    Resolved {
        keeper: &'a TorrentInfo,
        duplicates: Vec<&'a TorrentInfo>,
    },
    /// Fewer than two members survived the exclusion filter.
    Skipped { eligible: usize },
}

impl<'a> DuplicateGroup<'a> {
    /// Filter out protected members and pick the keeper.
    pub fn resolve(&self, policy: &PolicyConfig) -> GroupResolution<'a> {
        let eligible: Vec<&'a TorrentInfo> = self
            .members
            .iter()
            .copied()
            .filter(|t| !is_protected(policy, t))
            .collect();

        if eligible.len() <= 1 {
            return GroupResolution::Skipped {
                eligible: eligible.len(),
            };
        }

        let Some(keeper) = largest_first(&eligible) else {
            return GroupResolution::Skipped { eligible: 0 };
        };

        let duplicates = eligible
            .into_iter()
            .filter(|t| t.hash != keeper.hash)
            .collect();

        GroupResolution::Resolved { keeper, duplicates }
    }
}

/// Group `movies` torrents by base name.
///
/// Groups come back in order of their first member's appearance in the
/// snapshot. Singletons are discarded.
pub fn group_movies(snapshot: &[TorrentInfo]) -> Vec<DuplicateGroup<'_>> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<DuplicateGroup<'_>> = Vec::new();

    for torrent in snapshot
        .iter()
        .filter(|t| t.category.eq_ignore_ascii_case(MOVIES_CATEGORY))
    {
        let key = grouping_key(&torrent.name);
        match index.get(&key) {
            Some(&idx) => groups[idx].members.push(torrent),
            None => {
                index.insert(key.clone(), groups.len());
                groups.push(DuplicateGroup {
                    key,
                    members: vec![torrent],
                });
            }
        }
    }

    groups.retain(|group| group.members.len() > 1);
    groups
}

/// Cross-seeds, excluded tags and excluded names never take part in dedupe.
fn is_protected(policy: &PolicyConfig, torrent: &TorrentInfo) -> bool {
    policy.has_cross_seed_tag(torrent)
        || policy.has_excluded_tag(torrent)
        || policy.name_excluded(torrent)
}

/// Largest member by size; ties go to the earliest member.
///
/// `Iterator::max_by_key` returns the last maximum, hence the fold.
fn largest_first<'a>(members: &[&'a TorrentInfo]) -> Option<&'a TorrentInfo> {
    members.iter().copied().fold(None, |best, torrent| match best {
        Some(current) if current.size_bytes >= torrent.size_bytes => Some(current),
        _ => Some(torrent),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cleanup::policy::BYTES_PER_GB;
    use crate::testing::fixtures;

    fn names<'a>(torrents: &[&'a TorrentInfo]) -> Vec<&'a str> {
        torrents.iter().map(|t| t.name.as_str()).collect()
    }

    #[test]
    fn test_grouping_key_strips_year_suffix() {
        assert_eq!(grouping_key("Some.Movie (2020) 1080p"), "some.movie");
        assert_eq!(grouping_key("Foo (2021) Extended"), "foo");
    }

    #[test]
    fn test_grouping_key_without_separator() {
        assert_eq!(grouping_key("  Some.Movie.2020.1080p  "), "some.movie.2020.1080p");
        assert_eq!(grouping_key("Movie(2020)"), "movie(2020)");
    }

    #[test]
    fn test_grouping_key_splits_at_first_separator() {
        assert_eq!(grouping_key("Title (Director's Cut) (1999)"), "title");
    }

    #[test]
    fn test_group_movies_only_considers_movies_category() {
        let snapshot = vec![
            fixtures::movie("a", "Foo (2020)", 1),
            fixtures::torrent("b", "Foo (2021)").with_category("tv"),
            fixtures::movie("c", "Bar (2020)", 1),
        ];
        assert!(group_movies(&snapshot).is_empty());
    }

    #[test]
    fn test_group_movies_category_case_insensitive() {
        let snapshot = vec![
            fixtures::movie("a", "Foo (2020)", 1).with_category("Movies"),
            fixtures::movie("b", "foo (2021)", 1).with_category("MOVIES"),
        ];
        let groups = group_movies(&snapshot);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].key, "foo");
        assert_eq!(groups[0].members.len(), 2);
    }

    #[test]
    fn test_group_movies_preserves_first_appearance_order() {
        let snapshot = vec![
            fixtures::movie("a", "Beta (2020)", 1),
            fixtures::movie("b", "Alpha (2020)", 1),
            fixtures::movie("c", "Beta (2021)", 1),
            fixtures::movie("d", "Alpha (2021)", 1),
        ];
        let keys: Vec<String> = group_movies(&snapshot).into_iter().map(|g| g.key).collect();
        assert_eq!(keys, vec!["beta", "alpha"]);
    }

    #[test]
    fn test_resolve_keeps_largest() {
        let snapshot = vec![
            fixtures::movie("a", "Foo (2020)", 3),
            fixtures::movie("b", "Foo (2021)", 7),
            fixtures::movie("c", "Foo (2021) Extended", 1),
        ];
        let groups = group_movies(&snapshot);
        assert_eq!(groups.len(), 1);

        match groups[0].resolve(&PolicyConfig::default()) {
            GroupResolution::Resolved { keeper, duplicates } => {
                assert_eq!(keeper.name, "Foo (2021)");
                assert_eq!(names(&duplicates), vec!["Foo (2020)", "Foo (2021) Extended"]);
            }
            other => panic!("Expected Resolved, got {:?}", other),
        }
    }

    #[test]
    fn test_resolve_size_tie_keeps_first() {
        let snapshot = vec![
            fixtures::movie("a", "Film (2019)", 2),
            fixtures::movie("b", "Film (2020)", 5),
            fixtures::movie("c", "Film (2021)", 5),
        ];
        let groups = group_movies(&snapshot);

        match groups[0].resolve(&PolicyConfig::default()) {
            GroupResolution::Resolved { keeper, duplicates } => {
                assert_eq!(keeper.hash, "b");
                assert_eq!(names(&duplicates), vec!["Film (2019)", "Film (2021)"]);
            }
            other => panic!("Expected Resolved, got {:?}", other),
        }
    }

    #[test]
    fn test_resolve_drops_protected_members() {
        let snapshot = vec![
            fixtures::movie("a", "Foo (2020)", 9).with_tags("cross-seed"),
            fixtures::movie("b", "Foo (2021)", 4),
            fixtures::movie("c", "Foo (2022)", 2),
            fixtures::movie("d", "Foo (2023)", 1).with_tags("tv"),
        ];
        let groups = group_movies(&snapshot);

        match groups[0].resolve(&PolicyConfig::default()) {
            GroupResolution::Resolved { keeper, duplicates } => {
                assert_eq!(keeper.hash, "b");
                assert_eq!(duplicates.len(), 1);
                assert_eq!(duplicates[0].hash, "c");
            }
            other => panic!("Expected Resolved, got {:?}", other),
        }
    }

    #[test]
    fn test_resolve_skips_group_shrunk_by_exclusions() {
        let snapshot = vec![
            fixtures::movie("a", "Foo (2020)", 9).with_tags("cross-seed"),
            fixtures::movie("b", "Foo (2021) ebook edition", 4),
            fixtures::movie("c", "Foo (2022)", 2),
        ];
        let groups = group_movies(&snapshot);
        assert_eq!(groups.len(), 1);
        assert_eq!(
            groups[0].resolve(&PolicyConfig::default()),
            GroupResolution::Skipped { eligible: 1 }
        );
    }

    #[test]
    fn test_largest_first_empty() {
        assert!(largest_first(&[]).is_none());
    }

    #[test]
    fn test_movie_fixture_size() {
        let movie = fixtures::movie("a", "Foo (2020)", 2);
        assert_eq!(movie.size_bytes, 2 * BYTES_PER_GB);
    }
}
