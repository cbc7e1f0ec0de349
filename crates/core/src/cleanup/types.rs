//! Types shared by the cleanup planner and runner.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::torrent_client::{TorrentClientError, TorrentInfo};

/// Retention policy selected for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CleanupMode {
    /// Stalled downloads in the `autobrr` category.
    Autobrr,
    /// Old, small torrents not protected by tag or name.
    Aged,
    /// Duplicate movie releases; the largest copy is kept.
    Dedupe,
}

impl CleanupMode {
    /// Returns the string representation used in logs and metric labels.
    pub fn as_str(&self) -> &'static str {
        match self {
            CleanupMode::Autobrr => "autobrr",
            CleanupMode::Aged => "aged",
            CleanupMode::Dedupe => "dedupe",
        }
    }

    /// Whether the run logs a trace line block for every torrent.
    pub fn traces_each_torrent(&self) -> bool {
        !matches!(self, CleanupMode::Dedupe)
    }
}

impl fmt::Display for CleanupMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Verdict for one torrent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision<'a> {
    pub torrent: &'a TorrentInfo,
    pub should_delete: bool,
    /// Why the torrent is deleted. Empty for keep decisions.
    pub reasons: Vec<String>,
    /// Inherited from the run; a dry-run decision is reported, never applied.
    pub dry_run: bool,
}

impl<'a> Decision<'a> {
    pub fn keep(torrent: &'a TorrentInfo, dry_run: bool) -> Self {
        Self {
            torrent,
            should_delete: false,
            reasons: Vec::new(),
            dry_run,
        }
    }

    pub fn delete(torrent: &'a TorrentInfo, reasons: Vec<String>, dry_run: bool) -> Self {
        Self {
            torrent,
            should_delete: true,
            reasons,
            dry_run,
        }
    }

    /// Reasons joined for display.
    pub fn reason(&self) -> String {
        self.reasons.join(" and ")
    }
}

/// A duplicate group left untouched because exclusions left at most one member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedGroup {
    pub key: String,
    pub members: usize,
    pub eligible: usize,
    /// Index into the plan's decisions at which the group was reached.
    pub position: usize,
}

/// A deletion the client rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeleteFailure {
    pub hash: String,
    pub name: String,
    pub error: String,
}

/// Outcome of one cleanup run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CleanupReport {
    pub mode: CleanupMode,
    pub dry_run: bool,
    /// Torrents in the snapshot.
    pub evaluated: usize,
    /// Torrents a policy marked for deletion.
    pub candidates: usize,
    /// Torrents actually removed.
    pub deleted: usize,
    pub failures: Vec<DeleteFailure>,
}

impl CleanupReport {
    pub fn new(mode: CleanupMode, dry_run: bool) -> Self {
        Self {
            mode,
            dry_run,
            evaluated: 0,
            candidates: 0,
            deleted: 0,
            failures: Vec::new(),
        }
    }

    /// One-line summary for the end of a run.
    pub fn summary(&self) -> String {
        let noun = match self.mode {
            CleanupMode::Dedupe => "duplicate movie torrent",
            _ => "torrent",
        };

        if self.dry_run {
            return format!(
                "Dry run complete. Would remove {} {}{}.",
                self.candidates,
                noun,
                plural(self.candidates)
            );
        }

        if self.candidates == 0 {
            return "No matching torrents to delete. Cleanup complete.".to_string();
        }

        let mut summary = format!("Removed {} {}{}.", self.deleted, noun, plural(self.deleted));
        if !self.failures.is_empty() {
            summary.push_str(&format!(" {} deletion(s) failed.", self.failures.len()));
        }
        summary
    }
}

fn plural(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

/// Errors that abort a cleanup run.
#[derive(Debug, Error)]
pub enum CleanupError {
    #[error("Authentication with torrent client failed: {0}")]
    Auth(String),

    #[error("Could not reach torrent client: {0}")]
    Connection(String),

    #[error("Failed to fetch torrent snapshot: {0}")]
    Snapshot(String),
}

impl From<TorrentClientError> for CleanupError {
    fn from(err: TorrentClientError) -> Self {
        match err {
            TorrentClientError::AuthenticationFailed(msg) => CleanupError::Auth(msg),
            TorrentClientError::ConnectionFailed(msg) => CleanupError::Connection(msg),
            TorrentClientError::Timeout => CleanupError::Connection("request timed out".to_string()),
            other => CleanupError::Snapshot(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cleanup_mode_as_str() {
        assert_eq!(CleanupMode::Autobrr.as_str(), "autobrr");
        assert_eq!(CleanupMode::Aged.as_str(), "aged");
        assert_eq!(CleanupMode::Dedupe.as_str(), "dedupe");
        assert_eq!(CleanupMode::Dedupe.to_string(), "dedupe");
    }

    #[test]
    fn test_cleanup_mode_serialization() {
        assert_eq!(
            serde_json::to_string(&CleanupMode::Autobrr).unwrap(),
            "\"autobrr\""
        );
        let parsed: CleanupMode = serde_json::from_str("\"dedupe\"").unwrap();
        assert_eq!(parsed, CleanupMode::Dedupe);
    }

    #[test]
    fn test_decision_reason_joins_with_and() {
        let torrent = TorrentInfo::new("a", "X");
        let decision = Decision::delete(
            &torrent,
            vec!["first".to_string(), "second".to_string()],
            false,
        );
        assert_eq!(decision.reason(), "first and second");
        assert!(Decision::keep(&torrent, true).reason().is_empty());
    }

    #[test]
    fn test_summary_nothing_to_delete() {
        let report = CleanupReport::new(CleanupMode::Aged, false);
        assert_eq!(
            report.summary(),
            "No matching torrents to delete. Cleanup complete."
        );
    }

    #[test]
    fn test_summary_dedupe_counts() {
        let mut report = CleanupReport::new(CleanupMode::Dedupe, false);
        report.candidates = 2;
        report.deleted = 2;
        assert_eq!(report.summary(), "Removed 2 duplicate movie torrents.");

        report.candidates = 1;
        report.deleted = 1;
        assert_eq!(report.summary(), "Removed 1 duplicate movie torrent.");
    }

    #[test]
    fn test_summary_dry_run() {
        let mut report = CleanupReport::new(CleanupMode::Autobrr, true);
        report.candidates = 3;
        assert_eq!(report.summary(), "Dry run complete. Would remove 3 torrents.");
    }

    #[test]
    fn test_summary_mentions_failures() {
        let mut report = CleanupReport::new(CleanupMode::Aged, false);
        report.candidates = 2;
        report.deleted = 1;
        report.failures.push(DeleteFailure {
            hash: "b".to_string(),
            name: "B".to_string(),
            error: "API error: HTTP 500".to_string(),
        });
        assert_eq!(report.summary(), "Removed 1 torrent. 1 deletion(s) failed.");
    }

    #[test]
    fn test_cleanup_error_from_client_error() {
        assert!(matches!(
            CleanupError::from(TorrentClientError::AuthenticationFailed("bad".into())),
            CleanupError::Auth(_)
        ));
        assert!(matches!(
            CleanupError::from(TorrentClientError::ConnectionFailed("refused".into())),
            CleanupError::Connection(_)
        ));
        assert!(matches!(
            CleanupError::from(TorrentClientError::Timeout),
            CleanupError::Connection(_)
        ));
        assert!(matches!(
            CleanupError::from(TorrentClientError::ApiError("HTTP 500".into())),
            CleanupError::Snapshot(_)
        ));
    }
}
