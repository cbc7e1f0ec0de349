//! Cleanup runner.
//!
//! Runs in two phases: every decision is planned from one immutable snapshot,
//! then deletions are applied one at a time in snapshot order. All policy
//! logic lives in the planner; the runner only fetches, reports and applies.

use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info, warn};

use crate::metrics;
use crate::torrent_client::{TorrentClient, TorrentInfo};

use super::plan::{plan_cleanup, PlanStep};
use super::policy::{PolicyConfig, SECS_PER_DAY};
use super::types::{CleanupError, CleanupMode, CleanupReport, Decision, DeleteFailure};

/// Applies one mode's decisions through a torrent client.
pub struct CleanupRunner {
    client: Arc<dyn TorrentClient>,
    policy: PolicyConfig,
    mode: CleanupMode,
    dry_run: bool,
}

impl CleanupRunner {
    pub fn new(client: Arc<dyn TorrentClient>, policy: PolicyConfig, mode: CleanupMode) -> Self {
        Self {
            client,
            policy,
            mode,
            dry_run: false,
        }
    }

    /// Report decisions without deleting anything.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub async fn run(&self) -> Result<CleanupReport, CleanupError> {
        self.run_at(Utc::now().timestamp()).await
    }

    /// Run against the current snapshot, taking `now` as the current time.
    pub async fn run_at(&self, now: i64) -> Result<CleanupReport, CleanupError> {
        let snapshot = self.client.list_torrents().await.map_err(|e| {
            error!("Failed to list torrents from {}: {}", self.client.name(), e);
            CleanupError::from(e)
        })?;

        info!("Total torrents found: {}", snapshot.len());
        info!(
            "Running in mode: {}{}",
            self.mode,
            if self.dry_run { " (DRY RUN)" } else { "" }
        );

        let plan = plan_cleanup(self.mode, &snapshot, &self.policy, now, self.dry_run);

        let mut report = CleanupReport::new(self.mode, self.dry_run);
        report.evaluated = snapshot.len();
        report.candidates = plan.candidate_count();
        metrics::TORRENTS_EVALUATED
            .with_label_values(&[self.mode.as_str()])
            .inc_by(snapshot.len() as u64);

        for step in plan.steps() {
            let decision = match step {
                PlanStep::Skip(group) => {
                    info!(
                        "Skipping group '{}': {} of {} member(s) eligible after exclusions",
                        group.key, group.eligible, group.members
                    );
                    continue;
                }
                PlanStep::Decide(decision) => decision,
            };

            if self.mode.traces_each_torrent() {
                trace_torrent(decision.torrent, now);
            }

            if decision.should_delete {
                self.apply(decision, &mut report).await;
            } else {
                info!("Keeping torrent: {}", decision.torrent.name);
            }
        }

        metrics::LAST_RUN_TIMESTAMP.set(Utc::now().timestamp());
        info!("{}", report.summary());

        Ok(report)
    }

    async fn apply(&self, decision: &Decision<'_>, report: &mut CleanupReport) {
        let torrent = decision.torrent;
        let reason = decision.reason();

        if self.dry_run {
            info!(
                "(DRY RUN) Would delete {}: {} (Reason: {})",
                self.noun(),
                torrent.name,
                reason
            );
            self.count_deletion("dry_run");
            return;
        }

        info!("Removing {}: {} (Reason: {})", self.noun(), torrent.name, reason);

        match self.client.remove_torrent(&torrent.hash, true).await {
            Ok(()) => {
                report.deleted += 1;
                self.count_deletion("deleted");
            }
            Err(e) => {
                warn!("Failed to delete {} ({}): {}", torrent.name, torrent.hash, e);
                report.failures.push(DeleteFailure {
                    hash: torrent.hash.clone(),
                    name: torrent.name.clone(),
                    error: e.to_string(),
                });
                self.count_deletion("failed");
            }
        }
    }

    fn noun(&self) -> &'static str {
        match self.mode {
            CleanupMode::Dedupe => "duplicate",
            _ => "torrent",
        }
    }

    fn count_deletion(&self, result: &str) {
        metrics::DELETIONS
            .with_label_values(&[self.mode.as_str(), result])
            .inc();
    }
}

/// Per-torrent trace for the `autobrr` and `aged` modes.
fn trace_torrent(torrent: &TorrentInfo, now: i64) {
    info!(
        tags = ?torrent.tags,
        category = %torrent.category.to_lowercase(),
        state = %torrent.state,
        size_gb = %format!("{:.2}", torrent.size_gb()),
        age_days = torrent.age_secs(now) / SECS_PER_DAY,
        "Checking: {}",
        torrent.name
    );
}
