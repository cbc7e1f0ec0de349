//! Decision planning: snapshot in, decisions out. No I/O.

use tracing::debug;

use crate::torrent_client::TorrentInfo;

use super::dedupe::{group_movies, GroupResolution};
use super::modes::{aged_reasons, autobrr_reasons};
use super::policy::PolicyConfig;
use super::types::{CleanupMode, Decision, SkippedGroup};

/// Every decision for one run, computed from an immutable snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanupPlan<'a> {
    pub mode: CleanupMode,
    pub dry_run: bool,
    /// `autobrr`/`aged`: one decision per torrent, in snapshot order.
    /// `dedupe`: delete decisions only, grouped by base name.
    pub decisions: Vec<Decision<'a>>,
    /// Dedupe groups left alone after exclusions.
    pub skipped_groups: Vec<SkippedGroup>,
}

/// One entry of a plan walked in group order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanStep<'p, 'a> {
    Skip(&'p SkippedGroup),
    Decide(&'p Decision<'a>),
}

impl<'a> CleanupPlan<'a> {
    /// Skipped groups and decisions interleaved in the order they were planned.
    pub fn steps(&self) -> Vec<PlanStep<'_, 'a>> {
        let mut steps = Vec::with_capacity(self.decisions.len() + self.skipped_groups.len());
        let mut skipped = self.skipped_groups.iter().peekable();
        for (index, decision) in self.decisions.iter().enumerate() {
            while let Some(group) = skipped.next_if(|g| g.position <= index) {
                steps.push(PlanStep::Skip(group));
            }
            steps.push(PlanStep::Decide(decision));
        }
        steps.extend(skipped.map(PlanStep::Skip));
        steps
    }

    /// Decisions that delete a torrent.
    pub fn deletions(&self) -> impl Iterator<Item = &Decision<'a>> {
        self.decisions.iter().filter(|d| d.should_delete)
    }

    pub fn candidate_count(&self) -> usize {
        self.deletions().count()
    }
}

/// Compute the decisions `mode` reaches over `snapshot`.
pub fn plan_cleanup<'a>(
    mode: CleanupMode,
    snapshot: &'a [TorrentInfo],
    policy: &PolicyConfig,
    now: i64,
    dry_run: bool,
) -> CleanupPlan<'a> {
    let mut plan = CleanupPlan {
        mode,
        dry_run,
        decisions: Vec::new(),
        skipped_groups: Vec::new(),
    };

    match mode {
        CleanupMode::Autobrr => {
            plan.decisions = snapshot
                .iter()
                .map(|t| decide(t, autobrr_reasons(t), dry_run))
                .collect();
        }
        CleanupMode::Aged => {
            plan.decisions = snapshot
                .iter()
                .map(|t| decide(t, aged_reasons(t, policy, now), dry_run))
                .collect();
        }
        CleanupMode::Dedupe => {
            for group in group_movies(snapshot) {
                match group.resolve(policy) {
                    GroupResolution::Resolved { keeper, duplicates } => {
                        debug!(
                            "Group '{}': keeping {} ({} duplicate(s))",
                            group.key,
                            keeper.name,
                            duplicates.len()
                        );
                        plan.decisions.extend(duplicates.into_iter().map(|t| {
                            Decision::delete(
                                t,
                                vec![format!("duplicate of {}", keeper.name)],
                                dry_run,
                            )
                        }));
                    }
                    GroupResolution::Skipped { eligible } => {
                        plan.skipped_groups.push(SkippedGroup {
                            key: group.key,
                            members: group.members.len(),
                            eligible,
                            position: plan.decisions.len(),
                        });
                    }
                }
            }
        }
    }

    plan
}

fn decide(torrent: &TorrentInfo, reasons: Vec<String>, dry_run: bool) -> Decision<'_> {
    if reasons.is_empty() {
        Decision::keep(torrent, dry_run)
    } else {
        Decision::delete(torrent, reasons, dry_run)
    }
}
