//! Retention policies and the runner that applies them.
//!
//! - `policy`: predicates over a torrent and the run's [`PolicyConfig`]
//! - `modes`: the per-torrent `autobrr` and `aged` rules
//! - `dedupe`: duplicate movie grouping and keeper selection
//! - `plan`: turns a snapshot into decisions (pure)
//! - `runner`: fetches the snapshot and applies the plan

mod dedupe;
mod modes;
mod plan;
mod policy;
mod runner;
mod types;

pub use dedupe::{group_movies, grouping_key, DuplicateGroup, GroupResolution, MOVIES_CATEGORY};
pub use modes::{aged_reasons, autobrr_reasons, AUTOBRR_CATEGORY};
pub use plan::{plan_cleanup, CleanupPlan, PlanStep};
pub use policy::{is_stalled, PolicyConfig, BYTES_PER_GB, SECS_PER_DAY};
pub use runner::CleanupRunner;
pub use types::*;
