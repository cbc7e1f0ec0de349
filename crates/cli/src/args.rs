//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use qbit_cleanup_core::CleanupMode;

#[derive(Debug, Parser)]
#[command(
    name = "qbit-cleanup",
    version,
    about = "Remove stale, aged or duplicate torrents from qBittorrent"
)]
pub struct Cli {
    /// Retention policy to apply
    #[arg(long, value_enum)]
    pub mode: ModeArg,

    /// Preview deletions only
    #[arg(long)]
    pub dry_run: bool,

    /// Config file (defaults to qbit-cleanup.toml when present)
    #[arg(long, env = "QBIT_CLEANUP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory for the cleanup-<mode>.log file
    #[arg(long, default_value = ".")]
    pub log_dir: PathBuf,

    /// Write Prometheus metrics to this file after the run
    #[arg(long)]
    pub metrics_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Stalled torrents in the autobrr category (every few minutes)
    Autobrr,
    /// Old, small, unprotected torrents (daily)
    Aged,
    /// Duplicate movie releases
    Dedupe,
}

impl From<ModeArg> for CleanupMode {
    fn from(value: ModeArg) -> Self {
        match value {
            ModeArg::Autobrr => CleanupMode::Autobrr,
            ModeArg::Aged => CleanupMode::Aged,
            ModeArg::Dedupe => CleanupMode::Dedupe,
        }
    }
}

impl Cli {
    pub fn cleanup_mode(&self) -> CleanupMode {
        self.mode.into()
    }

    /// Log file path for this run's mode.
    pub fn log_file(&self) -> PathBuf {
        self.log_dir
            .join(format!("cleanup-{}.log", self.cleanup_mode().as_str()))
    }
}
