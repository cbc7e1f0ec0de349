//! Prometheus metrics for cleanup runs.
//!
//! The binary runs once and exits, so metrics are exported as a textfile
//! (for the node-exporter textfile collector) rather than scraped.

use std::fs;
use std::io;
use std::path::Path;

use once_cell::sync::Lazy;
use prometheus::{Encoder, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};

/// Registry holding every cleanup metric.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

/// Torrents evaluated, by mode.
pub static TORRENTS_EVALUATED: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "qbit_cleanup_torrents_evaluated_total",
            "Total torrents evaluated by a cleanup policy",
        ),
        &["mode"],
    )
    .unwrap()
});

/// Deletion outcomes, by mode and result.
pub static DELETIONS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "qbit_cleanup_deletions_total",
            "Torrents selected for deletion",
        ),
        &["mode", "result"], // "deleted", "dry_run", "failed"
    )
    .unwrap()
});

/// Completion time of the last run.
pub static LAST_RUN_TIMESTAMP: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "qbit_cleanup_last_run_timestamp_seconds",
        "Unix time at which the last cleanup run finished",
    )
    .unwrap()
});

fn register_metrics(registry: &Registry) {
    registry
        .register(Box::new(TORRENTS_EVALUATED.clone()))
        .unwrap();
    registry.register(Box::new(DELETIONS.clone())).unwrap();
    registry
        .register(Box::new(LAST_RUN_TIMESTAMP.clone()))
        .unwrap();
}

/// Render every metric in the Prometheus text exposition format.
pub fn gather_text() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if encoder.encode(&metric_families, &mut buffer).is_err() {
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}

/// Write the metrics textfile.
///
/// Written to a sibling temp file and renamed so a collector never reads a
/// partial file.
pub fn write_textfile(path: &Path) -> io::Result<()> {
    let tmp = path.with_extension("prom.tmp");
    fs::write(&tmp, gather_text())?;
    fs::rename(&tmp, path)
}
