//! Logging setup: console plus a per-mode log file.

use std::fs::{self, File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing::Subscriber;
use tracing_subscriber::{
    layer::SubscriberExt, registry::LookupSpan, util::SubscriberInitExt, Layer,
};

/// Install the global subscriber.
///
/// `RUST_LOG` overrides the default `info` filter. The file layer has ANSI
/// colors disabled and appends across runs.
pub fn init(log_file: &Path) -> Result<()> {
    if let Some(dir) = log_file.parent() {
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory {:?}", dir))?;
        }
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .with_context(|| format!("Failed to open log file {:?}", log_file))?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,reqwest=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(file_layer(file))
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(())
}

/// Plain-text layer for the log file.
fn file_layer<S>(file: File) -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
}
