mod args;
mod logging;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info, warn};

use qbit_cleanup_core::{
    load_config, load_dotenv, metrics, validate_config, CleanupRunner, PolicyConfig, QBittorrentClient,
    SanitizedConfig, TorrentClient,
};

use args::Cli;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let dotenv = load_dotenv();
    let cli = Cli::parse();

    if let Err(e) = logging::init(&cli.log_file()) {
        eprintln!("Fatal error: {:#}", e);
        std::process::exit(1);
    }

    match dotenv {
        Ok(Some(path)) => info!("Loaded environment from {:?}", path),
        Ok(None) => {}
        Err(e) => warn!("Ignoring .env file: {}", e),
    }

    if let Err(e) = run(cli).await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mode = cli.cleanup_mode();

    // Load configuration
    let config = load_config(cli.config.as_deref()).context("Failed to load configuration")?;
    validate_config(&config).context("Configuration validation failed")?;

    let sanitized = SanitizedConfig::from(&config);
    info!(
        "Configuration loaded: {}",
        serde_json::to_string(&sanitized).unwrap_or_default()
    );

    let policy = PolicyConfig::new(&config.policy);

    info!("Connecting to qBittorrent at {}", config.qbittorrent.base_url());
    let client: Arc<dyn TorrentClient> = Arc::new(
        QBittorrentClient::new(config.qbittorrent.clone())
            .context("Failed to create qBittorrent client")?,
    );

    let report = CleanupRunner::new(client, policy, mode)
        .with_dry_run(cli.dry_run)
        .run()
        .await
        .with_context(|| format!("Cleanup run ({}) failed", mode))?;

    if !report.failures.is_empty() {
        warn!(
            "{} of {} deletion(s) failed",
            report.failures.len(),
            report.candidates
        );
    }

    if let Some(path) = &cli.metrics_file {
        metrics::write_textfile(path)
            .with_context(|| format!("Failed to write metrics to {:?}", path))?;
        info!("Metrics written to {:?}", path);
    }

    Ok(())
}
