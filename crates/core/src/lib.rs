pub mod cleanup;
pub mod config;
pub mod metrics;
pub mod testing;
pub mod torrent_client;

pub use cleanup::{
    plan_cleanup, CleanupError, CleanupMode, CleanupPlan, CleanupReport, CleanupRunner, Decision,
    DeleteFailure, PolicyConfig,
};
pub use config::{
    load_config, load_config_from_str, load_dotenv, validate_config, Config, ConfigError, PolicySettings,
    QBittorrentConfig, SanitizedConfig,
};
pub use torrent_client::{QBittorrentClient, TorrentClient, TorrentClientError, TorrentInfo};
