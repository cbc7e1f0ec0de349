use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::path::{Path, PathBuf};

use super::{types::Config, ConfigError};

/// Config file looked up when no path is given explicitly
pub const DEFAULT_CONFIG_PATH: &str = "qbit-cleanup.toml";

/// Load configuration with environment variable overrides.
///
/// Sources, lowest precedence first:
/// - the TOML file (`path`, or `DEFAULT_CONFIG_PATH` when it exists)
/// - `QBT_HOST`, `QBT_PORT`, `QBT_USERNAME`, `QBT_PASSWORD` into `[qbittorrent]`
/// - `QBIT_CLEANUP_<SECTION>__<KEY>` (e.g. `QBIT_CLEANUP_POLICY__AGE_THRESHOLD_DAYS`)
///
/// An explicit path that does not exist is an error; a missing default file
/// is not, so the tool can run from the environment alone.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let mut figment = Figment::new();

    match path {
        Some(path) => {
            if !path.exists() {
                return Err(ConfigError::FileNotFound(path.display().to_string()));
            }
            figment = figment.merge(Toml::file(path));
        }
        None => {
            let default_path = Path::new(DEFAULT_CONFIG_PATH);
            if default_path.exists() {
                figment = figment.merge(Toml::file(default_path));
            }
        }
    }

    let config: Config = figment
        .merge(Env::prefixed("QBT_").map(|key| format!("qbittorrent.{}", key.as_str()).into()))
        .merge(Env::prefixed("QBIT_CLEANUP_").split("__"))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))?;

    Ok(config)
}

/// Load a `.env` file from the working directory (or a parent) into the
/// process environment, ahead of `load_config`.
///
/// Variables already set in the environment win over the file. Returns the
/// file that was read, or `None` when there is no `.env` file.
pub fn load_dotenv() -> Result<Option<PathBuf>, ConfigError> {
    match dotenvy::dotenv() {
        Ok(path) => Ok(Some(path)),
        Err(e) if e.not_found() => Ok(None),
        Err(e) => Err(ConfigError::ParseError(format!(".env: {}", e))),
    }
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}
