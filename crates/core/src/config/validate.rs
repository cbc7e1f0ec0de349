use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - qBittorrent host (unless a full URL is given), port, username and password are set
/// - Age and size thresholds are non-zero
/// - Cross-seed tag is not blank
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let qb = &config.qbittorrent;

    if qb.url.is_none() {
        if qb.host.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "qbittorrent.host cannot be empty".to_string(),
            ));
        }
        if qb.port == 0 {
            return Err(ConfigError::ValidationError(
                "qbittorrent.port cannot be 0".to_string(),
            ));
        }
    }

    if qb.username.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "qbittorrent.username cannot be empty".to_string(),
        ));
    }
    if qb.password.is_empty() {
        return Err(ConfigError::ValidationError(
            "qbittorrent.password cannot be empty".to_string(),
        ));
    }

    let policy = &config.policy;

    if policy.age_threshold_days == 0 {
        return Err(ConfigError::ValidationError(
            "policy.age_threshold_days must be greater than 0".to_string(),
        ));
    }
    if policy.size_threshold_gb == 0 {
        return Err(ConfigError::ValidationError(
            "policy.size_threshold_gb must be greater than 0".to_string(),
        ));
    }
    if policy.cross_seed_tag.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "policy.cross_seed_tag cannot be empty".to_string(),
        ));
    }

    Ok(())
}
