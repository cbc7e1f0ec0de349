use serde::{Deserialize, Serialize};

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub qbittorrent: QBittorrentConfig,
    #[serde(default)]
    pub policy: PolicySettings,
}

/// qBittorrent Web UI connection settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QBittorrentConfig {
    /// Host name or address of the Web UI
    #[serde(default = "default_host")]
    pub host: String,
    /// Web UI port
    #[serde(default = "default_port")]
    pub port: u16,
    /// Full base URL (e.g., "https://qb.example.com"); overrides host/port when set
    #[serde(default)]
    pub url: Option<String>,
    pub username: String,
    pub password: String,
    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

impl QBittorrentConfig {
    /// Base URL of the Web UI without trailing slash.
    pub fn base_url(&self) -> String {
        match &self.url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("http://{}:{}", self.host, self.port),
        }
    }
}

impl Default for QBittorrentConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            url: None,
            username: String::new(),
            password: String::new(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_timeout() -> u32 {
    30
}

/// Retention policy thresholds and allow-lists
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct PolicySettings {
    /// Tags that protect a torrent from `aged` and `dedupe` removal
    #[serde(default = "default_excluded_tags")]
    pub excluded_tags: Vec<String>,
    /// Case-insensitive name substrings that protect a torrent
    #[serde(default = "default_name_exclusions")]
    pub name_exclusions: Vec<String>,
    /// Tag marking intentional cross-seeds (never deduplicated)
    #[serde(default = "default_cross_seed_tag")]
    pub cross_seed_tag: String,
    /// Minimum age in days before `aged` considers a torrent
    #[serde(default = "default_age_threshold_days")]
    pub age_threshold_days: u64,
    /// Maximum size in GiB (inclusive) for `aged` removal
    #[serde(default = "default_size_threshold_gb")]
    pub size_threshold_gb: u64,
}

impl Default for PolicySettings {
    fn default() -> Self {
        Self {
            excluded_tags: default_excluded_tags(),
            name_exclusions: default_name_exclusions(),
            cross_seed_tag: default_cross_seed_tag(),
            age_threshold_days: default_age_threshold_days(),
            size_threshold_gb: default_size_threshold_gb(),
        }
    }
}

fn default_excluded_tags() -> Vec<String> {
    vec!["movies".to_string(), "tv".to_string()]
}

fn default_name_exclusions() -> Vec<String> {
    vec!["nsw".to_string(), "ebook".to_string()]
}

fn default_cross_seed_tag() -> String {
    "cross-seed".to_string()
}

fn default_age_threshold_days() -> u64 {
    15
}

fn default_size_threshold_gb() -> u64 {
    5
}

/// Sanitized config for logging (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub qbittorrent: SanitizedQBittorrentConfig,
    pub policy: PolicySettings,
}

/// Sanitized qBittorrent config (password hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedQBittorrentConfig {
    pub url: String,
    pub username: String,
    pub password_configured: bool,
    pub timeout_secs: u32,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            qbittorrent: SanitizedQBittorrentConfig {
                url: config.qbittorrent.base_url(),
                username: config.qbittorrent.username.clone(),
                password_configured: !config.qbittorrent.password.is_empty(),
                timeout_secs: config.qbittorrent.timeout_secs,
            },
            policy: config.policy.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_minimal_config_uses_defaults() {
        let toml = r#"
[qbittorrent]
username = "admin"
password = "secret"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.qbittorrent.host, "localhost");
        assert_eq!(config.qbittorrent.port, 8080);
        assert_eq!(config.qbittorrent.timeout_secs, 30);
        assert_eq!(config.policy, PolicySettings::default());
        assert_eq!(config.policy.excluded_tags, vec!["movies", "tv"]);
        assert_eq!(config.policy.name_exclusions, vec!["nsw", "ebook"]);
        assert_eq!(config.policy.cross_seed_tag, "cross-seed");
        assert_eq!(config.policy.age_threshold_days, 15);
        assert_eq!(config.policy.size_threshold_gb, 5);
    }

    #[test]
    fn test_deserialize_full_config() {
        let toml = r#"
[qbittorrent]
host = "10.0.0.5"
port = 9090
username = "admin"
password = "secret"
timeout_secs = 10

[policy]
excluded_tags = ["keep"]
name_exclusions = []
cross_seed_tag = "xseed"
age_threshold_days = 30
size_threshold_gb = 2
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.qbittorrent.base_url(), "http://10.0.0.5:9090");
        assert_eq!(config.qbittorrent.timeout_secs, 10);
        assert_eq!(config.policy.excluded_tags, vec!["keep"]);
        assert!(config.policy.name_exclusions.is_empty());
        assert_eq!(config.policy.cross_seed_tag, "xseed");
        assert_eq!(config.policy.age_threshold_days, 30);
        assert_eq!(config.policy.size_threshold_gb, 2);
    }

    #[test]
    fn test_deserialize_missing_qbittorrent_fails() {
        let toml = r#"
[policy]
age_threshold_days = 30
"#;
        let result: Result<Config, _> = toml::from_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn test_base_url_prefers_explicit_url() {
        let config = QBittorrentConfig {
            url: Some("https://qb.example.com/".to_string()),
            ..Default::default()
        };
        assert_eq!(config.base_url(), "https://qb.example.com");
    }

    #[test]
    fn test_sanitized_config_hides_password() {
        let config = Config {
            qbittorrent: QBittorrentConfig {
                username: "admin".to_string(),
                password: "hunter2".to_string(),
                ..Default::default()
            },
            policy: PolicySettings::default(),
        };

        let sanitized = SanitizedConfig::from(&config);
        assert!(sanitized.qbittorrent.password_configured);

        let json = serde_json::to_string(&sanitized).unwrap();
        assert!(!json.contains("hunter2"));
        assert!(json.contains("http://localhost:8080"));
    }
}
