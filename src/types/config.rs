//! Configuration for Streamdash.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::StreamdashResult;

/// Environment variable overriding `api.base_url`.
pub const ENV_API_URL: &str = "STREAMDASH_API_URL";

/// Environment variable overriding `api.token`.
pub const ENV_API_TOKEN: &str = "STREAMDASH_API_TOKEN";

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = "streamdash.toml";

/// Main configuration for Streamdash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Backend API settings.
    #[serde(default)]
    pub api: ApiConfig,

    /// Response cache settings.
    #[serde(default)]
    pub cache: CacheConfig,
}

/// General settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log format (text, json).
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

/// Backend API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Origin of the backend, including any path prefix (e.g. `http://localhost:8000/api`).
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout (in seconds).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Bearer token sent with every request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// User-Agent header.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            token: None,
            user_agent: default_user_agent(),
        }
    }
}

impl ApiConfig {
    /// Request timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_base_url() -> String {
    "http://localhost:8000/api".to_string()
}

fn default_timeout() -> u64 {
    15
}

fn default_user_agent() -> String {
    format!("streamdash/{}", env!("CARGO_PKG_VERSION"))
}

/// Response cache settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Enabled.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Maximum cache capacity (number of entries).
    #[serde(default = "default_cache_capacity")]
    pub capacity: usize,

    /// Default entry time to live (in seconds).
    #[serde(default = "default_cache_ttl")]
    pub ttl_secs: u64,

    /// Time to live for live feeds such as live big wins (in seconds).
    #[serde(default = "default_live_ttl")]
    pub live_ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            capacity: default_cache_capacity(),
            ttl_secs: default_cache_ttl(),
            live_ttl_secs: default_live_ttl(),
        }
    }
}

impl CacheConfig {
    /// Default TTL as a [`Duration`].
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    /// Live-feed TTL as a [`Duration`].
    pub fn live_ttl(&self) -> Duration {
        Duration::from_secs(self.live_ttl_secs)
    }
}

fn default_true() -> bool {
    true
}

fn default_cache_capacity() -> usize {
    500
}

fn default_cache_ttl() -> u64 {
    60
}

fn default_live_ttl() -> u64 {
    10
}

impl Config {
    /// Loads configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> StreamdashResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Saves configuration to a TOML file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> StreamdashResult<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Creates default configuration.
    pub fn default_config() -> Self {
        Self {
            general: GeneralConfig::default(),
            api: ApiConfig::default(),
            cache: CacheConfig::default(),
        }
    }

    /// Tries the current directory, then the user config directory, then defaults.
    pub fn load_or_default() -> Self {
        if let Ok(config) = Self::load(CONFIG_FILE_NAME) {
            return config;
        }
        user_config_path()
            .and_then(|path| Self::load(path).ok())
            .unwrap_or_else(Self::default_config)
    }

    /// Applies `STREAMDASH_API_URL` / `STREAMDASH_API_TOKEN` overrides.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(
            std::env::var(ENV_API_URL).ok(),
            std::env::var(ENV_API_TOKEN).ok(),
        )
    }

    fn with_overrides(mut self, base_url: Option<String>, token: Option<String>) -> Self {
        if let Some(url) = base_url.filter(|u| !u.trim().is_empty()) {
            self.api.base_url = url;
        }
        if let Some(token) = token.filter(|t| !t.trim().is_empty()) {
            self.api.token = Some(token);
        }
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}

/// `<config dir>/streamdash/streamdash.toml`, when the platform has one.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("streamdash").join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default_config();
        assert_eq!(config.general.log_level, "info");
        assert!(config.cache.enabled);
        assert_eq!(config.cache.ttl(), Duration::from_secs(60));
        assert!(config.api.token.is_none());
        assert!(config.api.user_agent.starts_with("streamdash/"));
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);

        let mut config = Config::default_config();
        config.api.base_url = "https://stats.example.com/api".to_string();
        config.cache.capacity = 42;
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.api.base_url, "https://stats.example.com/api");
        assert_eq!(loaded.cache.capacity, 42);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = toml::from_str("[cache]\nttl_secs = 5\n").unwrap();
        assert_eq!(config.cache.ttl_secs, 5);
        assert_eq!(config.cache.capacity, 500);
        assert_eq!(config.api.timeout_secs, 15);
    }

    #[test]
    fn test_overrides() {
        let config = Config::default_config().with_overrides(
            Some("http://backend:9000".to_string()),
            Some("secret".to_string()),
        );
        assert_eq!(config.api.base_url, "http://backend:9000");
        assert_eq!(config.api.token.as_deref(), Some("secret"));
    }

    #[test]
    fn test_blank_overrides_are_ignored() {
        let config = Config::default_config().with_overrides(Some("  ".to_string()), None);
        assert_eq!(config.api.base_url, "http://localhost:8000/api");
    }
}
