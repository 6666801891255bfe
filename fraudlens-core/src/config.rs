//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/fraudlens/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/fraudlens/` (~/.config/fraudlens/)
//! - State/Logs: `$XDG_STATE_HOME/fraudlens/` (~/.local/state/fraudlens/)

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Returns a best-effort home directory path.
fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns XDG_CONFIG_HOME or ~/.config
fn xdg_config_home() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

/// Returns XDG_STATE_HOME or ~/.local/state
fn xdg_state_home() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/state"))
}

/// Main configuration struct
#[derive(Debug, Deserialize, Default, Clone)]
pub struct Config {
    /// Backend endpoint configuration
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Console behaviour
    #[serde(default)]
    pub console: ConsoleConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Analyst backend configuration
#[derive(Debug, Deserialize, Clone)]
pub struct GatewayConfig {
    /// Base address of the API, e.g. `http://localhost:8000/api`
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// HTTP request timeout in seconds
    #[serde(default = "default_gateway_timeout")]
    pub timeout_secs: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_gateway_timeout(),
        }
    }
}

impl GatewayConfig {
    /// Validate configuration, returning error message if invalid
    pub fn validate(&self) -> Result<()> {
        let url = self.base_url.trim();
        if url.is_empty() {
            return Err(Error::Config("gateway.base_url must not be empty".to_string()));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(Error::Config(format!(
                "gateway.base_url must be an http(s) URL, got {:?}",
                url
            )));
        }
        if self.timeout_secs == 0 {
            return Err(Error::Config(
                "gateway.timeout_secs must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_base_url() -> String {
    "http://localhost:8000/api".to_string()
}

fn default_gateway_timeout() -> u64 {
    30
}

/// Console behaviour configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ConsoleConfig {
    /// Video selected on startup when present in the list
    #[serde(default = "default_video_id")]
    pub default_video_id: i64,

    /// Number of accounts requested per risk list fetch
    #[serde(default = "default_risk_page_size")]
    pub risk_page_size: usize,

    /// Quiet period before a search query is sent (0 sends every keystroke)
    #[serde(default = "default_search_debounce")]
    pub search_debounce_ms: u64,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            default_video_id: default_video_id(),
            risk_page_size: default_risk_page_size(),
            search_debounce_ms: default_search_debounce(),
        }
    }
}

impl ConsoleConfig {
    pub fn validate(&self) -> Result<()> {
        if self.risk_page_size == 0 {
            return Err(Error::Config(
                "console.risk_page_size must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }
}

fn default_video_id() -> i64 {
    20
}

fn default_risk_page_size() -> usize {
    50
}

fn default_search_debounce() -> u64 {
    250
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Maximum number of log files to keep
    #[serde(default = "default_max_log_files")]
    pub max_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            max_files: default_max_log_files(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_log_files() -> usize {
    5
}

impl Config {
    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            return Ok(Config::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate every section
    pub fn validate(&self) -> Result<()> {
        self.gateway.validate()?;
        self.console.validate()
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/fraudlens/config.toml` (~/.config/fraudlens/config.toml)
    pub fn config_path() -> PathBuf {
        xdg_config_home().join("fraudlens").join("config.toml")
    }

    /// Returns the state directory path (for logs)
    ///
    /// `$XDG_STATE_HOME/fraudlens/` (~/.local/state/fraudlens/)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("fraudlens")
    }

    /// Returns the log file path
    ///
    /// `$XDG_STATE_HOME/fraudlens/fraudlens.log` (~/.local/state/fraudlens/fraudlens.log)
    pub fn log_path() -> PathBuf {
        Self::state_dir().join("fraudlens.log")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.gateway.base_url, "http://localhost:8000/api");
        assert_eq!(config.gateway.timeout_secs, 30);
        assert_eq!(config.console.default_video_id, 20);
        assert_eq!(config.console.risk_page_size, 50);
        assert_eq!(config.console.search_debounce_ms, 250);
        assert_eq!(config.logging.level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
[gateway]
base_url = "https://review.example.com/api"
timeout_secs = 5

[console]
default_video_id = 7
search_debounce_ms = 0

[logging]
level = "debug"
"#;
        let config: Config = toml::from_str(toml).unwrap();

        assert_eq!(config.gateway.base_url, "https://review.example.com/api");
        assert_eq!(config.gateway.timeout(), Duration::from_secs(5));
        assert_eq!(config.console.default_video_id, 7);
        assert_eq!(config.console.risk_page_size, 50);
        assert_eq!(config.console.search_debounce(), Duration::ZERO);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_gateway_config_validation() {
        assert!(GatewayConfig::default().validate().is_ok());

        let config = GatewayConfig {
            base_url: "  ".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = GatewayConfig {
            base_url: "localhost:8000".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = GatewayConfig {
            timeout_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_console_config_validation() {
        let config = ConsoleConfig {
            risk_page_size: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[gateway]\nbase_url = \"http://10.0.0.2:8000/api\"").unwrap();

        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.gateway.base_url, "http://10.0.0.2:8000/api");
        assert_eq!(config.console.risk_page_size, 50);
    }

    #[test]
    fn test_load_from_rejects_invalid_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[console]\nrisk_page_size = 0").unwrap();

        let err = Config::load_from(file.path()).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_log_path_name() {
        assert!(Config::log_path().ends_with("fraudlens.log"));
    }
}
