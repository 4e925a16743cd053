//! Configuration management for salesdash
//!
//! This module handles loading, validation, and management of
//! salesdash configuration from YAML files.

pub mod error;

use serde::{Deserialize, Serialize};
use std::path::Path;

pub use error::ConfigError;

// ==================== Configuration Types ====================

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,
    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
    /// Path prefix the transaction endpoints are mounted under
    #[serde(default = "default_base_path")]
    pub base_path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            base_path: default_base_path(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5001
}

fn default_base_path() -> String {
    "/api/transaction".to_string()
}

/// Remote seed feed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// URL of the JSON document holding the transaction array
    #[serde(default = "default_feed_url")]
    pub url: String,
    /// Fetch timeout in seconds
    #[serde(default = "default_feed_timeout")]
    pub timeout_secs: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            url: default_feed_url(),
            timeout_secs: default_feed_timeout(),
        }
    }
}

fn default_feed_url() -> String {
    "https://s3.amazonaws.com/roxiler.com/product_transaction.json".to_string()
}

fn default_feed_timeout() -> u64 {
    30
}

/// Transaction store settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// SQLite connection URL
    #[serde(default = "default_store_url")]
    pub url: String,
    /// Pool size (forced to 1 for in-memory databases)
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: default_store_url(),
            max_connections: default_max_connections(),
        }
    }
}

fn default_store_url() -> String {
    "sqlite::memory:".to_string()
}

fn default_max_connections() -> u32 {
    5
}

impl StoreConfig {
    /// Whether the URL points at a private in-memory database
    pub fn is_in_memory(&self) -> bool {
        self.url.contains(":memory:") || self.url.contains("mode=memory")
    }
}

/// Seeding behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedConfig {
    /// Replace the dataset inside a single store transaction.
    /// When false, readers may observe an empty or partial store mid-reseed.
    #[serde(default = "default_true")]
    pub atomic: bool,
    /// Seed once at startup
    #[serde(default = "default_false")]
    pub on_startup: bool,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            atomic: true,
            on_startup: false,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_false() -> bool {
    false
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Pagination settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Records per page when the request does not say
    #[serde(default = "default_per_page")]
    pub default_per_page: u64,
    /// Upper bound for a requested page size
    #[serde(default = "default_max_per_page")]
    pub max_per_page: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_per_page: default_per_page(),
            max_per_page: default_max_per_page(),
        }
    }
}

fn default_per_page() -> u64 {
    10
}

fn default_max_per_page() -> u64 {
    100
}

/// Which records the charts of the combined view are computed over
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartScope {
    /// Every record in the store, ignoring the requested month
    #[default]
    AllTime,
    /// Only records in the requested month
    Period,
}

impl std::fmt::Display for ChartScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChartScope::AllTime => write!(f, "all_time"),
            ChartScope::Period => write!(f, "period"),
        }
    }
}

/// Combined view settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombinedConfig {
    /// Raw records included in the combined payload
    #[serde(default = "default_combined_limit")]
    pub transactions_limit: u64,
    /// Record scope of the bar and pie charts
    #[serde(default)]
    pub chart_scope: ChartScope,
}

impl Default for CombinedConfig {
    fn default() -> Self {
        Self {
            transactions_limit: default_combined_limit(),
            chart_scope: ChartScope::default(),
        }
    }
}

fn default_combined_limit() -> u64 {
    10
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Seed feed settings
    #[serde(default)]
    pub feed: FeedConfig,
    /// Store settings
    #[serde(default)]
    pub store: StoreConfig,
    /// Seeding behaviour
    #[serde(default)]
    pub seed: SeedConfig,
    /// Pagination settings
    #[serde(default)]
    pub pagination: PaginationConfig,
    /// Combined view settings
    #[serde(default)]
    pub combined: CombinedConfig,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.to_string_lossy().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            message: format!("{}: {}", path.display(), e),
        })?;
        Self::from_yaml(&content)
    }

    /// Parse and validate configuration from YAML text
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(content)
            .map_err(|e| ConfigError::InvalidYaml { message: e.to_string() })?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.port".to_string(),
                reason: "Port must be greater than 0".to_string(),
            });
        }

        if !self.server.base_path.starts_with('/') || self.server.base_path.ends_with('/') {
            return Err(ConfigError::InvalidValue {
                field: "server.base_path".to_string(),
                reason: "Base path must start with '/' and must not end with '/'".to_string(),
            });
        }

        if !self.feed.url.starts_with("http://") && !self.feed.url.starts_with("https://") {
            return Err(ConfigError::InvalidValue {
                field: "feed.url".to_string(),
                reason: "Feed URL must be an http(s) URL".to_string(),
            });
        }

        if self.store.max_connections == 0 {
            return Err(ConfigError::InvalidValue {
                field: "store.max_connections".to_string(),
                reason: "Pool needs at least one connection".to_string(),
            });
        }

        if self.pagination.default_per_page == 0
            || self.pagination.default_per_page > self.pagination.max_per_page
        {
            return Err(ConfigError::InvalidValue {
                field: "pagination.default_per_page".to_string(),
                reason: "Default page size must be between 1 and pagination.max_per_page".to_string(),
            });
        }

        if self.log_filter().is_none() {
            return Err(ConfigError::InvalidValue {
                field: "logging.level".to_string(),
                reason: "Level must be one of trace, debug, info, warn, error, off".to_string(),
            });
        }

        Ok(())
    }

    /// Generate a default configuration file
    pub fn generate_default() -> &'static str {
        include_str!("../templates/default_config.yaml")
    }

    /// Normalized log level, or `None` if the configured value is not a level
    pub fn log_filter(&self) -> Option<&'static str> {
        match self.logging.level.to_lowercase().as_str() {
            "trace" => Some("trace"),
            "debug" => Some("debug"),
            "info" => Some("info"),
            "warn" | "warning" => Some("warn"),
            "error" => Some("error"),
            "off" => Some("off"),
            _ => None,
        }
    }

    /// Address the HTTP server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.server.port, 5001);
        assert_eq!(config.server.base_path, "/api/transaction");
        assert_eq!(config.pagination.default_per_page, 10);
        assert_eq!(config.combined.chart_scope, ChartScope::AllTime);
        assert!(config.seed.atomic);
        assert!(config.store.is_in_memory());
    }

    #[test]
    fn test_bundled_template_parses() {
        let config = Config::from_yaml(Config::generate_default()).unwrap();
        assert_eq!(config.server.port, 5001);
        assert_eq!(config.combined.transactions_limit, 10);
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let config = Config::from_yaml("server:\n  port: 8080\ncombined:\n  chart_scope: period\n").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.combined.chart_scope, ChartScope::Period);
        assert_eq!(config.pagination.max_per_page, 100);
    }

    #[test]
    fn test_invalid_yaml() {
        let err = Config::from_yaml("server: [not, a, map").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidYaml { .. }));
    }

    #[test]
    fn test_invalid_values() {
        let err = Config::from_yaml("server:\n  port: 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "server.port"));

        let err = Config::from_yaml("server:\n  base_path: api/\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "server.base_path"));

        let err = Config::from_yaml("pagination:\n  default_per_page: 500\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "pagination.default_per_page"));

        let err = Config::from_yaml("logging:\n  level: loud\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "logging.level"));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load("/definitely/not/here.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound { .. }));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "feed:\n  url: http://localhost:9000/feed.json\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.feed.url, "http://localhost:9000/feed.json");
        assert_eq!(config.feed.timeout_secs, 30);
    }

    #[test]
    fn test_chart_scope_display() {
        assert_eq!(ChartScope::default(), ChartScope::AllTime);
        assert_eq!(ChartScope::AllTime.to_string(), "all_time");
        assert_eq!(ChartScope::Period.to_string(), "period");
        assert!(Config::from_yaml("combined:\n  chart_scope: weekly\n").is_err());
    }

    #[test]
    fn test_load_directory_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(dir.path()).unwrap_err();
        match err {
            ConfigError::IoError { message } => {
                assert!(message.contains(&dir.path().display().to_string()))
            }
            other => panic!("expected IoError, got {:?}", other),
        }
    }

    #[test]
    fn test_file_database_is_not_in_memory() {
        let store = StoreConfig {
            url: "sqlite://data/sales.db".to_string(),
            max_connections: 4,
        };
        assert!(!store.is_in_memory());
    }
}
