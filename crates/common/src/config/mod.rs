//! Configuration management for Broadsheet
//!
//! Supports loading configuration from:
//! - Environment variables (prefixed with APP__)
//! - Configuration files (config.toml, config.yaml)
//! - Default values

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// List pagination configuration
    #[serde(default)]
    pub pagination: PaginationConfig,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Database URL (`sqlite://...` or `postgres://...`)
    #[serde(default = "default_database_url")]
    pub url: String,

    /// Maximum number of connections
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Minimum number of connections
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,

    /// Connection timeout in seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    /// Idle timeout in seconds
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,

    /// Log every SQL statement through tracing
    #[serde(default)]
    pub log_queries: bool,

    /// Create missing tables and seed authors at startup
    #[serde(default = "default_enabled")]
    pub bootstrap: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PaginationConfig {
    /// Page size used when `num` is zero or absent
    #[serde(default = "default_page_size")]
    pub default_page_size: u64,

    /// Upper bound applied to client-requested page sizes
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    /// Log filter directive (debug, info, warn, error or an EnvFilter string)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default)]
    pub json_logging: bool,

    /// Metrics port (0 to disable)
    #[serde(default)]
    pub metrics_port: u16,

    /// Service name attached to logs
    #[serde(default = "default_service_name")]
    pub service_name: String,
}

// Default value functions
fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8000 }
fn default_request_timeout() -> u64 { 30 }
fn default_database_url() -> String { "sqlite://data.db?mode=rwc".to_string() }
fn default_max_connections() -> u32 { 10 }
fn default_min_connections() -> u32 { 1 }
fn default_connect_timeout() -> u64 { 10 }
fn default_idle_timeout() -> u64 { 300 }
fn default_enabled() -> bool { true }
fn default_page_size() -> u64 { crate::pagination::DEFAULT_PAGE_SIZE }
fn default_max_page_size() -> u64 { 100 }
fn default_log_level() -> String { "info".to_string() }
fn default_service_name() -> String { "broadsheet".to_string() }

impl AppConfig {
    /// Load configuration from environment and files
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        let config = Config::builder()
            // Load base config file
            .add_source(File::with_name("config/default").required(false))

            // Load environment-specific config
            .add_source(File::with_name(&format!("config/{}", env)).required(false))

            // Load local overrides
            .add_source(File::with_name("config/local").required(false))

            // Load from environment variables with APP__ prefix
            // e.g., APP__SERVER__PORT=8081
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true)
            )

            .build()?;

        config.try_deserialize::<Self>()?.validated()
    }

    /// Load from a specific TOML file
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::with_name(path))
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true)
            )
            .build()?;

        config.try_deserialize::<Self>()?.validated()
    }

    /// Reject settings the server cannot run with
    fn validated(self) -> Result<Self, ConfigError> {
        if self.pagination.default_page_size == 0 {
            return Err(ConfigError::Message(
                "pagination.default_page_size must be positive".to_string(),
            ));
        }
        if self.pagination.max_page_size < self.pagination.default_page_size {
            return Err(ConfigError::Message(
                "pagination.max_page_size must not be below default_page_size".to_string(),
            ));
        }
        Ok(self)
    }

    /// Get request timeout as Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.server.request_timeout_secs)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_secs: default_connect_timeout(),
            idle_timeout_secs: default_idle_timeout(),
            log_queries: false,
            bootstrap: default_enabled(),
        }
    }
}

impl DatabaseConfig {
    /// Single-connection in-memory SQLite database, for tests and demos
    pub fn in_memory() -> Self {
        Self {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            min_connections: 1,
            ..Self::default()
        }
    }
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
        }
    }
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json_logging: false,
            metrics_port: 0,
            service_name: default_service_name(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            pagination: PaginationConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.pagination.default_page_size, 10);
        assert_eq!(config.database.url, "sqlite://data.db?mode=rwc");
        assert!(config.database.bootstrap);
    }

    #[test]
    fn test_in_memory_database() {
        let db = DatabaseConfig::in_memory();
        assert_eq!(db.url, "sqlite::memory:");
        assert_eq!(db.max_connections, 1);
    }

    #[test]
    fn test_partial_source_fills_defaults() {
        let config = Config::builder()
            .set_override("server.port", 9100)
            .unwrap()
            .set_override("pagination.max_page_size", 50)
            .unwrap()
            .build()
            .unwrap();
        let config: AppConfig = config.try_deserialize().unwrap();
        assert_eq!(config.server.port, 9100);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.pagination.max_page_size, 50);
        assert_eq!(config.pagination.default_page_size, 10);
        assert!(config.validated().is_ok());
    }

    #[test]
    fn test_inconsistent_page_sizes_rejected() {
        let mut config = AppConfig::default();
        config.pagination.max_page_size = 5;
        assert!(config.validated().is_err());

        let mut config = AppConfig::default();
        config.pagination.default_page_size = 0;
        assert!(config.validated().is_err());
    }
}
