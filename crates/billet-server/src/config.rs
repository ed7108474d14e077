//! Configuration file parsing for the server.
//!
//! Loads settings from TOML files including bind address, database path,
//! log filter and the service result limits.

use billet_service::ServiceConfig;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Server configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Missing required field
    #[error("Missing required configuration field: {0}")]
    MissingField(String),

    /// Field present but out of range
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Server configuration loaded from TOML
///
/// The service limits sit at the top level of the file alongside the
/// server settings:
///
/// ```toml
/// bind_address = "127.0.0.1"
/// bind_port = 8080
/// database_path = "billet.db"
/// log_filter = "billet_service=debug,info"
/// peer_suggestion_limit = 10
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1")
    pub bind_address: String,

    /// Bind port (e.g., 8080)
    pub bind_port: u16,

    /// SQLite database file, or `:memory:`
    pub database_path: String,

    /// `tracing` filter used when `RUST_LOG` is unset (default: "info")
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    /// Result limits and cohort warning threshold
    #[serde(flatten)]
    pub service: ServiceConfig,
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl ServerConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: ServerConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Check required fields and limits
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database_path.trim().is_empty() {
            return Err(ConfigError::MissingField("database_path".to_string()));
        }
        self.service.validate().map_err(ConfigError::Invalid)
    }

    /// Create a default configuration for testing
    pub fn default_test_config() -> Self {
        ServerConfig {
            bind_address: "127.0.0.1".to_string(),
            bind_port: 8080,
            database_path: ":memory:".to_string(),
            log_filter: default_log_filter(),
            service: ServiceConfig::default(),
        }
    }

    /// Get the full bind address (address:port)
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.bind_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default_test_config();
        assert_eq!(config.bind_address, "127.0.0.1");
        assert_eq!(config.database_path, ":memory:");
        assert_eq!(config.service.peer_suggestion_limit, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_bind_addr() {
        let config = ServerConfig::default_test_config();
        assert_eq!(config.bind_addr(), "127.0.0.1:8080");
    }

    #[test]
    fn test_parse_toml() {
        let toml = r#"
            bind_address = "0.0.0.0"
            bind_port = 9000
            database_path = "/var/lib/billet/billet.db"
            log_filter = "debug"
            supervisor_suggestion_limit = 3
        "#;

        let config = ServerConfig::from_toml(toml).unwrap();
        assert_eq!(config.bind_port, 9000);
        assert_eq!(config.database_path, "/var/lib/billet/billet.db");
        assert_eq!(config.log_filter, "debug");
        assert_eq!(config.service.supervisor_suggestion_limit, 3);
        assert_eq!(config.service.peer_suggestion_limit, 10);
        assert_eq!(config.service.large_cohort_warning, 500);
    }

    #[test]
    fn test_defaults_when_omitted() {
        let toml = r#"
            bind_address = "127.0.0.1"
            bind_port = 8080
            database_path = "billet.db"
        "#;

        let config = ServerConfig::from_toml(toml).unwrap();
        assert_eq!(config.log_filter, "info");
        assert_eq!(config.service, ServiceConfig::default());
    }

    #[test]
    fn test_rejects_empty_database_path() {
        let toml = r#"
            bind_address = "127.0.0.1"
            bind_port = 8080
            database_path = ""
        "#;

        assert!(matches!(
            ServerConfig::from_toml(toml),
            Err(ConfigError::MissingField(_))
        ));
    }

    #[test]
    fn test_rejects_zero_limit() {
        let toml = r#"
            bind_address = "127.0.0.1"
            bind_port = 8080
            database_path = "billet.db"
            peer_suggestion_limit = 0
        "#;

        assert!(matches!(
            ServerConfig::from_toml(toml),
            Err(ConfigError::Invalid(_))
        ));
    }
}
