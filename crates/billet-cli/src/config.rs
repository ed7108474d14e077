//! Configuration management for the CLI.
//!
//! Settings live in `~/.billet/config.toml`. Command-line flags and
//! `BILLET_DATABASE` override them. The `[service]` table sets result limits.

use crate::error::{CliError, Result};
use billet_service::ServiceConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// CLI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Database used when `--database` is not given
    #[serde(default = "default_database")]
    pub database: String,

    /// Global settings
    #[serde(default)]
    pub settings: Settings,

    /// Service result limits
    #[serde(default)]
    pub service: ServiceConfig,
}

/// Global CLI settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,

    /// `tracing` filter when `RUST_LOG` is unset
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
    /// Quiet (minimal) format
    Quiet,
}

impl Config {
    /// Get the configuration file path.
    pub fn path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".billet").join("config.toml"))
    }

    /// Load configuration from the default path, or defaults if absent.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load configuration from `path`, or defaults if absent.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)?;
            let config: Config = toml::from_str(&contents)?;
            config.service.validate().map_err(CliError::Config)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Database path, preferring an explicit override.
    pub fn database_path(&self, overridden: Option<&str>) -> Result<String> {
        let path = overridden.unwrap_or(&self.database);
        if path.trim().is_empty() {
            return Err(CliError::Config("Database path is empty".into()));
        }
        Ok(path.to_string())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: default_database(),
            settings: Settings::default(),
            service: ServiceConfig::default(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
            log_filter: default_log_filter(),
        }
    }
}

fn default_database() -> String {
    "billet.db".to_string()
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}

fn default_log_filter() -> String {
    "warn".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.database, "billet.db");
        assert!(config.settings.color);
        assert_eq!(config.settings.format, OutputFormat::Table);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
            database = "/srv/billet/roster.db"

            [settings]
            format = "json"
            color = false
            "#,
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.database, "/srv/billet/roster.db");
        assert_eq!(config.settings.format, OutputFormat::Json);
        assert!(!config.settings.color);
        assert_eq!(config.settings.log_filter, "warn");
        assert_eq!(config.service, ServiceConfig::default());
    }

    #[test]
    fn test_service_limits_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
            [service]
            peer_suggestion_limit = 3
            large_cohort_warning = 50
            "#,
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.service.peer_suggestion_limit, 3);
        assert_eq!(config.service.large_cohort_warning, 50);
        assert_eq!(config.service.supervisor_suggestion_limit, 5);

        fs::write(&path, "[service]\npeer_suggestion_limit = 0\n").unwrap();
        assert!(matches!(Config::load_from(&path), Err(CliError::Config(_))));
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.database, "billet.db");
    }

    #[test]
    fn test_database_override() {
        let config = Config::default();
        assert_eq!(config.database_path(Some("other.db")).unwrap(), "other.db");
        assert_eq!(config.database_path(None).unwrap(), "billet.db");
        assert!(config.database_path(Some("  ")).is_err());
    }
}
