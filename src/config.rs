//! Application configuration
//!
//! Read from a TOML file. Every section and field has a default, so a
//! partial (or absent) file is fine:
//!
//! ```toml
//! [server]
//! host = "0.0.0.0"
//! port = 8080
//!
//! [database]
//! url = "sqlite://./parking.db?mode=rwc"   # or "memory"
//! max_connections = 10
//!
//! [logging]
//! level = "info"
//! json = false
//!
//! [pagination]
//! default_page_size = 20
//! max_page_size = 100
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::infrastructure::DatabaseConfig;
use crate::interfaces::http::common::PageLimits;
use crate::shared::errors::InfraError;

/// Database url that selects the process-local in-memory store.
pub const MEMORY_DATABASE_URL: &str = "memory";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseSection,
    pub logging: LoggingConfig,
    pub pagination: PaginationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSection {
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        let defaults = DatabaseConfig::default();
        Self {
            url: defaults.url,
            max_connections: defaults.max_connections,
        }
    }
}

impl DatabaseSection {
    pub fn is_memory(&self) -> bool {
        self.url.eq_ignore_ascii_case(MEMORY_DATABASE_URL)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing` filter directive, e.g. `info` or `parking_service=debug`
    pub level: String,
    /// Emit one JSON object per line instead of human-readable output
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationConfig {
    pub default_page_size: u64,
    pub max_page_size: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        let limits = PageLimits::default();
        Self {
            default_page_size: limits.default_size,
            max_page_size: limits.max_size,
        }
    }
}

impl AppConfig {
    /// Load configuration from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, InfraError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)?;
        Self::parse(&raw)
    }

    pub fn parse(raw: &str) -> Result<Self, InfraError> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), InfraError> {
        if self.server.port == 0 {
            return Err(InfraError::Config("server.port must be non-zero".into()));
        }
        if self.database.url.trim().is_empty() {
            return Err(InfraError::Config("database.url must not be empty".into()));
        }
        if self.database.max_connections == 0 {
            return Err(InfraError::Config(
                "database.max_connections must be at least 1".into(),
            ));
        }
        let pages = &self.pagination;
        if pages.default_page_size == 0 || pages.default_page_size > pages.max_page_size {
            return Err(InfraError::Config(format!(
                "pagination.default_page_size must be between 1 and max_page_size ({})",
                pages.max_page_size
            )));
        }
        Ok(())
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn database_config(&self) -> DatabaseConfig {
        DatabaseConfig {
            url: self.database.url.clone(),
            max_connections: self.database.max_connections,
        }
    }

    pub fn page_limits(&self) -> PageLimits {
        PageLimits {
            default_size: self.pagination.default_page_size,
            max_size: self.pagination.max_page_size,
        }
    }
}

/// `<config dir>/parking-service/config.toml`, or `./config.toml` when the
/// platform has no config directory.
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .map(|dir| dir.join("parking-service"))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = AppConfig::parse("").unwrap();
        assert_eq!(config.address(), "0.0.0.0:8080");
        assert_eq!(config.page_limits(), PageLimits::default());
        assert!(!config.database.is_memory());
        assert!(!config.logging.json);
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let config = AppConfig::parse(
            r#"
            [server]
            port = 9090

            [database]
            url = "memory"

            [pagination]
            max_page_size = 50
            "#,
        )
        .unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9090);
        assert!(config.database.is_memory());
        assert_eq!(config.database.max_connections, 10);
        assert_eq!(
            config.page_limits(),
            PageLimits {
                default_size: 20,
                max_size: 50
            }
        );
    }

    #[test]
    fn default_page_size_above_max_is_rejected() {
        let err = AppConfig::parse(
            r#"
            [pagination]
            default_page_size = 200
            max_page_size = 100
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, InfraError::Config(_)));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = AppConfig::parse("[server\nport = ").unwrap_err();
        assert!(matches!(err, InfraError::ConfigParse(_)));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let path = std::env::temp_dir().join("parking-service-no-such-config.toml");
        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn default_path_ends_with_service_directory() {
        let path = default_config_path();
        assert!(path.ends_with("parking-service/config.toml") || path.ends_with("config.toml"));
    }
}
