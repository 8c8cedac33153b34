//! Runtime configuration for catalog processes.
//!
//! Read from TOML; every key is optional and falls back to its default.
//!
//! ```toml
//! database_path = "/var/lib/catalog/catalog.sqlite3"
//! default_page_size = 20
//!
//! [logging]
//! level = "info"
//! dir = "/var/log/catalog"
//! ```

use crate::logging::{default_log_level, normalize_level};
use crate::query::page::DEFAULT_PAGE_SIZE;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

const DEFAULT_DATABASE_FILE: &str = "catalog.sqlite3";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config value: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// SQLite database file.
    pub database_path: PathBuf,
    /// Page size used by listings when the caller gives none.
    pub default_page_size: u32,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// Absolute directory for rolling log files. Logging stays off when unset.
    pub dir: Option<PathBuf>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from(DEFAULT_DATABASE_FILE),
            default_page_size: DEFAULT_PAGE_SIZE,
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level().to_string(),
            dir: None,
        }
    }
}

impl CatalogConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database_path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid(
                "database_path must not be empty".to_string(),
            ));
        }
        if self.default_page_size < 1 {
            return Err(ConfigError::Invalid(
                "default_page_size must be >= 1".to_string(),
            ));
        }
        normalize_level(&self.logging.level)
            .map_err(|err| ConfigError::Invalid(err.to_string()))?;
        if let Some(dir) = &self.logging.dir {
            if !dir.is_absolute() {
                return Err(ConfigError::Invalid(format!(
                    "logging.dir must be absolute, got `{}`",
                    dir.display()
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{CatalogConfig, ConfigError};
    use std::path::PathBuf;

    #[test]
    fn empty_document_uses_defaults() {
        let config = CatalogConfig::from_toml_str("").unwrap();
        assert_eq!(config, CatalogConfig::default());
        assert_eq!(config.default_page_size, 20);
        assert_eq!(config.logging.dir, None);
    }

    #[test]
    fn values_override_defaults() {
        let config = CatalogConfig::from_toml_str(
            r#"
            database_path = "/tmp/books.db"
            default_page_size = 3

            [logging]
            level = "warning"
            "#,
        )
        .unwrap();
        assert_eq!(config.database_path, PathBuf::from("/tmp/books.db"));
        assert_eq!(config.default_page_size, 3);
        assert_eq!(config.logging.level, "warning");
    }

    #[test]
    fn zero_page_size_is_rejected() {
        let err = CatalogConfig::from_toml_str("default_page_size = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn relative_log_dir_is_rejected() {
        let err = CatalogConfig::from_toml_str("[logging]\ndir = \"logs\"").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = CatalogConfig::from_toml_str("default_page_size = ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = CatalogConfig::load(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
