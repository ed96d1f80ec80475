//! Configuration loading
//!
//! TOML config with optional sections:
//!
//! ```toml
//! [ledger]
//! interval_days = 10
//! addition_value = 1
//!
//! [database]
//! path = "data/discobase.db"
//!
//! [logging]
//! level = "info"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default config file name, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "discobase.toml";

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// File not found
    #[error("config file not found: {0}")]
    NotFound(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// Serialize error
    #[error("serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Validation error
    #[error("validation error: {0}")]
    Validation(String),
}

/// Root configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscobaseConfig {
    pub ledger: LedgerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
}

/// Credit ledger settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Days between two Addition transactions
    pub interval_days: u32,
    /// Credit added by each Addition
    pub addition_value: i64,
}

impl LedgerConfig {
    /// Reject settings that would stall or reverse the addition catch-up
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.interval_days == 0 {
            return Err(ConfigError::Validation(
                "ledger.interval_days must be greater than 0".to_string(),
            ));
        }

        if self.addition_value <= 0 {
            return Err(ConfigError::Validation(format!(
                "ledger.addition_value must be positive, got {}",
                self.addition_value
            )));
        }

        Ok(())
    }
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            interval_days: 10,
            addition_value: 1,
        }
    }
}

/// Database settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/discobase.db"),
        }
    }
}

impl DatabaseConfig {
    /// sqlx connection URL for the configured path
    pub fn url(&self) -> String {
        format!("sqlite:{}", self.path.display())
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive, overridden by `RUST_LOG`
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from file
    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<DiscobaseConfig, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }

        let content = std::fs::read_to_string(path)?;
        Self::load_str(&content)
    }

    /// Load configuration from string
    pub fn load_str(content: &str) -> Result<DiscobaseConfig, ConfigError> {
        let config: DiscobaseConfig = toml::from_str(content)?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Load an explicit file, or `discobase.toml` if present, or defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<DiscobaseConfig, ConfigError> {
        match path {
            Some(path) => Self::load_file(path),
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_FILE);
                if fallback.exists() {
                    Self::load_file(fallback)
                } else {
                    tracing::debug!("No config file, using defaults");
                    Ok(DiscobaseConfig::default())
                }
            }
        }
    }

    /// Render a configuration as TOML
    pub fn to_toml(config: &DiscobaseConfig) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(config)?)
    }

    /// Validate configuration
    pub fn validate(config: &DiscobaseConfig) -> Result<(), ConfigError> {
        config.ledger.validate()?;

        if config.database.path.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "database.path must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = ConfigLoader::load_str("").unwrap();
        assert_eq!(config, DiscobaseConfig::default());
        assert_eq!(config.ledger.interval_days, 10);
        assert_eq!(config.ledger.addition_value, 1);
        assert_eq!(config.database.url(), "sqlite:data/discobase.db");
    }

    #[test]
    fn test_partial_config() {
        let toml = r#"
[ledger]
interval_days = 7

[logging]
level = "debug"
"#;
        let config = ConfigLoader::load_str(toml).unwrap();
        assert_eq!(config.ledger.interval_days, 7);
        assert_eq!(config.ledger.addition_value, 1);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_rejects_zero_interval() {
        let err = ConfigLoader::load_str("[ledger]\ninterval_days = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_rejects_non_positive_addition() {
        let err = ConfigLoader::load_str("[ledger]\naddition_value = -1\n").unwrap_err();
        assert!(err.to_string().contains("addition_value"));
    }

    #[test]
    fn test_rejects_malformed_toml() {
        let err = ConfigLoader::load_str("[ledger\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[database]\npath = \"/tmp/records.db\"").unwrap();

        let config = ConfigLoader::load_file(file.path()).unwrap();
        assert_eq!(config.database.path, PathBuf::from("/tmp/records.db"));
    }

    #[test]
    fn test_missing_file() {
        let err = ConfigLoader::load_file("/nonexistent/discobase.toml").unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_toml_round_trip() {
        let rendered = ConfigLoader::to_toml(&DiscobaseConfig::default()).unwrap();
        assert!(rendered.contains("interval_days = 10"));
        assert_eq!(
            ConfigLoader::load_str(&rendered).unwrap(),
            DiscobaseConfig::default()
        );
    }
}
