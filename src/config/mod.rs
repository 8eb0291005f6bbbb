//! Configuration module for the Hua dictionary service.
//!
//! This module provides a layered configuration system: built-in defaults,
//! then an optional file (TOML, YAML, JSON), then environment variables.
//! All configuration values are validated for correctness before use.

use std::path::{Path, PathBuf};

use crate::error::config::ConfigError;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

pub mod ingest;
pub mod service;
pub mod source;

pub use ingest::IngestConfig;
pub use service::ServiceConfig;
pub use source::SourceConfig;

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Default environment variable prefix for configuration overrides
pub const ENV_PREFIX: &str = "HUA";

/// A trait for types that can be validated.
pub trait Validate {
    /// Validates that the configuration is correct.
    ///
    /// # Returns
    ///
    /// * `Ok(())` if the configuration is valid
    /// * `Err(ConfigError)` if the configuration is invalid
    fn validate(&self) -> ConfigResult<()>;
}

/// Main configuration for the Hua dictionary service.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HuaConfig {
    /// Worker configuration
    pub service: ServiceConfig,

    /// Ingestion configuration
    pub ingest: IngestConfig,

    /// Byte source configuration
    pub source: SourceConfig,

    /// Log configuration
    pub log: LogConfig,
}

impl HuaConfig {
    /// Renders the configuration as pretty-printed TOML.
    pub fn to_toml(&self) -> ConfigResult<String> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::SerializeError(e.to_string()))
    }
}

impl Validate for HuaConfig {
    fn validate(&self) -> ConfigResult<()> {
        self.service.validate()?;
        self.ingest.validate()?;
        self.source.validate()?;
        self.log.validate()?;
        Ok(())
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Whether to log in JSON format
    pub json: bool,

    /// Whether to include source code locations in logs
    pub source_location: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            source_location: true,
        }
    }
}

impl Validate for LogConfig {
    fn validate(&self) -> ConfigResult<()> {
        match self.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
            _ => Err(ConfigError::ValidationError(format!(
                "Invalid log level: {}",
                self.level
            ))),
        }
    }
}

/// Configuration loader for the Hua dictionary service.
#[derive(Debug)]
pub struct ConfigLoader {
    config_path: Option<PathBuf>,
    env_prefix: String,
}

impl ConfigLoader {
    /// Creates a new configuration loader.
    ///
    /// # Arguments
    ///
    /// * `config_path` - Optional path to the configuration file
    /// * `env_prefix` - Prefix for environment variables that override configuration values
    pub fn new<P: AsRef<Path>>(config_path: Option<P>, env_prefix: &str) -> Self {
        Self {
            config_path: config_path.map(|p| p.as_ref().to_path_buf()),
            env_prefix: env_prefix.to_string(),
        }
    }

    /// Loads the configuration from defaults, the file, and environment variables.
    ///
    /// # Returns
    ///
    /// * `Ok(HuaConfig)` if the configuration was loaded and validated
    /// * `Err(ConfigError)` if there was an error loading the configuration
    pub fn load(&self) -> ConfigResult<HuaConfig> {
        let mut builder = Config::builder().add_source(
            Config::try_from(&HuaConfig::default())
                .map_err(|e| ConfigError::ParseError(e.to_string()))?,
        );

        if let Some(path) = &self.config_path {
            if !path.exists() {
                return Err(ConfigError::FileNotFound(path.clone()));
            }

            let format = match path.extension().and_then(|ext| ext.to_str()) {
                Some("toml") => FileFormat::Toml,
                Some("json") => FileFormat::Json,
                Some("yaml" | "yml") => FileFormat::Yaml,
                _ => {
                    return Err(ConfigError::ParseError(format!(
                        "Unsupported file extension for: {path:?}"
                    )))
                }
            };
            builder = builder.add_source(File::from(path.as_path()).format(format));
        }

        builder = builder.add_source(
            Environment::with_prefix(&self.env_prefix)
                .separator("__")
                .try_parsing(true),
        );

        let hua_config: HuaConfig = builder
            .build()
            .and_then(Config::try_deserialize::<HuaConfig>)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;

        hua_config.validate()?;

        Ok(hua_config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(HuaConfig::default().validate().is_ok());
    }

    #[test]
    fn test_read_timeout_zero_disables() {
        let mut ingest = IngestConfig::default();
        assert!(ingest.read_timeout().is_some());

        ingest.read_timeout_ms = 0;
        assert!(ingest.read_timeout().is_none());
        assert!(ingest.validate().is_ok());
    }

    #[test]
    fn test_invalid_log_level_rejected() {
        let log = LogConfig {
            level: "loud".to_string(),
            ..LogConfig::default()
        };
        assert!(log.validate().is_err());
    }
}
