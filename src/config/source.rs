//! Source configuration module.
//!
//! Settings for the byte sources a word list is streamed from.

use std::time::Duration;

use super::{ConfigResult, Validate};
use crate::error::config::ConfigError;
use serde::{Deserialize, Serialize};

/// Byte source configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Size of each chunk read from a local file, in bytes
    pub chunk_size: usize,

    /// Connection timeout for HTTP sources in milliseconds
    pub connect_timeout_ms: u64,

    /// User agent sent with HTTP requests
    pub user_agent: String,

    /// Whether HTTP sources honor the `HTTP_PROXY`/`HTTPS_PROXY` environment
    pub use_system_proxy: bool,
}

impl SourceConfig {
    /// Returns the HTTP connect timeout as a [`Duration`].
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            chunk_size: 64 * 1024,
            connect_timeout_ms: 5000,
            user_agent: format!("hua-dict/{}", env!("CARGO_PKG_VERSION")),
            use_system_proxy: true,
        }
    }
}

impl Validate for SourceConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.chunk_size == 0 {
            return Err(ConfigError::ValidationError(
                "chunk_size must be greater than 0".to_string(),
            ));
        }

        if self.connect_timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "connect_timeout_ms must be greater than 0".to_string(),
            ));
        }

        if self.user_agent.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "user_agent cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}
