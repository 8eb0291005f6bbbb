//! Ingestion configuration module.
//!
//! Settings for a single load: where to read from when the request names no
//! source, how progress is estimated, and how long a read may stall.

use std::time::Duration;

use super::{ConfigResult, Validate};
use crate::error::config::ConfigError;
use serde::{Deserialize, Serialize};

/// Default source locator for a load request without a `url`.
pub const DEFAULT_URL: &str = "./wordlist.txt";

/// Default line count estimate used for progress percentages.
pub const DEFAULT_ESTIMATED_TOTAL: u64 = 200_000;

/// Default number of processed lines between progress checks.
pub const DEFAULT_PROGRESS_INTERVAL: u64 = 5000;

/// Ingestion configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Locator used when a load request does not name one
    pub default_url: String,

    /// Line count estimate used when a load request does not supply one
    pub estimated_total: u64,

    /// Number of processed lines between progress checks
    pub progress_interval: u64,

    /// Whether blank lines count as processed lines
    pub count_blank_lines: bool,

    /// Maximum time to wait for the next chunk, in milliseconds (0 disables)
    pub read_timeout_ms: u64,
}

impl IngestConfig {
    /// Returns the per-read timeout, or `None` when disabled.
    pub fn read_timeout(&self) -> Option<Duration> {
        (self.read_timeout_ms > 0).then(|| Duration::from_millis(self.read_timeout_ms))
    }
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            default_url: DEFAULT_URL.to_string(),
            estimated_total: DEFAULT_ESTIMATED_TOTAL,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            count_blank_lines: true,
            read_timeout_ms: 30_000,
        }
    }
}

impl Validate for IngestConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.default_url.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "default_url cannot be empty".to_string(),
            ));
        }

        if self.estimated_total == 0 {
            return Err(ConfigError::ValidationError(
                "estimated_total must be greater than 0".to_string(),
            ));
        }

        if self.progress_interval == 0 {
            return Err(ConfigError::ValidationError(
                "progress_interval must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
