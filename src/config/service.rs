//! Service configuration module.
//!
//! This module defines configuration for the dictionary worker itself: the
//! capacities of the request and response channels between the caller and
//! the worker task.

use super::ConfigResult;
use super::Validate;
use crate::error::config::ConfigError;
use serde::{Deserialize, Serialize};

/// Worker configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Name of the service (used in logs)
    pub name: String,

    /// Capacity of the request channel into the worker
    pub request_buffer: usize,

    /// Capacity of the response channel out of the worker
    pub response_buffer: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: "hua-dict".to_string(),
            request_buffer: 64,
            response_buffer: 256,
        }
    }
}

impl Validate for ServiceConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "Service name cannot be empty".to_string(),
            ));
        }

        if self.request_buffer == 0 {
            return Err(ConfigError::ValidationError(
                "request_buffer must be greater than 0".to_string(),
            ));
        }

        if self.response_buffer == 0 {
            return Err(ConfigError::ValidationError(
                "response_buffer must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
