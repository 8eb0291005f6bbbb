//! Error module for the Hua dictionary service.
//!
//! This module provides the error taxonomy for the whole crate. Each concern
//! has its own `thiserror` enum; [`HuaError`] aggregates them and maps every
//! failure onto the [`ErrorKind`] carried by `error` responses on the wire.

use std::fmt::{Display, Formatter};
use std::sync::Arc;

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod config;
pub mod decode;
pub mod protocol;
pub mod transport;

/// Result type alias used throughout the Hua dictionary service.
pub type HuaResult<T> = Result<T, HuaError>;

/// Core error enum for the Hua dictionary service.
#[derive(Error, Debug)]
pub enum HuaError {
    /// Errors occurring during configuration loading or validation.
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Errors raised while opening or reading the word list source.
    #[error("{0}")]
    Transport(#[from] transport::TransportError),

    /// Malformed bytes in the word list stream.
    #[error("{0}")]
    Decode(#[from] decode::DecodeError),

    /// Errors related to request parsing and message delivery.
    #[error("{0}")]
    Protocol(#[from] protocol::ProtocolError),

    /// A load was requested while another one is still streaming.
    #[error("A load of {active} is already in progress")]
    Busy {
        /// Locator of the load currently streaming
        active: String,
    },

    /// IO errors that may occur during file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/Deserialization errors.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A fault caught at the dispatch boundary.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl HuaError {
    /// Returns the wire category for this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            HuaError::Transport(transport::TransportError::Timeout(_)) => ErrorKind::Timeout,
            HuaError::Transport(_) => ErrorKind::Transport,
            HuaError::Decode(_) => ErrorKind::Decode,
            HuaError::Protocol(_) | HuaError::Serialization(_) => ErrorKind::InvalidRequest,
            HuaError::Busy { .. } => ErrorKind::Busy,
            HuaError::Config(_) | HuaError::Io(_) | HuaError::Internal(_) => ErrorKind::Internal,
        }
    }
}

/// Category of an `error` response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    /// The source failed or returned a non-success status
    Transport,
    /// The source bytes were not valid UTF-8
    Decode,
    /// The source stalled past the read timeout
    Timeout,
    /// A load was already streaming
    Busy,
    /// The request could not be understood
    InvalidRequest,
    /// A fault inside the service
    Internal,
}

/// Error reporting structure to provide context and debugging information.
#[derive(Debug)]
pub struct ErrorContext {
    /// The original error that occurred.
    pub error: HuaError,

    /// The component where the error occurred.
    pub component: String,

    /// Additional context information to help with debugging.
    pub details: Option<String>,
}

impl ErrorContext {
    /// Creates a new error context with the given error and component.
    ///
    /// # Arguments
    ///
    /// * `error` - The error that occurred
    /// * `component` - The component where the error occurred
    pub fn new<S: Into<String>>(error: HuaError, component: S) -> Self {
        Self {
            error,
            component: component.into(),
            details: None,
        }
    }

    /// Adds detail information to the error context.
    ///
    /// # Arguments
    ///
    /// * `details` - Additional context information to help with debugging
    pub fn with_details<S: Into<String>>(mut self, details: S) -> Self {
        self.details = Some(details.into());
        self
    }
}

impl Display for ErrorContext {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Error in {}: {}", self.component, self.error)?;
        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }
        Ok(())
    }
}

/// Error reporter trait for reporting errors to various sinks.
pub trait ErrorReporter: Send + Sync + std::fmt::Debug {
    /// Report an error with context.
    fn report(&self, context: ErrorContext);
}

/// A simple error reporter implementation that logs errors using the tracing framework.
#[derive(Default, Debug)]
pub struct TracingErrorReporter;

impl ErrorReporter for TracingErrorReporter {
    fn report(&self, context: ErrorContext) {
        tracing::error!(
            error = %context.error,
            kind = ?context.error.kind(),
            component = %context.component,
            details = context.details.as_deref().unwrap_or("None"),
            "Error reported"
        );
    }
}

/// Process-wide error reporter, set at most once.
static ERROR_REPORTER: OnceCell<Arc<dyn ErrorReporter>> = OnceCell::new();

/// Set the global error reporter.
///
/// Returns `false` if a reporter was already installed; the first one wins.
pub fn set_error_reporter(reporter: Arc<dyn ErrorReporter>) -> bool {
    ERROR_REPORTER.set(reporter).is_ok()
}

/// Report an error with context through the global reporter.
///
/// Falls back to [`TracingErrorReporter`] when none has been installed.
pub fn report(context: ErrorContext) {
    match ERROR_REPORTER.get() {
        Some(reporter) => reporter.report(context),
        None => TracingErrorReporter.report(context),
    }
}
