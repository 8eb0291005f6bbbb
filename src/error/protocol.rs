//! Protocol error module.
//!
//! This module defines error types for the message-based front end: parsing
//! request lines and moving messages between the caller and the worker.

use thiserror::Error;

/// Errors that can occur while handling protocol messages.
#[derive(Error, Debug)]
pub enum ProtocolError {
    /// The request could not be parsed.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The worker is no longer accepting requests.
    #[error("Dictionary worker has shut down")]
    WorkerClosed,
}

impl From<serde_json::Error> for ProtocolError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidRequest(err.to_string())
    }
}
