//! Transport error module.
//!
//! This module defines error types raised while opening or reading the byte
//! source a word list is streamed from.

use std::io;
use thiserror::Error;

/// Errors that can occur while fetching word list bytes.
#[derive(Error, Debug)]
pub enum TransportError {
    /// The source answered with a non-success status.
    #[error("Fetch failed {status}")]
    Status {
        /// The status code returned by the source
        status: u16,
        /// The locator that was requested
        locator: String,
    },

    /// The locator does not name an existing resource.
    #[error("Source not found: {0}")]
    NotFound(String),

    /// The locator could not be interpreted by any source.
    #[error("Unsupported source locator: {0}")]
    UnsupportedLocator(String),

    /// Error while reading from a local file.
    #[error("Read error: {0}")]
    Io(#[from] io::Error),

    /// Error reported by the HTTP client.
    #[error("HTTP transport error: {0}")]
    Http(String),

    /// No chunk arrived within the configured read timeout.
    #[error("Transport timeout after {0} milliseconds")]
    Timeout(u64),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => Self::Status {
                status: status.as_u16(),
                locator: err.url().map(|u| u.to_string()).unwrap_or_default(),
            },
            None => Self::Http(err.to_string()),
        }
    }
}
