//! Decode error module.
//!
//! Errors raised by the incremental UTF-8 decoder. Both are fatal to the
//! load in progress.

use thiserror::Error;

/// Errors that can occur while decoding streamed bytes as UTF-8.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// A byte sequence that can never form valid UTF-8.
    #[error("Invalid UTF-8 sequence at byte offset {offset}")]
    InvalidSequence {
        /// Offset of the first offending byte from the start of the stream
        offset: u64,
    },

    /// The stream ended in the middle of a multi-byte character.
    #[error("Stream ended inside a multi-byte character ({pending} dangling bytes)")]
    Truncated {
        /// Number of bytes of the unfinished character
        pending: usize,
    },
}
