//! Streaming ingestion of newline-delimited word lists.
//!
//! Bytes arrive in arbitrary chunks. [`Utf8StreamDecoder`] turns them into
//! text without assuming chunks end on character boundaries, and
//! [`IngestionState`] splits that text into lines (`\n`, with an optional
//! preceding `\r`), normalizes each line, inserts the resulting tokens into
//! the trie and decides when a progress notification is due.
//!
//! Feeding the same bytes in any chunking produces the same trie and the
//! same line count.

pub mod decoder;
pub mod state;

pub use decoder::Utf8StreamDecoder;
pub use state::{IngestPhase, IngestSettings, IngestionState, LoadSummary, Progress};
