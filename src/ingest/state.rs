//! Per-load ingestion state.
//!
//! [`IngestionState`] lives for exactly one load. It owns the decoder, the
//! partial-line buffer and the counters, and feeds every complete line into
//! the trie it is handed. It never touches the transport, which keeps it
//! synchronous and lets the worker interleave queries between chunks.

use std::fmt;

use tracing::{debug, trace};

use crate::config::IngestConfig;
use crate::data_structures::LauTrie;
use crate::error::decode::DecodeError;
use crate::normalize::normalize;

use super::decoder::Utf8StreamDecoder;

/// Highest percentage a progress notification may carry.
const MAX_PROGRESS_PCT: u8 = 99;

/// Lifecycle of a single load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestPhase {
    /// No source bound yet.
    Idle,
    /// Pulling and processing chunks.
    Streaming,
    /// The source is exhausted; the trailing remainder is being flushed.
    Finalizing,
    /// The load completed.
    Done,
    /// The load was aborted.
    Error,
}

impl fmt::Display for IngestPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IngestPhase::Idle => "idle",
            IngestPhase::Streaming => "streaming",
            IngestPhase::Finalizing => "finalizing",
            IngestPhase::Done => "done",
            IngestPhase::Error => "error",
        };
        f.write_str(name)
    }
}

/// A progress notification produced while streaming.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// Lines processed so far
    pub loaded: u64,
    /// Estimated completion percentage, never above 99
    pub pct: u8,
}

/// Final counters of a completed load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadSummary {
    /// Lines processed, as reported in the `loaded` notification
    pub lines: u64,
    /// Lines that normalized to a token
    pub tokens: u64,
    /// Tokens that were new to the trie
    pub inserted: u64,
}

/// Knobs that shape one load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestSettings {
    /// Line count estimate used only for progress percentages
    pub estimated_total: u64,
    /// Number of processed lines between progress checks
    pub progress_interval: u64,
    /// Whether blank lines count as processed
    pub count_blank_lines: bool,
}

impl IngestSettings {
    /// Builds settings from configuration, overriding the estimate when the
    /// request supplied a positive one.
    pub fn from_config(config: &IngestConfig, estimated: Option<u64>) -> Self {
        Self {
            estimated_total: estimated
                .filter(|&n| n > 0)
                .unwrap_or(config.estimated_total)
                .max(1),
            progress_interval: config.progress_interval.max(1),
            count_blank_lines: config.count_blank_lines,
        }
    }
}

impl Default for IngestSettings {
    fn default() -> Self {
        Self::from_config(&IngestConfig::default(), None)
    }
}

/// Transient state of one load.
#[derive(Debug)]
pub struct IngestionState {
    settings: IngestSettings,
    decoder: Utf8StreamDecoder,
    /// Decoded text after the last line terminator
    pending: String,
    processed: u64,
    tokens: u64,
    inserted: u64,
    last_pct: u8,
    phase: IngestPhase,
}

impl IngestionState {
    /// Creates the state for a new load.
    pub fn new(settings: IngestSettings) -> Self {
        Self {
            settings,
            decoder: Utf8StreamDecoder::new(),
            pending: String::new(),
            processed: 0,
            tokens: 0,
            inserted: 0,
            last_pct: 0,
            phase: IngestPhase::Idle,
        }
    }

    /// Returns the current phase.
    pub fn phase(&self) -> IngestPhase {
        self.phase
    }

    /// Marks the source as bound; chunks may now be fed.
    pub fn begin(&mut self) {
        if self.phase == IngestPhase::Idle {
            self.phase = IngestPhase::Streaming;
        }
    }

    /// Decodes one chunk and processes every line it completes.
    ///
    /// Returns the progress notifications due, in line order. On a decode
    /// error the lines completed before the bad byte are still inserted, then
    /// the state moves to [`IngestPhase::Error`]; tokens inserted so far stay
    /// in the trie.
    pub fn feed(&mut self, chunk: &[u8], trie: &mut LauTrie) -> Result<Vec<Progress>, DecodeError> {
        self.begin();

        let decoded = self.decoder.decode(chunk, &mut self.pending);
        let events = self.drain_lines(trie);
        trace!(bytes = chunk.len(), pending = self.pending.len(), "chunk processed");

        if let Err(err) = decoded {
            self.phase = IngestPhase::Error;
            return Err(err);
        }
        Ok(events)
    }

    /// Processes every terminated line in the pending buffer.
    fn drain_lines(&mut self, trie: &mut LauTrie) -> Vec<Progress> {
        let buffer = std::mem::take(&mut self.pending);
        let mut rest = buffer.as_str();
        let mut events = Vec::new();

        while let Some(end) = rest.find('\n') {
            let line = &rest[..end];
            let line = line.strip_suffix('\r').unwrap_or(line);
            if self.accept_line(line, trie) {
                if let Some(progress) = self.progress_due() {
                    events.push(progress);
                }
            }
            rest = &rest[end + 1..];
        }

        self.pending.push_str(rest);
        events
    }

    /// Flushes the unterminated remainder and completes the load.
    ///
    /// The remainder counts as one line only if it is non-blank; no progress
    /// check runs for it.
    pub fn finish(&mut self, trie: &mut LauTrie) -> Result<LoadSummary, DecodeError> {
        self.begin();
        self.phase = IngestPhase::Finalizing;

        if let Err(err) = self.decoder.finish() {
            self.phase = IngestPhase::Error;
            return Err(err);
        }

        let remainder = std::mem::take(&mut self.pending);
        if !remainder.trim().is_empty() {
            self.accept_line(&remainder, trie);
        }

        self.phase = IngestPhase::Done;
        let summary = self.summary();
        debug!(
            lines = summary.lines,
            tokens = summary.tokens,
            inserted = summary.inserted,
            bytes = self.decoder.consumed(),
            "ingestion finished"
        );
        Ok(summary)
    }

    /// Marks the load as aborted.
    pub fn abort(&mut self) {
        self.phase = IngestPhase::Error;
    }

    /// Returns the counters reached so far.
    pub fn summary(&self) -> LoadSummary {
        LoadSummary {
            lines: self.processed,
            tokens: self.tokens,
            inserted: self.inserted,
        }
    }

    /// Processes one line; returns whether it counted as processed.
    fn accept_line(&mut self, raw: &str, trie: &mut LauTrie) -> bool {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            if !self.settings.count_blank_lines {
                return false;
            }
        } else if let Some(token) = normalize(trimmed) {
            self.tokens += 1;
            if trie.insert(&token) {
                self.inserted += 1;
            }
        }

        self.processed += 1;
        true
    }

    fn progress_due(&mut self) -> Option<Progress> {
        if self.processed % self.settings.progress_interval != 0 {
            return None;
        }

        let ratio = self.processed as f64 / self.settings.estimated_total as f64;
        let pct = (ratio * 100.0).round().min(MAX_PROGRESS_PCT as f64) as u8;
        if pct == self.last_pct {
            return None;
        }

        self.last_pct = pct;
        Some(Progress {
            loaded: self.processed,
            pct,
        })
    }
}
