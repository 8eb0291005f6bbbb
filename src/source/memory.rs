//! In-process source.
//!
//! Serves word lists registered up front, canned failure statuses, or a live
//! feed whose chunks are pushed by the caller while a load is running.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::{self, StreamExt};
use tokio::sync::mpsc;

use super::{ByteSource, ChunkStream};
use crate::error::transport::TransportError;

#[derive(Debug)]
enum Entry {
    Body(Vec<Bytes>),
    Status(u16),
    Broken { chunks: Vec<Bytes>, message: String },
    Stalled(Vec<Bytes>),
    Feed(Option<mpsc::UnboundedReceiver<Result<Bytes, TransportError>>>),
}

/// Source backed by an in-memory table of locators.
#[derive(Debug, Default)]
pub struct MemorySource {
    entries: Mutex<HashMap<String, Entry>>,
}

/// Sending half of a live feed registered with [`MemorySource::with_feed`].
///
/// Dropping the feed ends the stream.
#[derive(Debug, Clone)]
pub struct ChunkFeed {
    sender: mpsc::UnboundedSender<Result<Bytes, TransportError>>,
}

impl ChunkFeed {
    /// Pushes the next chunk. Returns `false` once the reader has gone.
    pub fn push(&self, chunk: impl Into<Bytes>) -> bool {
        self.sender.send(Ok(chunk.into())).is_ok()
    }

    /// Fails the stream with a transport error.
    pub fn fail(&self, message: impl Into<String>) -> bool {
        self.sender
            .send(Err(TransportError::Http(message.into())))
            .is_ok()
    }
}

impl MemorySource {
    /// Creates an empty source; every locator is initially not found.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serves `chunks` for `locator`, in order.
    pub fn with_body<I, C>(self, locator: impl Into<String>, chunks: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Bytes>,
    {
        let chunks = chunks.into_iter().map(Into::into).collect();
        self.register(locator, Entry::Body(chunks))
    }

    /// Answers `locator` with a non-success status.
    pub fn with_status(self, locator: impl Into<String>, status: u16) -> Self {
        self.register(locator, Entry::Status(status))
    }

    /// Serves `chunks`, then fails the stream with `message`.
    pub fn with_broken_body<I, C>(self, locator: impl Into<String>, chunks: I, message: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Bytes>,
    {
        let chunks = chunks.into_iter().map(Into::into).collect();
        self.register(
            locator,
            Entry::Broken {
                chunks,
                message: message.into(),
            },
        )
    }

    /// Serves `chunks`, then never produces another chunk or ends.
    pub fn with_stalled_body<I, C>(self, locator: impl Into<String>, chunks: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Bytes>,
    {
        let chunks = chunks.into_iter().map(Into::into).collect();
        self.register(locator, Entry::Stalled(chunks))
    }

    /// Registers a live feed for `locator`. The feed can be opened once.
    pub fn with_feed(self, locator: impl Into<String>) -> (Self, ChunkFeed) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (self.register(locator, Entry::Feed(Some(receiver))), ChunkFeed { sender })
    }

    fn register(self, locator: impl Into<String>, entry: Entry) -> Self {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(locator.into(), entry);
        self
    }
}

#[async_trait]
impl ByteSource for MemorySource {
    async fn open(&self, locator: &str) -> Result<ChunkStream, TransportError> {
        let mut entries = self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let entry = entries
            .get_mut(locator)
            .ok_or_else(|| TransportError::NotFound(locator.to_string()))?;

        let chunks = match entry {
            Entry::Body(chunks) => stream::iter(chunks.clone().into_iter().map(Ok)).boxed(),
            Entry::Status(status) => {
                return Err(TransportError::Status {
                    status: *status,
                    locator: locator.to_string(),
                })
            }
            Entry::Broken { chunks, message } => {
                let failure = TransportError::Http(message.clone());
                stream::iter(chunks.clone().into_iter().map(Ok))
                    .chain(stream::once(async move { Err(failure) }))
                    .boxed()
            }
            Entry::Stalled(chunks) => stream::iter(chunks.clone().into_iter().map(Ok))
                .chain(stream::pending())
                .boxed(),
            Entry::Feed(receiver) => {
                let receiver = receiver
                    .take()
                    .ok_or_else(|| TransportError::Http(format!("feed {locator} already consumed")))?;
                stream::unfold(receiver, |mut receiver| async move {
                    receiver.recv().await.map(|item| (item, receiver))
                })
                .boxed()
            }
        };

        Ok(chunks)
    }
}
