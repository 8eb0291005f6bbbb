//! An in-flight load.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use futures::stream::{self, StreamExt, TryStreamExt};
use tokio::time::Instant;

use crate::error::transport::TransportError;
use crate::error::HuaError;
use crate::ingest::{IngestSettings, IngestionState};
use crate::source::{ByteSource, ChunkStream};

/// What the source produced next.
#[derive(Debug)]
pub(crate) enum LoadEvent {
    /// A chunk of raw bytes.
    Chunk(Bytes),
    /// The source is exhausted.
    Finished,
    /// The source failed or stalled.
    Failed(HuaError),
}

/// A load bound to a source, from the first request until `loaded` or `error`.
pub(crate) struct ActiveLoad {
    pub(crate) url: String,
    pub(crate) state: IngestionState,
    pub(crate) started: Instant,
    chunks: ChunkStream,
    read_timeout: Option<Duration>,
    deadline: Option<Instant>,
}

impl ActiveLoad {
    /// Binds a load to `url`. The source is opened lazily on the first poll,
    /// so the handshake suspends only this load and never the worker.
    pub(crate) fn start(
        source: Arc<dyn ByteSource>,
        url: String,
        settings: IngestSettings,
        read_timeout: Option<Duration>,
    ) -> Self {
        let locator = url.clone();
        let chunks = stream::once(async move { source.open(&locator).await })
            .try_flatten()
            .boxed();

        let mut state = IngestionState::new(settings);
        state.begin();

        let started = Instant::now();
        Self {
            url,
            state,
            started,
            chunks,
            read_timeout,
            deadline: read_timeout.map(|timeout| started + timeout),
        }
    }

    /// Waits for the next chunk, bounded by the read timeout.
    pub(crate) async fn next_event(&mut self) -> LoadEvent {
        let next = match self.deadline {
            Some(deadline) => match tokio::time::timeout_at(deadline, self.chunks.next()).await {
                Ok(next) => next,
                Err(_) => {
                    let millis = self.read_timeout.map_or(0, |t| t.as_millis() as u64);
                    return LoadEvent::Failed(TransportError::Timeout(millis).into());
                }
            },
            None => self.chunks.next().await,
        };

        match next {
            Some(Ok(chunk)) => {
                self.deadline = self.read_timeout.map(|timeout| Instant::now() + timeout);
                LoadEvent::Chunk(chunk)
            }
            Some(Err(err)) => LoadEvent::Failed(err.into()),
            None => LoadEvent::Finished,
        }
    }
}

/// Polls the active load, or never resolves when there is none.
pub(crate) async fn next_load_event(active: &mut Option<ActiveLoad>) -> LoadEvent {
    match active {
        Some(load) => load.next_event().await,
        None => std::future::pending().await,
    }
}
