//! The dictionary worker.
//!
//! One task owns the trie and handles everything: request messages, chunk
//! arrivals, and the resulting notifications. Suspension happens only while
//! waiting for the next request or the next chunk. Inserting a chunk's
//! lines and answering a query both run to completion without awaiting, so
//! a query always sees the trie between two chunks and never in the middle
//! of an insertion.
//!
//! Only one load may stream at a time; a second `load` is refused with a
//! `busy` error while the first continues.

mod handle;
mod lines;
mod load;

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::config::{HuaConfig, IngestConfig};
use crate::data_structures::LauTrie;
use crate::error::{self, ErrorContext, HuaError};
use crate::ingest::IngestSettings;
use crate::protocol::{Query, QueryDispatcher, Request, Response};
use crate::source::ByteSource;

pub use handle::DictionaryHandle;
pub use lines::serve_lines;
use load::{next_load_event, ActiveLoad, LoadEvent};

/// The worker state: the trie, the source it loads from, and the outbound
/// response channel.
pub struct DictionaryService {
    trie: LauTrie,
    source: Arc<dyn ByteSource>,
    dispatcher: QueryDispatcher,
    config: IngestConfig,
    responses: mpsc::Sender<Response>,
}

impl DictionaryService {
    /// Creates a worker with an empty trie.
    pub fn new(config: IngestConfig, source: Arc<dyn ByteSource>, responses: mpsc::Sender<Response>) -> Self {
        Self {
            trie: LauTrie::new(),
            source,
            dispatcher: QueryDispatcher::new(),
            config,
            responses,
        }
    }

    /// Spawns a worker on the current runtime and returns the caller's handle.
    pub fn spawn(config: &HuaConfig, source: Arc<dyn ByteSource>) -> DictionaryHandle {
        let (request_tx, request_rx) = mpsc::channel(config.service.request_buffer);
        let (response_tx, response_rx) = mpsc::channel(config.service.response_buffer);

        let service = Self::new(config.ingest.clone(), source, response_tx);
        let worker = tokio::spawn(service.run(request_rx));

        DictionaryHandle::new(request_tx, response_rx, worker)
    }

    /// Returns the trie built so far.
    pub fn trie(&self) -> &LauTrie {
        &self.trie
    }

    /// Runs until the request channel closes and any active load has ended,
    /// or until nobody is listening for responses.
    pub async fn run(mut self, mut requests: mpsc::Receiver<Request>) {
        let mut active: Option<ActiveLoad> = None;
        let mut accepting = true;

        debug!("dictionary worker started");

        loop {
            if self.responses.is_closed() || (!accepting && active.is_none()) {
                break;
            }

            tokio::select! {
                request = requests.recv(), if accepting => match request {
                    Some(request) => self.handle_request(request, &mut active).await,
                    None => accepting = false,
                },
                event = next_load_event(&mut active), if active.is_some() => {
                    self.handle_load_event(event, &mut active).await;
                }
            }
        }

        debug!(words = self.trie.len(), "dictionary worker stopped");
    }

    async fn handle_request(&mut self, request: Request, active: &mut Option<ActiveLoad>) {
        match request {
            Request::Load { url, estimated } => self.start_load(url, estimated, active).await,
            request => {
                if let Some(query) = request.into_query() {
                    self.answer(query).await;
                }
            }
        }
    }

    async fn start_load(&mut self, url: Option<String>, estimated: Option<u64>, active: &mut Option<ActiveLoad>) {
        let url = url
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| self.config.default_url.clone());

        if let Some(load) = active.as_ref() {
            warn!(requested = %url, active = %load.url, "load refused while another is streaming");
            let err = HuaError::Busy {
                active: load.url.clone(),
            };
            self.emit(Response::error(&err)).await;
            return;
        }

        let settings = IngestSettings::from_config(&self.config, estimated);
        info!(url = %url, estimated = settings.estimated_total, "load started");

        *active = Some(ActiveLoad::start(
            Arc::clone(&self.source),
            url,
            settings,
            self.config.read_timeout(),
        ));
    }

    async fn answer(&mut self, query: Query) {
        let dispatcher = self.dispatcher;
        let trie = &self.trie;
        let response = match guarded(|| dispatcher.dispatch(trie, query)) {
            Ok(response) => response,
            Err(err) => Response::error(&err),
        };
        self.emit(response).await;
    }

    async fn handle_load_event(&mut self, event: LoadEvent, active: &mut Option<ActiveLoad>) {
        let Some(load) = active.as_mut() else { return };

        match event {
            LoadEvent::Chunk(chunk) => {
                let trie = &mut self.trie;
                match guarded(|| load.state.feed(&chunk, trie)) {
                    Ok(Ok(events)) => {
                        for progress in events {
                            debug!(loaded = progress.loaded, pct = progress.pct, "load progress");
                            self.emit(progress.into()).await;
                        }
                    }
                    Ok(Err(err)) => self.fail(active, err.into()).await,
                    Err(err) => self.fail(active, err).await,
                }
            }
            LoadEvent::Finished => {
                let trie = &mut self.trie;
                match guarded(|| load.state.finish(trie)) {
                    Ok(Ok(summary)) => {
                        info!(
                            url = %load.url,
                            lines = summary.lines,
                            tokens = summary.tokens,
                            inserted = summary.inserted,
                            words = self.trie.len(),
                            elapsed_ms = load.started.elapsed().as_millis() as u64,
                            "load complete"
                        );
                        *active = None;
                        self.emit(Response::Loaded {
                            count: summary.lines,
                        })
                        .await;
                    }
                    Ok(Err(err)) => self.fail(active, err.into()).await,
                    Err(err) => self.fail(active, err).await,
                }
            }
            LoadEvent::Failed(err) => self.fail(active, err).await,
        }
    }

    /// Aborts the active load. Tokens inserted so far stay queryable.
    async fn fail(&mut self, active: &mut Option<ActiveLoad>, err: HuaError) {
        let response = Response::error(&err);

        if let Some(mut load) = active.take() {
            load.state.abort();
            let summary = load.state.summary();
            error::report(
                ErrorContext::new(err, "ingest").with_details(format!(
                    "url={} lines={} phase={}",
                    load.url,
                    summary.lines,
                    load.state.phase()
                )),
            );
        }

        self.emit(response).await;
    }

    async fn emit(&self, response: Response) {
        if self.responses.send(response).await.is_err() {
            debug!("response receiver dropped");
        }
    }
}

/// Runs `operation`, turning a panic into an internal error.
fn guarded<T>(operation: impl FnOnce() -> T) -> Result<T, HuaError> {
    std::panic::catch_unwind(AssertUnwindSafe(operation))
        .map_err(|payload| HuaError::Internal(panic_message(payload.as_ref())))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
