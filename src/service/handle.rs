//! Caller-side handle to a spawned worker.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::protocol::ProtocolError;
use crate::error::{HuaError, HuaResult};
use crate::protocol::{Request, Response};

/// Sends requests to a dictionary worker and receives its responses.
///
/// Responses arrive in the order the worker produced them: query answers in
/// request order, possibly interleaved with load notifications.
#[derive(Debug)]
pub struct DictionaryHandle {
    requests: mpsc::Sender<Request>,
    responses: mpsc::Receiver<Response>,
    worker: JoinHandle<()>,
}

impl DictionaryHandle {
    pub(crate) fn new(
        requests: mpsc::Sender<Request>,
        responses: mpsc::Receiver<Response>,
        worker: JoinHandle<()>,
    ) -> Self {
        Self {
            requests,
            responses,
            worker,
        }
    }

    /// Queues a request for the worker.
    pub async fn send(&self, request: Request) -> HuaResult<()> {
        self.requests
            .send(request)
            .await
            .map_err(|_| ProtocolError::WorkerClosed.into())
    }

    /// Waits for the next response. `None` once the worker has stopped.
    pub async fn recv(&mut self) -> Option<Response> {
        self.responses.recv().await
    }

    /// Splits the handle into its request sender, response receiver and
    /// worker task.
    pub fn into_parts(self) -> (mpsc::Sender<Request>, mpsc::Receiver<Response>, JoinHandle<()>) {
        (self.requests, self.responses, self.worker)
    }

    /// Stops accepting requests, lets any active load finish, and returns
    /// every response produced from here on.
    pub async fn close(self) -> HuaResult<Vec<Response>> {
        let Self {
            requests,
            mut responses,
            worker,
        } = self;
        drop(requests);

        let mut remaining = Vec::new();
        while let Some(response) = responses.recv().await {
            remaining.push(response);
        }

        worker
            .await
            .map_err(|e| HuaError::Internal(format!("dictionary worker failed: {e}")))?;
        Ok(remaining)
    }
}
