//! JSON-lines host for a worker.
//!
//! Reads one request per line from any async reader and writes one response
//! per line to any async writer. A line that cannot be used, including one
//! that is not UTF-8, is answered with an `invalidRequest` error and reading
//! continues. Only the end of input stops the host, after every response the
//! worker still owes has been written.

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::DictionaryHandle;
use crate::error::{HuaError, HuaResult};
use crate::protocol::{decode_line, encode_response, Response};

/// Pumps `reader` lines into the worker behind `handle` and its responses
/// into `writer`. Returns the writer once input has ended and the worker has
/// stopped.
pub async fn serve_lines<R, W>(
    reader: R,
    writer: W,
    handle: DictionaryHandle,
    buffer: usize,
) -> HuaResult<W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (requests, mut responses, worker) = handle.into_parts();
    let (out_tx, mut out_rx) = mpsc::channel::<Response>(buffer.max(1));

    let writer = tokio::spawn(async move {
        let mut writer = writer;
        while let Some(response) = out_rx.recv().await {
            let mut line = encode_response(&response);
            line.push('\n');
            writer.write_all(line.as_bytes()).await?;
            writer.flush().await?;
        }
        Ok::<_, std::io::Error>(writer)
    });

    let forward_tx = out_tx.clone();
    let forwarder = tokio::spawn(async move {
        while let Some(response) = responses.recv().await {
            if forward_tx.send(response).await.is_err() {
                break;
            }
        }
    });

    let mut reader = BufReader::new(reader);
    let mut line = Vec::new();
    loop {
        line.clear();
        match reader.read_until(b'\n', &mut line).await {
            Ok(0) => break,
            Ok(_) => {}
            Err(err) => {
                warn!(error = %err, "input failed, shutting down");
                break;
            }
        }

        match decode_line(&line) {
            Ok(Some(request)) => {
                if requests.send(request).await.is_err() {
                    break;
                }
            }
            Ok(None) => {}
            Err(err) => {
                debug!(error = %err, "rejected input line");
                if out_tx.send(Response::error(&err.into())).await.is_err() {
                    break;
                }
            }
        }
    }

    drop(requests);
    let joined = |e: tokio::task::JoinError| HuaError::Internal(format!("host task failed: {e}"));
    forwarder.await.map_err(joined)?;
    worker.await.map_err(joined)?;
    drop(out_tx);

    Ok(writer.await.map_err(joined)??)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HuaConfig;
    use crate::service::DictionaryService;
    use crate::source::MemorySource;
    use serde_json::{json, Value};
    use std::sync::Arc;

    async fn run(input: &[u8], source: MemorySource) -> Vec<Value> {
        let handle = DictionaryService::spawn(&HuaConfig::default(), Arc::new(source));
        let output = serve_lines(input, Vec::new(), handle, 16).await.unwrap();

        String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_invalid_utf8_line_does_not_stop_the_host() {
        let source = MemorySource::new().with_body("mem://w", ["carrot\n"]);
        let input = [
            &br#"{"type":"isPrefix","id":"a","pref":"x"}"#[..],
            b"\n",
            br#"{"type":"contains","id":"b","word":""#,
            b"\xff",
            b"\"}\n",
            br#"{"type":"load","url":"mem://w"}"#,
            b"\n",
        ]
        .concat();

        let output = run(&input, source).await;

        assert_eq!(output.len(), 3);
        assert!(output.contains(&json!({"type": "isPrefix", "id": "a", "result": false})));
        assert!(output.contains(&json!({"type": "loaded", "count": 1})));
        assert!(output
            .iter()
            .any(|r| r["type"] == "error" && r["kind"] == "invalidRequest"));
    }

    #[tokio::test]
    async fn test_queries_after_a_bad_line_are_answered() {
        let source = MemorySource::new().with_body("mem://w", ["carrot\n"]);
        let input = [
            &b"\xfe\xff garbage\n"[..],
            b"\n",
            b"not json\n",
            br#"{"type":"contains","id":"c","word":"Carrot"}"#,
        ]
        .concat();

        let output = run(&input, source).await;

        assert_eq!(output.len(), 3);
        assert_eq!(output[2], json!({"type": "contains", "id": "c", "result": false}));
        assert!(output[..2]
            .iter()
            .all(|r| r["type"] == "error" && r["kind"] == "invalidRequest"));
    }
}
