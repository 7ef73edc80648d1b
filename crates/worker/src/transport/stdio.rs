//! Newline-delimited JSON transport
//!
//! One request per input line, one response per output line. Logging goes
//! elsewhere so the output stays a clean protocol channel.

use crate::handler::ClusterService;
use crate::protocol::{Request, Response, decode_request};
use crate::worker::spawn_worker;
use futures::{SinkExt, StreamExt};
use std::future::Future;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::mpsc;
use tokio_util::codec::{FramedRead, FramedWrite, LinesCodec, LinesCodecError};
use tracing::{debug, error, info, warn};

/// Longest accepted input line in bytes
pub const MAX_LINE_LENGTH: usize = 256 * 1024 * 1024;

/// Serve requests from `reader` until it closes or `shutdown` resolves.
///
/// Requests already accepted are answered before this returns.
pub async fn run_stdio<R, W>(
    service: ClusterService,
    queue_capacity: usize,
    reader: R,
    writer: W,
    shutdown: impl Future<Output = ()> + Send,
) -> anyhow::Result<()>
where
    R: AsyncRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (responses_tx, mut responses_rx) = mpsc::channel::<Response>(queue_capacity.max(1));
    let (requests, dispatcher) = spawn_worker(service, queue_capacity, responses_tx.clone());

    let writer_task = tokio::spawn(async move {
        let mut sink = FramedWrite::new(writer, LinesCodec::new());
        while let Some(response) = responses_rx.recv().await {
            let line = serde_json::to_string(&response)?;
            sink.send(line).await?;
        }
        Ok::<(), anyhow::Error>(())
    });

    let mut lines = FramedRead::new(reader, LinesCodec::new_with_max_length(MAX_LINE_LENGTH));
    tokio::pin!(shutdown);
    info!("Cluster worker reading requests");

    let mut read_error = None;
    loop {
        tokio::select! {
            line = lines.next() => match line {
                Some(Ok(line)) => {
                    if line.trim().is_empty() {
                        continue;
                    }
                    match decode_request(&line) {
                        Ok(Request::Unknown) => warn!("Ignoring message with unknown type"),
                        Ok(request) => {
                            if requests.send(request).await.is_err() {
                                error!("Worker stopped accepting requests");
                                break;
                            }
                        }
                        Err(e) => match e.id {
                            Some(id) => {
                                warn!("Rejecting request {}: {}", id, e.message);
                                let _ = responses_tx.send(Response::error(id, e.message)).await;
                            }
                            None => warn!("Ignoring undecodable message: {}", e.message),
                        },
                    }
                }
                Some(Err(LinesCodecError::MaxLineLengthExceeded)) => {
                    warn!("Dropping message longer than {} bytes", MAX_LINE_LENGTH);
                }
                Some(Err(LinesCodecError::Io(e))) => {
                    error!("Failed to read input: {}", e);
                    read_error = Some(e);
                    break;
                }
                None => {
                    debug!("Input closed");
                    break;
                }
            },
            _ = &mut shutdown => {
                info!("Shutdown signal received, stopping worker...");
                break;
            }
        }
    }

    drop(requests);
    drop(responses_tx);
    if let Err(e) = dispatcher.await {
        error!("Dispatcher failed: {}", e);
    }
    writer_task.await??;

    match read_error {
        Some(e) => Err(e.into()),
        None => Ok(()),
    }
}
