//! Line-delimited stream transport over stdio or any async byte stream.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::protocol::ProtocolHandler;
use crate::router::Router;
use crate::types::{McpError, McpResult};

use super::framing;

/// Default cap on calls running at once per connection.
pub const DEFAULT_MAX_IN_FLIGHT: usize = 64;

/// Serves a [`Router`] over newline-delimited JSON.
///
/// Every non-blank line is one payload. Payloads are handled concurrently and their responses
/// are written as they complete, so responses may come back out of request order. At most
/// `max_in_flight` payloads run at once; the reader stops pulling frames until one finishes.
#[derive(Debug, Clone)]
pub struct StreamTransport {
    handler: ProtocolHandler,
    shutdown: CancellationToken,
    max_in_flight: usize,
}

impl StreamTransport {
    pub fn new(router: Router) -> Self {
        Self {
            handler: ProtocolHandler::new(router),
            shutdown: CancellationToken::new(),
            max_in_flight: DEFAULT_MAX_IN_FLIGHT,
        }
    }

    pub fn with_shutdown(mut self, shutdown: CancellationToken) -> Self {
        self.shutdown = shutdown;
        self
    }

    /// Limit concurrent calls (and queued responses). Zero is treated as one.
    pub fn with_max_in_flight(mut self, max_in_flight: usize) -> Self {
        self.max_in_flight = max_in_flight.max(1);
        self
    }

    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Run over stdin/stdout.
    pub async fn run_stdio(&self) -> McpResult<()> {
        self.serve(tokio::io::stdin(), tokio::io::stdout()).await
    }

    /// Run over a single duplex stream (socket, pipe, in-memory duplex).
    pub async fn serve_stream<S>(&self, io: S) -> McpResult<()>
    where
        S: AsyncRead + AsyncWrite + Send + 'static,
    {
        let (reader, writer) = tokio::io::split(io);
        self.serve(reader, writer).await
    }

    /// Serve until EOF on `reader`, a read error, or the shutdown token firing.
    ///
    /// On EOF or a read error, in-flight calls run to completion. On shutdown, their contexts
    /// are cancelled first. Either way, every response produced is written before this returns.
    /// A read error is returned after that drain.
    pub async fn serve<R, W>(&self, reader: R, writer: W) -> McpResult<()>
    where
        R: AsyncRead + Unpin + Send,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (tx, rx) = mpsc::channel::<String>(self.max_in_flight);
        let writer_task = tokio::spawn(write_frames(writer, rx));

        let permits = Arc::new(Semaphore::new(self.max_in_flight));
        let mut reader = BufReader::new(reader);
        let mut buf = Vec::new();
        let mut in_flight = JoinSet::new();
        let mut failure = None;

        tracing::info!("Stream transport started");

        loop {
            let read = tokio::select! {
                _ = self.shutdown.cancelled() => {
                    tracing::info!("Shutdown requested, cancelling {} in-flight call(s)", in_flight.len());
                    break;
                }
                read = reader.read_until(b'\n', &mut buf) => read,
            };

            match read {
                Ok(0) => {
                    tracing::info!("EOF on input, shutting down");
                    break;
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::error!("Read failed, draining {} in-flight call(s): {e}", in_flight.len());
                    failure = Some(McpError::Io(e));
                    break;
                }
            }
            let frame = std::mem::take(&mut buf);

            while let Some(done) = in_flight.try_join_next() {
                log_join(done);
            }

            if frame.iter().all(u8::is_ascii_whitespace) {
                continue;
            }

            match framing::parse_frame(&frame) {
                Ok(payload) => {
                    let Ok(permit) = permits.clone().acquire_owned().await else {
                        break;
                    };
                    let handler = self.handler.clone();
                    let shutdown = self.shutdown.clone();
                    let tx = tx.clone();
                    in_flight.spawn(async move {
                        if let Some(response) = handler.handle_payload(payload, &shutdown).await {
                            send(&tx, &response).await;
                        }
                        drop(permit);
                    });
                }
                Err(e) => {
                    tracing::warn!("Parse error: {e}");
                    send(&tx, &framing::parse_error_response(&e)).await;
                }
            }
        }

        while let Some(done) = in_flight.join_next().await {
            log_join(done);
        }
        drop(tx);

        writer_task
            .await
            .map_err(|e| McpError::Transport(format!("writer task failed: {e}")))??;
        tracing::info!("Stream transport stopped");
        match failure {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

async fn write_frames<W>(mut writer: W, mut rx: mpsc::Receiver<String>) -> McpResult<()>
where
    W: AsyncWrite + Unpin,
{
    while let Some(frame) = rx.recv().await {
        writer.write_all(frame.as_bytes()).await?;
        writer.flush().await?;
    }
    writer.shutdown().await?;
    Ok(())
}

async fn send(tx: &mpsc::Sender<String>, value: &serde_json::Value) {
    match framing::frame_message(value) {
        Ok(frame) => {
            if tx.send(frame).await.is_err() {
                tracing::debug!("Writer closed, dropping response");
            }
        }
        Err(e) => tracing::error!("Failed to frame response: {e}"),
    }
}

fn log_join(result: Result<(), tokio::task::JoinError>) {
    if let Err(e) = result {
        tracing::error!("Call task failed: {e}");
    }
}
