//! Transport layer for MCP communication.

pub mod framing;
#[cfg(feature = "http")]
pub mod http;
pub mod stream;

#[cfg(feature = "http")]
pub use http::HttpTransport;
pub use stream::StreamTransport;

use tokio::io::DuplexStream;

const DIRECT_BUFFER: usize = 64 * 1024;

/// An in-memory connected pair: serve a router on one end, attach a client to the other.
pub fn direct() -> (DuplexStream, DuplexStream) {
    tokio::io::duplex(DIRECT_BUFFER)
}

/// Resolves on Ctrl-C, or on SIGTERM where supported.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl-C"),
        _ = terminate => tracing::info!("Received SIGTERM"),
    }
}
