//! Tracing setup. Logs go to stderr so stdout stays a clean protocol channel.

use tracing_subscriber::EnvFilter;

/// Build the filter: `RUST_LOG` wins over the given default level.
pub fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Install the global subscriber. Safe to call more than once; later calls are no-ops.
pub fn init_logging(default_level: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(default_level))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(feature = "http")]
pub use middleware::request_logging_middleware;

#[cfg(feature = "http")]
mod middleware {
    use std::time::Instant;

    use axum::{extract::Request, middleware::Next, response::Response};

    /// Logs every HTTP request at debug level.
    pub async fn request_logging_middleware(request: Request, next: Next) -> Response {
        let method = request.method().clone();
        let uri = request.uri().clone();
        let started_at = Instant::now();

        let response = next.run(request).await;

        tracing::debug!(
            method = %method,
            uri = %uri,
            status = response.status().as_u16(),
            duration_ms = started_at.elapsed().as_millis() as u64,
            "HTTP request"
        );

        response
    }
}
