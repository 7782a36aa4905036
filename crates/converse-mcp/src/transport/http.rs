//! HTTP transport: `POST /mcp` request/response bridge plus `GET /_health`.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Json as AxumJson, Response},
    routing::{get, post},
};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;

use crate::logging::request_logging_middleware;
use crate::protocol::ProtocolHandler;
use crate::router::Router;
use crate::types::{McpError, McpResult};

use super::framing;

struct ServerState {
    handler: ProtocolHandler,
    shutdown: CancellationToken,
}

/// Serves a [`Router`] over HTTP. Each request body is one JSON-RPC payload.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    handler: ProtocolHandler,
    shutdown: CancellationToken,
    cors: bool,
}

impl HttpTransport {
    pub fn new(router: Router) -> Self {
        Self {
            handler: ProtocolHandler::new(router),
            shutdown: CancellationToken::new(),
            cors: false,
        }
    }

    pub fn with_shutdown(mut self, shutdown: CancellationToken) -> Self {
        self.shutdown = shutdown;
        self
    }

    /// Allow cross-origin requests from any origin.
    pub fn with_cors(mut self, enabled: bool) -> Self {
        self.cors = enabled;
        self
    }

    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    pub fn app(&self) -> axum::Router {
        let state = Arc::new(ServerState {
            handler: self.handler.clone(),
            shutdown: self.shutdown.clone(),
        });

        let app = axum::Router::new()
            .route("/mcp", post(handle_request))
            .route("/_health", get(handle_health))
            .layer(middleware::from_fn(request_logging_middleware))
            .with_state(state);

        if self.cors {
            app.layer(CorsLayer::permissive())
        } else {
            app
        }
    }

    /// Serve on an already bound listener until the shutdown token fires.
    pub async fn serve(&self, listener: TcpListener) -> McpResult<()> {
        let addr = listener.local_addr()?;
        tracing::info!("HTTP transport listening on {addr}");

        let shutdown = self.shutdown.clone();
        axum::serve(listener, self.app())
            .with_graceful_shutdown(async move { shutdown.cancelled().await })
            .await
            .map_err(|e| McpError::Transport(e.to_string()))?;

        tracing::info!("HTTP transport stopped");
        Ok(())
    }

    /// Bind `addr` and serve.
    pub async fn run(&self, addr: SocketAddr) -> McpResult<()> {
        let listener = TcpListener::bind(addr).await?;
        self.serve(listener).await
    }
}

/// `POST /mcp`. Protocol errors are reported in the body with status 200; a payload that
/// yields no response (notifications only) gets `202 Accepted`.
async fn handle_request(State(state): State<Arc<ServerState>>, body: Bytes) -> Response {
    let payload = match framing::parse_bytes(&body) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::warn!("Parse error: {e}");
            return AxumJson(framing::parse_error_response(&e)).into_response();
        }
    };

    // Dropping this future (client disconnect) cancels the calls it started.
    let cancellation = state.shutdown.child_token();
    let guard = cancellation.clone().drop_guard();
    let response = state.handler.handle_payload(payload, &cancellation).await;
    guard.disarm();

    match response {
        Some(value) => AxumJson(value).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}

async fn handle_health(State(state): State<Arc<ServerState>>) -> AxumJson<Value> {
    let info = state.handler.router().server_info();
    AxumJson(json!({
        "status": "ok",
        "name": info.name,
        "version": info.version,
    }))
}
