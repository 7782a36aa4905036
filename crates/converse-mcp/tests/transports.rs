//! The same router behaviour, driven through the stream bridge and the HTTP bridge.

#![cfg(feature = "http")]

mod common;

use std::io::Write;
use std::sync::atomic::Ordering;
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use converse_mcp::client::Client;
use converse_mcp::transport::{direct, HttpTransport, StreamTransport};
use converse_mcp::types::*;

use common::{mcp_request, scenario_router, Calls};

async fn assert_scenario(client: &Client, calls: &Calls) {
    let init = client.initialize().await.unwrap();
    assert_eq!(init.protocol_version, MCP_VERSION);
    assert_eq!(init.server_info.name, "scenario");
    assert!(init.capabilities.prompts.list_changed);
    assert!(init.capabilities.resources.list_changed);
    assert!(init.capabilities.tools.list_changed);

    let tools = client.list_tools().await.unwrap();
    assert_eq!(tools.len(), 1);
    assert_eq!(tools[0].name, "echo");

    let mut args = serde_json::Map::new();
    args.insert("msg".into(), json!("hi"));
    let result = client
        .call_tool(&CallToolParams::new("echo").with_arguments(args))
        .await
        .unwrap();
    assert_eq!(result, CallToolResult::text("hi"));
    assert_eq!(calls.echo.load(Ordering::SeqCst), 1);

    let err = client
        .call_tool(&CallToolParams::new("missing"))
        .await
        .unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.code(), -32803);
    assert!(err.to_string().contains("missing"));

    let err = client.call("prompts/delete", None).await.unwrap_err();
    assert_eq!(err.code(), -32601);

    let err = client
        .call("tools/call", Some(json!({"name": 1})))
        .await
        .unwrap_err();
    assert_eq!(err.code(), -32602);

    let prompt = client
        .get_prompt(&GetPromptParams::new("greet").with_argument("name", "Ada"))
        .await
        .unwrap();
    assert_eq!(prompt.messages[0].content.as_text(), Some("Hello, Ada!"));

    let resources = client.list_resources().await.unwrap();
    assert_eq!(resources[0].uri, "file:///a.txt");
    let contents = client.read_resource("file:///a.txt").await.unwrap();
    assert_eq!(contents.contents[0].text.as_deref(), Some("contents of a"));

    assert_eq!(calls.total(), 3);
}

// ─────────────────────── stream bridge ───────────────────────

#[tokio::test]
async fn stream_bridge_matches_router_behaviour() {
    let (router, calls) = scenario_router();
    let (client_io, server_io) = direct();
    let server = tokio::spawn(async move { StreamTransport::new(router).serve_stream(server_io).await });

    let client = Client::from_stream(client_io);
    client.notify("notifications/initialized", None).await.unwrap();
    assert_scenario(&client, &calls).await;

    drop(client);
    server.await.unwrap().unwrap();
}

#[tokio::test]
async fn stream_bridge_stops_on_shutdown() {
    let (router, _) = scenario_router();
    let (client_io, server_io) = direct();
    let transport = StreamTransport::new(router);
    let shutdown = transport.shutdown_token();
    let server = tokio::spawn(async move { transport.serve_stream(server_io).await });

    let client = Client::from_stream(client_io);
    client.initialize().await.unwrap();

    shutdown.cancel();
    server.await.unwrap().unwrap();
    assert!(client.initialize().await.is_err());
}

// ─────────────────────── HTTP bridge ───────────────────────

async fn post(app: axum::Router, body: impl Into<Body>) -> (StatusCode, Vec<u8>) {
    let response = app
        .oneshot(
            Request::builder()
                .uri("/mcp")
                .method("POST")
                .header("content-type", "application/json")
                .body(body.into())
                .expect("request build"),
        )
        .await
        .expect("request execution");
    let status = response.status();
    let body = response
        .into_body()
        .collect()
        .await
        .expect("collect body")
        .to_bytes();
    (status, body.to_vec())
}

fn json_body(bytes: &[u8]) -> Value {
    serde_json::from_slice(bytes).expect("json body")
}

#[tokio::test]
async fn http_bridge_matches_router_behaviour() {
    let (router, calls) = scenario_router();
    let transport = HttpTransport::new(router);
    let shutdown = transport.shutdown_token();

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tokio::spawn(async move { transport.serve(listener).await });

    let http = reqwest::Client::builder().no_proxy().build().unwrap();
    let client = Client::from_url_with(&format!("http://{addr}/mcp"), http).unwrap();
    client.notify("notifications/initialized", None).await.unwrap();
    assert_scenario(&client, &calls).await;

    shutdown.cancel();
    server.await.unwrap().unwrap();
}

#[tokio::test]
async fn http_request_gets_json_response() {
    let (router, _) = scenario_router();
    let app = HttpTransport::new(router).app();
    let (status, body) = post(app, mcp_request(1, "tools/list", json!({})).to_string()).await;
    assert_eq!(status, StatusCode::OK);
    let body = json_body(&body);
    assert_eq!(body["id"], 1);
    assert_eq!(body["result"]["tools"][0]["name"], "echo");
}

#[tokio::test]
async fn http_notification_is_accepted_without_body() {
    let (router, _) = scenario_router();
    let app = HttpTransport::new(router).app();
    let (status, body) = post(
        app,
        json!({"jsonrpc": "2.0", "method": "notifications/initialized"}).to_string(),
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert!(body.is_empty());
}

#[tokio::test]
async fn http_parse_error_is_reported_in_body() {
    let (router, calls) = scenario_router();
    let app = HttpTransport::new(router).app();
    let (status, body) = post(app, "{\"jsonrpc\":").await;
    assert_eq!(status, StatusCode::OK);
    let body = json_body(&body);
    assert_eq!(body["id"], Value::Null);
    assert_eq!(body["error"]["code"], -32700);
    assert_eq!(calls.total(), 0);
}

#[tokio::test]
async fn http_batch_keeps_order() {
    let (router, _) = scenario_router();
    let app = HttpTransport::new(router).app();
    let batch = json!([
        mcp_request(1, "tools/call", json!({"name": "echo", "arguments": {"msg": "one"}})),
        mcp_request(2, "tools/call", json!({"name": "missing"})),
        {"jsonrpc": "2.0", "method": "notifications/initialized"},
        mcp_request(3, "initialize", json!({}))
    ]);
    let (status, body) = post(app, batch.to_string()).await;
    assert_eq!(status, StatusCode::OK);
    let body = json_body(&body);
    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 3);
    assert_eq!(items[0]["result"]["content"][0]["text"], "one");
    assert_eq!(items[1]["error"]["code"], -32803);
    assert_eq!(items[1]["error"]["data"]["key"], "missing");
    assert_eq!(items[2]["result"]["serverInfo"]["version"], "1.2.3");
}

#[tokio::test]
async fn http_health_reports_ok() {
    let (router, _) = scenario_router();
    let response = HttpTransport::new(router)
        .app()
        .oneshot(
            Request::builder()
                .uri("/_health")
                .method("GET")
                .body(Body::empty())
                .expect("request build"),
        )
        .await
        .expect("request execution");
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(
        json_body(&body),
        json!({"status": "ok", "name": "scenario", "version": "1.2.3"})
    );
}

#[tokio::test]
async fn http_cors_is_opt_in() {
    let request = || {
        Request::builder()
            .uri("/_health")
            .method("GET")
            .header("origin", "http://example.com")
            .body(Body::empty())
            .expect("request build")
    };

    let (router, _) = scenario_router();
    let response = HttpTransport::new(router.clone()).app().oneshot(request()).await.unwrap();
    assert!(response.headers().get("access-control-allow-origin").is_none());

    let response = HttpTransport::new(router)
        .with_cors(true)
        .app()
        .oneshot(request())
        .await
        .unwrap();
    assert_eq!(response.headers()["access-control-allow-origin"], "*");
}

#[tokio::test]
async fn http_get_on_mcp_is_not_allowed() {
    let (router, _) = scenario_router();
    let response = HttpTransport::new(router)
        .app()
        .oneshot(Request::builder().uri("/mcp").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

// ─────────────────────── request logging ───────────────────────

#[derive(Clone, Default)]
struct Capture(Arc<Mutex<Vec<u8>>>);

impl Write for Capture {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl Capture {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

async fn logged_health_request(level: tracing::Level) -> String {
    let capture = Capture::default();
    let writer = capture.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let (router, _) = scenario_router();
    HttpTransport::new(router)
        .app()
        .oneshot(Request::builder().uri("/_health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    capture.contents()
}

#[tokio::test]
async fn http_requests_are_logged_at_debug() {
    let logs = logged_health_request(tracing::Level::DEBUG).await;
    assert!(logs.contains("HTTP request"), "logs: {logs}");
    assert!(logs.contains("/_health"), "logs: {logs}");

    let logs = logged_health_request(tracing::Level::INFO).await;
    assert!(!logs.contains("HTTP request"), "logs: {logs}");
}
