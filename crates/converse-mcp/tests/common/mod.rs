//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use serde_json::{json, Value};

use converse_mcp::router::Router;
use converse_mcp::types::*;

/// How many times each callback of the scenario router ran, and with what.
#[derive(Debug, Default)]
pub struct Calls {
    pub greet: AtomicUsize,
    pub read: AtomicUsize,
    pub echo: AtomicUsize,
    pub echo_args: Mutex<Vec<Value>>,
}

impl Calls {
    pub fn total(&self) -> usize {
        self.greet.load(Ordering::SeqCst)
            + self.read.load(Ordering::SeqCst)
            + self.echo.load(Ordering::SeqCst)
    }
}

/// Prompt `greet`, resource `file:///a.txt`, tool `echo`.
pub fn scenario_router() -> (Router, Arc<Calls>) {
    let calls = Arc::new(Calls::default());
    let (greet, read, echo) = (calls.clone(), calls.clone(), calls.clone());

    let router = Router::builder("scenario", "1.2.3")
        .with_prompt(
            Prompt::new("greet").with_argument("name", "Name", "Who to greet", false),
            move |_ctx, params: GetPromptParams| {
                greet.greet.fetch_add(1, Ordering::SeqCst);
                let who = params.argument("name").unwrap_or("world").to_string();
                async move { Ok(GetPromptResult::user_text(format!("Hello, {who}!"))) }
            },
        )
        .with_resource(
            Resource::new("a", "file:///a.txt").with_mime_type("text/plain"),
            move |_ctx, params: ReadResourceParams| {
                read.read.fetch_add(1, Ordering::SeqCst);
                async move {
                    Ok(ReadResourceResult::text(
                        params.uri,
                        Some("text/plain".to_string()),
                        "contents of a",
                    ))
                }
            },
        )
        .with_tool(
            Tool::new("echo").with_input_property("msg", STRING, "message", true),
            move |_ctx, params: CallToolParams| {
                echo.echo.fetch_add(1, Ordering::SeqCst);
                let args = Value::Object(params.arguments.clone().unwrap_or_default());
                if let Ok(mut seen) = echo.echo_args.lock() {
                    seen.push(args.clone());
                }
                async move {
                    let msg = args["msg"].as_str().unwrap_or_default().to_string();
                    Ok(CallToolResult::text(msg))
                }
            },
        )
        .build()
        .expect("scenario router builds");

    (router, calls)
}

/// Build an MCP JSON-RPC request.
pub fn mcp_request(id: i64, method: &str, params: Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": method,
        "params": params
    })
}
