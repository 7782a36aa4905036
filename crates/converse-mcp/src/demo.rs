//! The router served by the `converse-mcp` binary.

use serde_json::{json, Value};

use crate::router::{BuildError, Router};
use crate::types::*;

pub const README_URI: &str = "converse://readme";

const README: &str = "Converse MCP demo server.\n\n\
Prompts: greet\nResources: converse://readme\nTools: echo\n";

/// One prompt, one resource and one tool.
pub fn demo_router(name: &str, version: &str) -> Result<Router, BuildError> {
    Router::builder(name, version)
        .with_prompt(
            Prompt::new("greet")
                .with_title("Greeting")
                .with_description("Greets someone by name")
                .with_argument("name", "Name", "Who to greet", true),
            |_ctx, params: GetPromptParams| async move {
                let who = params.argument("name").unwrap_or("world").to_string();
                Ok(GetPromptResult::user_text(format!("Hello, {who}!"))
                    .with_description("A friendly greeting"))
            },
        )
        .with_resource(
            Resource::new("readme", README_URI)
                .with_description("What this server offers")
                .with_mime_type("text/plain")
                .with_size(README.len() as u64),
            |_ctx, params: ReadResourceParams| async move {
                Ok(ReadResourceResult::text(
                    params.uri,
                    Some("text/plain".to_string()),
                    README,
                ))
            },
        )
        .with_tool(
            Tool::new("echo")
                .with_description("Echoes its input back")
                .with_input_property("msg", STRING, "The message to echo", true)
                .with_output_property("msg", STRING, "The echoed message", true)
                .with_read_only_hint(true),
            |_ctx, params: CallToolParams| async move {
                let msg = match params.argument("msg") {
                    Some(Value::String(msg)) => msg.clone(),
                    Some(other) => return Err(BoxError::from(format!("'msg' must be a string, got {other}"))),
                    None => return Ok(CallToolResult::error("missing 'msg' argument")),
                };
                Ok(CallToolResult::text(msg.clone())
                    .with_structured_content(json!({ "msg": msg })))
            },
        )
        .build()
}
