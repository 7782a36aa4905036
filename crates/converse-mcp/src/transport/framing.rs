//! Message framing for newline-delimited JSON.

use serde_json::Value;

use crate::types::{McpError, McpResult, RequestId};

/// Parse a single line of text as a JSON payload (one message or a batch).
pub fn parse_message(line: &str) -> McpResult<Value> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Err(McpError::ParseError("Empty message".to_string()));
    }

    serde_json::from_str(trimmed).map_err(|e| McpError::ParseError(e.to_string()))
}

/// Parse one raw frame read off a byte stream. Bytes that are not UTF-8 are a parse error.
pub fn parse_frame(frame: &[u8]) -> McpResult<Value> {
    let line = std::str::from_utf8(frame)
        .map_err(|e| McpError::ParseError(format!("frame is not valid UTF-8: {e}")))?;
    parse_message(line)
}

/// Parse a raw request body.
pub fn parse_bytes(body: &[u8]) -> McpResult<Value> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(McpError::ParseError("Empty message".to_string()));
    }

    serde_json::from_slice(body).map_err(|e| McpError::ParseError(e.to_string()))
}

/// Serialize a value to a JSON line (with trailing newline).
pub fn frame_message(value: &Value) -> McpResult<String> {
    let mut json = serde_json::to_string(value).map_err(McpError::Json)?;
    json.push('\n');
    Ok(json)
}

/// Error response for a payload that could not be parsed at all.
pub fn parse_error_response(error: &McpError) -> Value {
    serde_json::to_value(error.to_json_rpc_error(RequestId::Null)).unwrap_or_default()
}
