//! Error types and JSON-RPC error codes for the MCP server.

use serde_json::{Map, Value};

use super::message::{JsonRpcError, JsonRpcErrorObject, RequestId};
use super::method::{Category, Method};

/// Standard JSON-RPC 2.0 error codes.
pub mod error_codes {
    pub const PARSE_ERROR: i32 = -32700;
    pub const INVALID_REQUEST: i32 = -32600;
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_PARAMS: i32 = -32602;
    pub const INTERNAL_ERROR: i32 = -32603;
}

/// MCP-specific error codes.
pub mod mcp_error_codes {
    pub const RESOURCE_NOT_FOUND: i32 = -32802;
    pub const TOOL_NOT_FOUND: i32 = -32803;
    pub const PROMPT_NOT_FOUND: i32 = -32804;
}

/// Error type returned by user callbacks.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// All errors that can occur while serving or calling an MCP endpoint.
#[derive(thiserror::Error, Debug)]
pub enum McpError {
    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Method not found: {0}")]
    UnknownMethod(String),

    #[error("error while unmarshalling '{method}' request parameters: {source}")]
    InvalidParams {
        method: Method,
        #[source]
        source: serde_json::Error,
    },

    #[error("'{method}': {category} '{key}' does not exist")]
    NotFound {
        method: Method,
        category: Category,
        key: String,
    },

    #[error("'{method}' handler for '{key}' failed: {source}")]
    Handler {
        method: Method,
        key: String,
        #[source]
        source: BoxError,
    },

    #[error("Internal error: {0}")]
    InternalError(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error object received from the remote peer.
    #[error("Remote error {code}: {message}")]
    Remote {
        code: i32,
        message: String,
        data: Option<Value>,
    },
}

impl McpError {
    pub fn code(&self) -> i32 {
        use error_codes::*;
        use mcp_error_codes::*;
        match self {
            McpError::ParseError(_) => PARSE_ERROR,
            McpError::InvalidRequest(_) => INVALID_REQUEST,
            McpError::UnknownMethod(_) => METHOD_NOT_FOUND,
            McpError::InvalidParams { .. } => INVALID_PARAMS,
            McpError::NotFound { category, .. } => match category {
                Category::Prompt => PROMPT_NOT_FOUND,
                Category::Resource => RESOURCE_NOT_FOUND,
                Category::Tool => TOOL_NOT_FOUND,
            },
            McpError::Handler { .. }
            | McpError::InternalError(_)
            | McpError::Transport(_)
            | McpError::Io(_)
            | McpError::Json(_) => INTERNAL_ERROR,
            McpError::Remote { code, .. } => *code,
        }
    }

    /// Machine-readable kind carried in `error.data.kind`.
    pub fn kind(&self) -> &'static str {
        match self {
            McpError::ParseError(_) => "parse_error",
            McpError::InvalidRequest(_) => "invalid_request",
            McpError::UnknownMethod(_) => "unknown_method",
            McpError::InvalidParams { .. } => "decode_error",
            McpError::NotFound { .. } => "not_found",
            McpError::Handler { .. } => "handler_error",
            McpError::InternalError(_)
            | McpError::Transport(_)
            | McpError::Io(_)
            | McpError::Json(_) => "internal_error",
            McpError::Remote { .. } => "remote_error",
        }
    }

    fn data(&self) -> Option<Value> {
        if let McpError::Remote { data, .. } = self {
            return data.clone();
        }
        let mut data = Map::new();
        data.insert("kind".into(), Value::from(self.kind()));
        match self {
            McpError::UnknownMethod(method) => {
                data.insert("method".into(), Value::from(method.as_str()));
            }
            McpError::InvalidParams { method, .. } => {
                data.insert("method".into(), Value::from(method.as_str()));
            }
            McpError::NotFound {
                method,
                category,
                key,
            } => {
                data.insert("method".into(), Value::from(method.as_str()));
                data.insert("category".into(), Value::from(category.as_str()));
                data.insert("key".into(), Value::from(key.as_str()));
            }
            McpError::Handler { method, key, .. } => {
                data.insert("method".into(), Value::from(method.as_str()));
                data.insert("key".into(), Value::from(key.as_str()));
            }
            _ => {}
        }
        Some(Value::Object(data))
    }

    pub fn to_error_object(&self) -> JsonRpcErrorObject {
        let message = match self {
            McpError::Remote { message, .. } => message.clone(),
            other => other.to_string(),
        };
        JsonRpcErrorObject {
            code: self.code(),
            message,
            data: self.data(),
        }
    }

    pub fn to_json_rpc_error(&self, id: RequestId) -> JsonRpcError {
        JsonRpcError::new(id, self.to_error_object())
    }

    /// Rebuild an error from an error object received over the wire.
    pub fn from_error_object(error: JsonRpcErrorObject) -> Self {
        McpError::Remote {
            code: error.code,
            message: error.message,
            data: error.data,
        }
    }

    /// Whether the error came from a specific `(category, key)` lookup miss.
    pub fn is_not_found(&self) -> bool {
        matches!(self, McpError::NotFound { .. })
            || matches!(self, McpError::Remote { data: Some(d), .. } if d["kind"] == "not_found")
    }
}

pub type McpResult<T> = Result<T, McpError>;
