//! JSON-RPC 2.0 message types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const JSONRPC_VERSION: &str = "2.0";

/// Request identifier: a string, a number, or null.
///
/// Numbers are kept as written (signed, unsigned or fractional) so they echo back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestId {
    String(String),
    Number(serde_json::Number),
    Null,
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestId::String(s) => write!(f, "{s}"),
            RequestId::Number(n) => write!(f, "{n}"),
            RequestId::Null => write!(f, "null"),
        }
    }
}

impl From<i64> for RequestId {
    fn from(n: i64) -> Self {
        RequestId::Number(n.into())
    }
}

impl From<&str> for RequestId {
    fn from(s: &str) -> Self {
        RequestId::String(s.to_string())
    }
}

impl RequestId {
    /// Whether `value` may appear as an `id`.
    pub fn is_valid(value: &Value) -> bool {
        value.is_string() || value.is_number() || value.is_null()
    }

    /// Best-effort id recovery from a payload that failed to decode as a message.
    pub fn from_payload(payload: &Value) -> Self {
        match payload.get("id") {
            Some(Value::String(s)) => RequestId::String(s.clone()),
            Some(Value::Number(n)) => RequestId::Number(n.clone()),
            _ => RequestId::Null,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub id: RequestId,
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    pub id: RequestId,
    pub result: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub jsonrpc: String,
    pub id: RequestId,
    pub error: JsonRpcErrorObject,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcErrorObject {
    pub code: i32,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// A message without an id; the receiver never answers it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcNotification {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

/// Any single JSON-RPC message. Variant order matters for untagged decoding.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JsonRpcMessage {
    Request(JsonRpcRequest),
    Response(JsonRpcResponse),
    Error(JsonRpcError),
    Notification(JsonRpcNotification),
}

impl JsonRpcRequest {
    pub fn new(id: RequestId, method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            method: method.into(),
            params,
        }
    }
}

impl JsonRpcResponse {
    pub fn new(id: RequestId, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result,
        }
    }
}

impl JsonRpcError {
    pub fn new(id: RequestId, error: JsonRpcErrorObject) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            error,
        }
    }
}

impl JsonRpcNotification {
    pub fn new(method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            method: method.into(),
            params,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_untagged_decoding_picks_the_right_variant() {
        let request: JsonRpcMessage =
            serde_json::from_value(json!({"jsonrpc": "2.0", "id": 1, "method": "tools/list"}))
                .unwrap();
        assert!(matches!(request, JsonRpcMessage::Request(_)));

        let notification: JsonRpcMessage = serde_json::from_value(
            json!({"jsonrpc": "2.0", "method": "notifications/initialized"}),
        )
        .unwrap();
        assert!(matches!(notification, JsonRpcMessage::Notification(_)));

        let response: JsonRpcMessage =
            serde_json::from_value(json!({"jsonrpc": "2.0", "id": "a", "result": {}})).unwrap();
        assert!(matches!(response, JsonRpcMessage::Response(_)));

        let error: JsonRpcMessage = serde_json::from_value(json!({
            "jsonrpc": "2.0", "id": null, "error": {"code": -32601, "message": "nope"}
        }))
        .unwrap();
        assert!(matches!(error, JsonRpcMessage::Error(_)));
    }

    #[test]
    fn test_any_json_number_is_a_request_id() {
        for id in [json!(1.5), json!(u64::MAX), json!(-3)] {
            let message: JsonRpcMessage =
                serde_json::from_value(json!({"jsonrpc": "2.0", "id": id.clone(), "method": "tools/list"}))
                    .unwrap();
            let JsonRpcMessage::Request(request) = message else {
                panic!("id {id} did not decode as a request");
            };
            assert_eq!(serde_json::to_value(&request.id).unwrap(), id);
        }
        assert!(!RequestId::is_valid(&json!(true)));
        assert!(!RequestId::is_valid(&json!({"a": 1})));
        assert!(RequestId::is_valid(&json!(null)));
    }

    #[test]
    fn test_id_recovery_from_payload() {
        assert_eq!(RequestId::from_payload(&json!({"id": 7})), RequestId::from(7));
        assert_eq!(
            RequestId::from_payload(&json!({"id": u64::MAX})).to_string(),
            "18446744073709551615"
        );
        assert_eq!(
            RequestId::from_payload(&json!({"id": "x"})),
            RequestId::String("x".to_string())
        );
        assert_eq!(RequestId::from_payload(&json!({"id": [1]})), RequestId::Null);
        assert_eq!(RequestId::from_payload(&json!("not an object")), RequestId::Null);
    }
}
