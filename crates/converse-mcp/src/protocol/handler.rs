//! Request handling shared by every transport: envelope decoding, validation, batching and
//! dispatch into the [`Router`].

use std::panic::AssertUnwindSafe;

use futures::future::join_all;
use futures::FutureExt;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::router::{CallContext, Router};
use crate::types::*;

use super::validator::{validate_notification, validate_request};

/// Turns inbound JSON-RPC payloads into outbound ones.
#[derive(Debug, Clone)]
pub struct ProtocolHandler {
    router: Router,
}

impl ProtocolHandler {
    pub fn new(router: Router) -> Self {
        Self { router }
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Handle a decoded JSON payload, single message or batch.
    ///
    /// Returns `None` when nothing should be sent back (notifications, peer responses, or a
    /// batch made only of those). Each call's context is a child of `cancellation`.
    pub async fn handle_payload(
        &self,
        payload: Value,
        cancellation: &CancellationToken,
    ) -> Option<Value> {
        match payload {
            Value::Array(items) => self.handle_batch(items, cancellation).await,
            single => self.handle_value(single, cancellation).await,
        }
    }

    async fn handle_batch(
        &self,
        items: Vec<Value>,
        cancellation: &CancellationToken,
    ) -> Option<Value> {
        if items.is_empty() {
            return Some(error_value(
                &McpError::InvalidRequest("Empty batch".to_string()),
                RequestId::Null,
            ));
        }

        tracing::debug!(size = items.len(), "Handling batch");
        let responses: Vec<Value> = join_all(
            items
                .into_iter()
                .map(|item| self.handle_value(item, cancellation)),
        )
        .await
        .into_iter()
        .flatten()
        .collect();

        (!responses.is_empty()).then_some(Value::Array(responses))
    }

    async fn handle_value(&self, value: Value, cancellation: &CancellationToken) -> Option<Value> {
        let id_field = value.get("id");
        if id_field.is_some_and(|id| !RequestId::is_valid(id)) {
            tracing::warn!("Rejecting message with an invalid id");
            return Some(error_value(
                &McpError::InvalidRequest("'id' must be a string, a number, or null".to_string()),
                RequestId::Null,
            ));
        }
        let has_id = id_field.is_some();
        let id = RequestId::from_payload(&value);
        match serde_json::from_value::<JsonRpcMessage>(value) {
            // A message carrying an id is never a notification.
            Ok(JsonRpcMessage::Notification(_)) if has_id => Some(error_value(
                &McpError::InvalidRequest("Not a JSON-RPC 2.0 request".to_string()),
                id,
            )),
            Ok(message) => self.handle_message(message, cancellation).await,
            Err(e) => {
                tracing::warn!("Invalid JSON-RPC message: {e}");
                Some(error_value(
                    &McpError::InvalidRequest("Not a JSON-RPC 2.0 message".to_string()),
                    id,
                ))
            }
        }
    }

    pub async fn handle_message(
        &self,
        message: JsonRpcMessage,
        cancellation: &CancellationToken,
    ) -> Option<Value> {
        match message {
            JsonRpcMessage::Request(request) => {
                Some(self.handle_request(request, cancellation).await)
            }
            JsonRpcMessage::Notification(notification) => {
                match validate_notification(&notification) {
                    Ok(()) => tracing::debug!(method = %notification.method, "Notification received"),
                    Err(e) => tracing::warn!("Dropping notification: {e}"),
                }
                None
            }
            JsonRpcMessage::Response(_) | JsonRpcMessage::Error(_) => {
                tracing::warn!("Ignoring unsolicited response from client");
                None
            }
        }
    }

    async fn handle_request(&self, request: JsonRpcRequest, cancellation: &CancellationToken) -> Value {
        if let Err(e) = validate_request(&request) {
            return error_value(&e, request.id);
        }

        let id = request.id;
        let ctx = CallContext::new(cancellation.child_token()).with_request_id(id.clone());
        let call = self.router.dispatch(&request.method, request.params, ctx);

        match AssertUnwindSafe(call).catch_unwind().await {
            Ok(Ok(result)) => {
                serde_json::to_value(JsonRpcResponse::new(id, result)).unwrap_or_default()
            }
            Ok(Err(e)) => error_value(&e, id),
            Err(_) => {
                tracing::error!(method = %request.method, %id, "Handler panicked");
                error_value(
                    &McpError::InternalError(format!("'{}' handler panicked", request.method)),
                    id,
                )
            }
        }
    }
}

fn error_value(error: &McpError, id: RequestId) -> Value {
    serde_json::to_value(error.to_json_rpc_error(id)).unwrap_or_default()
}
