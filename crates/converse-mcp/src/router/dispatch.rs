//! The immutable router and its method dispatch.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::types::*;

use super::builder::RouterBuilder;
use super::handler::{CallContext, Entity, Entry, Keyed};

/// Entries of one category, indexed by key, with the `*/list` response pre-encoded.
pub(crate) struct Table<T, P, R> {
    entries: Vec<Entry<T, P, R>>,
    keys: HashMap<String, usize>,
    listing: Value,
}

impl<T, P, R> Table<T, P, R> {
    pub(crate) fn new(
        entries: Vec<Entry<T, P, R>>,
        keys: HashMap<String, usize>,
        listing: Value,
    ) -> Self {
        Self {
            entries,
            keys,
            listing,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    fn entities(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().map(|e| &e.entity)
    }

    fn get(&self, key: &str) -> Option<&Entry<T, P, R>> {
        self.keys.get(key).and_then(|&i| self.entries.get(i))
    }
}

impl<T: Entity, P, R> Table<T, P, R>
where
    P: DeserializeOwned + Keyed,
    R: Serialize,
{
    /// Decode, look up, invoke. No callback runs unless the first two succeed.
    async fn call(&self, method: Method, params: Option<Value>, ctx: CallContext) -> McpResult<Value> {
        let params: P = serde_json::from_value(params.unwrap_or_else(|| Value::Object(Default::default())))
            .map_err(|source| McpError::InvalidParams { method, source })?;

        let key = params.key().to_string();
        let entry = self.get(&key).ok_or_else(|| McpError::NotFound {
            method,
            category: T::CATEGORY,
            key: key.clone(),
        })?;

        let result = entry
            .call(ctx, params)
            .await
            .map_err(|source| McpError::Handler {
                method,
                key: key.clone(),
                source,
            })?;

        serde_json::to_value(result).map_err(|e| {
            McpError::InternalError(format!("failed to encode '{method}' result for '{key}': {e}"))
        })
    }
}

/// An immutable method-name → procedure mapping over the registered entities.
///
/// Cloning is cheap; all clones share the same registry.
#[derive(Clone)]
pub struct Router {
    inner: Arc<RouterInner>,
}

struct RouterInner {
    server_info: Implementation,
    capabilities: ServerCapabilities,
    initialize: Value,
    prompts: Table<Prompt, GetPromptParams, GetPromptResult>,
    resources: Table<Resource, ReadResourceParams, ReadResourceResult>,
    tools: Table<Tool, CallToolParams, CallToolResult>,
}

impl Router {
    pub fn builder(name: impl Into<String>, version: impl Into<String>) -> RouterBuilder {
        RouterBuilder::new(name, version)
    }

    pub(crate) fn from_parts(
        server_info: Implementation,
        capabilities: ServerCapabilities,
        initialize: Value,
        prompts: Table<Prompt, GetPromptParams, GetPromptResult>,
        resources: Table<Resource, ReadResourceParams, ReadResourceResult>,
        tools: Table<Tool, CallToolParams, CallToolResult>,
    ) -> Self {
        Self {
            inner: Arc::new(RouterInner {
                server_info,
                capabilities,
                initialize,
                prompts,
                resources,
                tools,
            }),
        }
    }

    pub fn server_info(&self) -> &Implementation {
        &self.inner.server_info
    }

    pub fn capabilities(&self) -> ServerCapabilities {
        self.inner.capabilities
    }

    pub fn prompts(&self) -> impl Iterator<Item = &Prompt> {
        self.inner.prompts.entities()
    }

    pub fn resources(&self) -> impl Iterator<Item = &Resource> {
        self.inner.resources.entities()
    }

    pub fn tools(&self) -> impl Iterator<Item = &Tool> {
        self.inner.tools.entities()
    }

    /// Dispatch a call by method name.
    pub async fn dispatch(
        &self,
        method: &str,
        params: Option<Value>,
        ctx: CallContext,
    ) -> McpResult<Value> {
        let method: Method = method.parse()?;
        self.invoke(method, params, ctx).await
    }

    pub async fn invoke(
        &self,
        method: Method,
        params: Option<Value>,
        ctx: CallContext,
    ) -> McpResult<Value> {
        tracing::debug!(%method, id = ?ctx.request_id(), "Dispatching");
        let inner = &self.inner;
        let outcome = match method {
            Method::Initialize => Ok(inner.initialize.clone()),
            Method::PromptsList => Ok(inner.prompts.listing.clone()),
            Method::ResourcesList => Ok(inner.resources.listing.clone()),
            Method::ToolsList => Ok(inner.tools.listing.clone()),
            Method::PromptsGet => inner.prompts.call(method, params, ctx).await,
            Method::ResourcesRead => inner.resources.call(method, params, ctx).await,
            Method::ToolsCall => inner.tools.call(method, params, ctx).await,
        };
        match &outcome {
            Ok(_) => tracing::debug!(%method, "Call succeeded"),
            Err(e) => tracing::debug!(%method, kind = e.kind(), error = %e, "Call failed"),
        }
        outcome
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("server_info", &self.inner.server_info)
            .field("capabilities", &self.inner.capabilities)
            .field("prompts", &self.inner.prompts.len())
            .field("resources", &self.inner.resources.len())
            .field("tools", &self.inner.tools.len())
            .finish()
    }
}
