//! Router construction: registrations accumulate here and are frozen by `build`.

use std::collections::HashMap;
use std::future::Future;

use serde_json::{Map, Value};

use crate::types::*;

use super::dispatch::{Router, Table};
use super::handler::{CallContext, Entity, Entry, PromptEntry, ResourceEntry, ToolEntry};
use super::negotiation::negotiate;

/// Configuration errors detected when freezing a builder.
#[derive(thiserror::Error, Debug)]
pub enum BuildError {
    #[error("{category} #{index} has an empty {}", category.key_field())]
    EmptyKey { category: Category, index: usize },

    #[error("{category} '{key}' is registered more than once")]
    DuplicateKey { category: Category, key: String },

    #[error("failed to encode the '{method}' response: {source}")]
    Encode {
        method: Method,
        #[source]
        source: serde_json::Error,
    },
}

/// Accumulates prompts, resources and tools with their callbacks.
///
/// ```no_run
/// use converse_mcp::router::RouterBuilder;
/// use converse_mcp::types::{CallToolResult, Tool};
///
/// let router = RouterBuilder::new("demo", "1.0.0")
///     .with_tool(Tool::new("ping"), |_ctx, _params| async move {
///         Ok(CallToolResult::text("pong"))
///     })
///     .build()
///     .expect("valid router");
/// assert_eq!(router.tools().count(), 1);
/// ```
#[derive(Debug)]
pub struct RouterBuilder {
    server_info: Implementation,
    prompts: Vec<PromptEntry>,
    resources: Vec<ResourceEntry>,
    tools: Vec<ToolEntry>,
}

impl RouterBuilder {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            server_info: Implementation::new(name, version),
            prompts: Vec::new(),
            resources: Vec::new(),
            tools: Vec::new(),
        }
    }

    /// Capabilities as they stand after the registrations so far.
    pub fn capabilities(&self) -> ServerCapabilities {
        negotiate(
            !self.prompts.is_empty(),
            !self.resources.is_empty(),
            !self.tools.is_empty(),
        )
    }

    pub fn with_prompt<F, Fut>(mut self, prompt: Prompt, callback: F) -> Self
    where
        F: Fn(CallContext, GetPromptParams) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<GetPromptResult, BoxError>> + Send + 'static,
    {
        tracing::debug!(name = %prompt.name, "Registering prompt");
        self.prompts.push(Entry::new(prompt, callback));
        self
    }

    pub fn with_resource<F, Fut>(mut self, resource: Resource, callback: F) -> Self
    where
        F: Fn(CallContext, ReadResourceParams) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ReadResourceResult, BoxError>> + Send + 'static,
    {
        tracing::debug!(name = %resource.name, uri = %resource.uri, "Registering resource");
        self.resources.push(Entry::new(resource, callback));
        self
    }

    pub fn with_tool<F, Fut>(mut self, tool: Tool, callback: F) -> Self
    where
        F: Fn(CallContext, CallToolParams) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<CallToolResult, BoxError>> + Send + 'static,
    {
        tracing::debug!(name = %tool.name, "Registering tool");
        self.tools.push(Entry::new(tool, callback));
        self
    }

    /// Freeze the registrations into an immutable [`Router`].
    pub fn build(self) -> Result<Router, BuildError> {
        let capabilities = self.capabilities();
        let initialize = encode(
            Method::Initialize,
            &InitializeResult::new(self.server_info.clone(), capabilities),
        )?;

        let prompts = index(Method::PromptsList, self.prompts)?;
        let resources = index(Method::ResourcesList, self.resources)?;
        let tools = index(Method::ToolsList, self.tools)?;

        tracing::debug!(
            server = %self.server_info.name,
            prompts = prompts.len(),
            resources = resources.len(),
            tools = tools.len(),
            "Router built"
        );

        Ok(Router::from_parts(
            self.server_info,
            capabilities,
            initialize,
            prompts,
            resources,
            tools,
        ))
    }
}

fn encode(method: Method, value: &impl serde::Serialize) -> Result<Value, BuildError> {
    serde_json::to_value(value).map_err(|source| BuildError::Encode { method, source })
}

fn index<T: Entity, P, R>(
    list_method: Method,
    entries: Vec<Entry<T, P, R>>,
) -> Result<Table<T, P, R>, BuildError> {
    let mut keys = HashMap::with_capacity(entries.len());
    for (position, entry) in entries.iter().enumerate() {
        let key = entry.entity.key();
        if key.is_empty() {
            return Err(BuildError::EmptyKey {
                category: T::CATEGORY,
                index: position,
            });
        }
        if keys.insert(key.to_string(), position).is_some() {
            return Err(BuildError::DuplicateKey {
                category: T::CATEGORY,
                key: key.to_string(),
            });
        }
    }

    let entities: Vec<&T> = entries.iter().map(|e| &e.entity).collect();
    let mut listing = Map::new();
    listing.insert(T::LIST_FIELD.to_string(), encode(list_method, &entities)?);

    Ok(Table::new(entries, keys, Value::Object(listing)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::future::{ready, Ready};

    fn ok(_ctx: CallContext, _params: CallToolParams) -> Ready<Result<CallToolResult, BoxError>> {
        ready(Ok(CallToolResult::text("ok")))
    }

    #[test]
    fn test_flags_flip_on_first_registration() {
        let builder = RouterBuilder::new("demo", "1.0.0");
        assert_eq!(builder.capabilities(), ServerCapabilities::default_capabilities());

        let builder = builder.with_tool(Tool::new("a"), ok);
        assert!(builder.capabilities().tools.list_changed);
        assert!(!builder.capabilities().prompts.list_changed);

        let builder = builder.with_tool(Tool::new("b"), ok);
        assert!(builder.capabilities().tools.list_changed);
    }

    #[test]
    fn test_duplicate_tool_names_are_rejected() {
        let err = RouterBuilder::new("demo", "1.0.0")
            .with_tool(Tool::new("echo"), ok)
            .with_tool(Tool::new("echo"), ok)
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            BuildError::DuplicateKey { category: Category::Tool, ref key } if key == "echo"
        ));
        assert_eq!(err.to_string(), "tool 'echo' is registered more than once");
    }

    #[test]
    fn test_resources_are_keyed_by_uri() {
        let ok = RouterBuilder::new("demo", "1.0.0")
            .with_resource(Resource::new("same", "file:///a.txt"), |_, p: ReadResourceParams| async move {
                Ok(ReadResourceResult::text(p.uri, None, "a"))
            })
            .with_resource(Resource::new("same", "file:///b.txt"), |_, p: ReadResourceParams| async move {
                Ok(ReadResourceResult::text(p.uri, None, "b"))
            })
            .build();
        assert!(ok.is_ok());

        let err = RouterBuilder::new("demo", "1.0.0")
            .with_resource(Resource::new("a", "file:///a.txt"), |_, p: ReadResourceParams| async move {
                Ok(ReadResourceResult::text(p.uri, None, "a"))
            })
            .with_resource(Resource::new("b", "file:///a.txt"), |_, p: ReadResourceParams| async move {
                Ok(ReadResourceResult::text(p.uri, None, "b"))
            })
            .build()
            .unwrap_err();
        assert!(matches!(err, BuildError::DuplicateKey { category: Category::Resource, .. }));
    }

    #[test]
    fn test_empty_key_reports_its_position() {
        let err = RouterBuilder::new("demo", "1.0.0")
            .with_prompt(Prompt::new("ok"), |_, _| async move { Ok(GetPromptResult::user_text("hi")) })
            .with_prompt(Prompt::new(""), |_, _| async move { Ok(GetPromptResult::user_text("hi")) })
            .build()
            .unwrap_err();
        assert!(matches!(err, BuildError::EmptyKey { category: Category::Prompt, index: 1 }));
        assert_eq!(err.to_string(), "prompt #1 has an empty name");
    }

    #[test]
    fn test_same_name_across_categories_is_allowed() {
        let router = RouterBuilder::new("demo", "1.0.0")
            .with_prompt(Prompt::new("greet"), |_, _| async move { Ok(GetPromptResult::user_text("hi")) })
            .with_tool(Tool::new("greet"), ok)
            .build();
        assert!(router.is_ok());
    }
}
