//! Registered entities, their callbacks, and the per-call context handed to them.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::types::*;

/// Context for a single inbound call.
///
/// The cancellation token is a child of the transport's shutdown token. The HTTP bridge also
/// cancels it when the client goes away before the response is written.
#[derive(Debug, Clone, Default)]
pub struct CallContext {
    request_id: Option<RequestId>,
    cancellation: CancellationToken,
}

impl CallContext {
    pub fn new(cancellation: CancellationToken) -> Self {
        Self {
            request_id: None,
            cancellation,
        }
    }

    /// A context that is never cancelled.
    pub fn background() -> Self {
        Self::default()
    }

    pub fn with_request_id(mut self, id: RequestId) -> Self {
        self.request_id = Some(id);
        self
    }

    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    /// Resolves once the call has been cancelled.
    pub async fn cancelled(&self) {
        self.cancellation.cancelled().await
    }
}

/// A boxed user callback producing `R` from decoded params `P`.
pub type Callback<P, R> =
    Arc<dyn Fn(CallContext, P) -> BoxFuture<'static, Result<R, BoxError>> + Send + Sync>;

/// Something identified by a string key: an entity or the params that look one up.
pub trait Keyed {
    fn key(&self) -> &str;
}

/// A registrable entity.
pub trait Entity: Keyed + Serialize + Send + Sync + 'static {
    const CATEGORY: Category;
    /// Field holding the entities in a `*/list` result.
    const LIST_FIELD: &'static str;
}

impl Keyed for Prompt {
    fn key(&self) -> &str {
        &self.name
    }
}

impl Entity for Prompt {
    const CATEGORY: Category = Category::Prompt;
    const LIST_FIELD: &'static str = "prompts";
}

impl Keyed for Resource {
    fn key(&self) -> &str {
        &self.uri
    }
}

impl Entity for Resource {
    const CATEGORY: Category = Category::Resource;
    const LIST_FIELD: &'static str = "resources";
}

impl Keyed for Tool {
    fn key(&self) -> &str {
        &self.name
    }
}

impl Entity for Tool {
    const CATEGORY: Category = Category::Tool;
    const LIST_FIELD: &'static str = "tools";
}

impl Keyed for GetPromptParams {
    fn key(&self) -> &str {
        &self.name
    }
}

impl Keyed for ReadResourceParams {
    fn key(&self) -> &str {
        &self.uri
    }
}

impl Keyed for CallToolParams {
    fn key(&self) -> &str {
        &self.name
    }
}

/// One registered entity bound to its callback.
pub struct Entry<T, P, R> {
    pub entity: T,
    pub callback: Callback<P, R>,
}

pub type PromptEntry = Entry<Prompt, GetPromptParams, GetPromptResult>;
pub type ResourceEntry = Entry<Resource, ReadResourceParams, ReadResourceResult>;
pub type ToolEntry = Entry<Tool, CallToolParams, CallToolResult>;

impl<T, P, R> Entry<T, P, R> {
    pub fn new<F, Fut>(entity: T, callback: F) -> Self
    where
        T: 'static,
        P: Send + 'static,
        R: Send + 'static,
        F: Fn(CallContext, P) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<R, BoxError>> + Send + 'static,
    {
        Self {
            entity,
            callback: Arc::new(move |ctx, params| callback(ctx, params).boxed()),
        }
    }

    pub async fn call(&self, ctx: CallContext, params: P) -> Result<R, BoxError> {
        (self.callback)(ctx, params).await
    }
}

impl<T: fmt::Debug, P, R> fmt::Debug for Entry<T, P, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry")
            .field("entity", &self.entity)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_entry_runs_its_callback_with_the_context() {
        let entry: ToolEntry = Entry::new(Tool::new("echo"), |ctx, params: CallToolParams| async move {
            let id = ctx.request_id().map(ToString::to_string).unwrap_or_default();
            Ok(CallToolResult::text(format!("{id}:{}", params.name)))
        });
        let ctx = CallContext::background().with_request_id(RequestId::from(9));
        let result = entry.call(ctx, CallToolParams::new("echo")).await.unwrap();
        assert_eq!(result, CallToolResult::text("9:echo"));
    }

    #[tokio::test]
    async fn test_context_observes_cancellation() {
        let token = CancellationToken::new();
        let ctx = CallContext::new(token.child_token());
        assert!(!ctx.is_cancelled());
        token.cancel();
        ctx.cancelled().await;
        assert!(ctx.is_cancelled());
    }

    #[test]
    fn test_keys() {
        assert_eq!(Resource::new("readme", "file:///a.txt").key(), "file:///a.txt");
        assert_eq!(Prompt::new("greet").key(), "greet");
        assert_eq!(ReadResourceParams::new("file:///a.txt").key(), "file:///a.txt");
        assert_eq!(<Resource as Entity>::CATEGORY, Category::Resource);
    }
}
