//! Server capability negotiation.

use crate::types::{Category, ServerCapabilities};

impl ServerCapabilities {
    /// Mark a category as offered. Flags only ever go from `false` to `true`.
    pub fn offer(&mut self, category: Category) {
        match category {
            Category::Prompt => self.prompts.list_changed = true,
            Category::Resource => self.resources.list_changed = true,
            Category::Tool => self.tools.list_changed = true,
        }
    }
}

/// Capabilities for a server given which categories have at least one registration.
pub fn negotiate(prompts: bool, resources: bool, tools: bool) -> ServerCapabilities {
    [
        (Category::Prompt, prompts),
        (Category::Resource, resources),
        (Category::Tool, tools),
    ]
    .into_iter()
    .filter(|(_, registered)| *registered)
    .fold(
        ServerCapabilities::default_capabilities(),
        |mut caps, (category, _)| {
            caps.offer(category);
            caps
        },
    )
}
