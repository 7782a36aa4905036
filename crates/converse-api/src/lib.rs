//! Converse API: entity model for MCP servers: prompts, resources, tools, and their results.

pub mod content;
pub mod prompt;
pub mod request;
pub mod resource;
pub mod tool;

pub use content::*;
pub use prompt::*;
pub use request::*;
pub use resource::*;
pub use tool::*;

/// Free-form metadata attached to entities and results (serialized as `_meta`).
pub type Meta = serde_json::Map<String, serde_json::Value>;
