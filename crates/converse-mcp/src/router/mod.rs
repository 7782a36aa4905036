//! Router core: capability negotiation, handler registry, and method dispatch.

pub mod builder;
pub mod dispatch;
pub mod handler;
pub mod negotiation;

pub use builder::{BuildError, RouterBuilder};
pub use dispatch::Router;
pub use handler::{CallContext, Callback, Entity, Entry, Keyed, PromptEntry, ResourceEntry, ToolEntry};
pub use negotiation::negotiate;
