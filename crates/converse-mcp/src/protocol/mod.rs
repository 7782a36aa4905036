//! MCP protocol handling: JSON-RPC envelopes around the router.

pub mod handler;
pub mod validator;

pub use handler::ProtocolHandler;
