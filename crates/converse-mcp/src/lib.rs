//! Converse MCP: build a router of prompts, resources and tools once, then serve it over a
//! line-delimited stream or over HTTP.

pub mod client;
pub mod config;
pub mod demo;
pub mod logging;
pub mod protocol;
pub mod router;
pub mod transport;
pub mod types;

pub use client::Client;
pub use config::resolve_http_addr;
pub use protocol::ProtocolHandler;
pub use router::{BuildError, CallContext, Router, RouterBuilder};
#[cfg(feature = "http")]
pub use transport::HttpTransport;
pub use transport::StreamTransport;
