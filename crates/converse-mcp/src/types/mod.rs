//! All MCP data types used by the server: JSON-RPC envelopes, errors, methods, and the
//! entity model re-exported from `converse-api`.

pub mod capabilities;
pub mod error;
pub mod message;
pub mod method;
pub mod response;

pub use capabilities::*;
pub use converse_api::*;
pub use error::*;
pub use message::*;
pub use method::*;
pub use response::*;
