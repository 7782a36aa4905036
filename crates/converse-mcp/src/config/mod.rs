//! Configuration loading and resolution.

use std::net::SocketAddr;

pub const DEFAULT_HTTP_ADDR: &str = "127.0.0.1:8080";
pub const ADDR_ENV: &str = "CONVERSE_MCP_ADDR";

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("invalid listen address '{value}' (from {origin}): {source}")]
    InvalidAddr {
        value: String,
        origin: &'static str,
        #[source]
        source: std::net::AddrParseError,
    },
}

/// Resolve the HTTP listen address: explicit flag, then `CONVERSE_MCP_ADDR`, then the default.
pub fn resolve_http_addr(explicit: Option<&str>) -> Result<SocketAddr, ConfigError> {
    resolve_http_addr_from(explicit, std::env::var(ADDR_ENV).ok())
}

fn resolve_http_addr_from(
    explicit: Option<&str>,
    from_env: Option<String>,
) -> Result<SocketAddr, ConfigError> {
    let (value, origin) = match (explicit, from_env) {
        (Some(flag), _) => (flag.to_string(), "--addr"),
        (None, Some(env)) if !env.trim().is_empty() => (env, ADDR_ENV),
        _ => (DEFAULT_HTTP_ADDR.to_string(), "default"),
    };

    value
        .trim()
        .parse()
        .map_err(|source| ConfigError::InvalidAddr {
            value,
            origin,
            source,
        })
}
