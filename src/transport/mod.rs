//! Transport module
//!
//! Runs the MCP handler over stdio, SSE, or streamable HTTP.

pub mod sse;
pub mod stdio;
pub mod streamable_http;

pub use sse::run_sse;
pub use stdio::run_stdio;
pub use streamable_http::{MCP_PATH, router as streamable_http_router, run_streamable_http};

use std::net::SocketAddr;

/// Parse `host:port` into a bind address
pub fn bind_address(host: &str, port: u16) -> anyhow::Result<SocketAddr> {
    let host = host.trim().trim_start_matches('[').trim_end_matches(']');
    let addr = match host.parse::<std::net::IpAddr>() {
        Ok(ip) => SocketAddr::new(ip, port),
        Err(_) if host.eq_ignore_ascii_case("localhost") => {
            SocketAddr::from(([127, 0, 0, 1], port))
        }
        Err(e) => anyhow::bail!("invalid bind host '{}': {}", host, e),
    };
    Ok(addr)
}

/// Resolves on Ctrl+C
pub(crate) async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    tracing::info!("Received shutdown signal");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_address() {
        assert_eq!(
            bind_address("127.0.0.1", 8000).unwrap(),
            SocketAddr::from(([127, 0, 0, 1], 8000))
        );
        assert_eq!(bind_address("localhost", 9).unwrap().port(), 9);
        assert!(bind_address("[::1]", 8000).unwrap().is_ipv6());
        assert!(bind_address("not a host", 8000).is_err());
    }
}
