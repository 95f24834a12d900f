//! Streamable HTTP transport
//!
//! The MCP endpoint is mounted at [`MCP_PATH`] in an axum router, with
//! sessions tracked in memory.

use crate::server::GitLabMcpHandler;
use axum::Router;
use rmcp::transport::streamable_http_server::{
    StreamableHttpService, session::local::LocalSessionManager,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use super::shutdown_signal;

pub const MCP_PATH: &str = "/mcp";

/// Router serving `handler` at [`MCP_PATH`]
pub fn router(handler: GitLabMcpHandler) -> Router {
    let service = StreamableHttpService::new(
        move || Ok(handler.clone()),
        LocalSessionManager::default().into(),
        Default::default(),
    );

    Router::new()
        .nest_service(MCP_PATH, service)
        .layer(TraceLayer::new_for_http())
}

/// Serve streamable HTTP until Ctrl+C
pub async fn run_streamable_http(
    handler: GitLabMcpHandler,
    bind: SocketAddr,
) -> anyhow::Result<()> {
    let listener = TcpListener::bind(bind).await?;
    info!(
        addr = %listener.local_addr()?,
        path = MCP_PATH,
        "Starting GitLab MCP server with streamable HTTP transport"
    );

    axum::serve(listener, router(handler))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Streamable HTTP server stopped");
    Ok(())
}
