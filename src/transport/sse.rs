//! SSE transport
//!
//! Clients open `GET /sse` for the event stream and post requests to
//! `/message`. Each connection gets its own handler clone.

use crate::server::GitLabMcpHandler;
use rmcp::transport::sse_server::SseServer;
use std::net::SocketAddr;
use tokio_util::sync::CancellationToken;
use tracing::info;

use super::shutdown_signal;

/// Serve over SSE until Ctrl+C
pub async fn run_sse(handler: GitLabMcpHandler, bind: SocketAddr) -> anyhow::Result<()> {
    info!(%bind, "Starting GitLab MCP server with SSE transport");

    let ct: CancellationToken = SseServer::serve(bind)
        .await?
        .with_service(move || handler.clone());

    info!("SSE endpoint: http://{}/sse", bind);

    tokio::select! {
        _ = shutdown_signal() => {}
        _ = ct.cancelled() => info!("SSE server cancelled"),
    }
    ct.cancel();

    info!("SSE server stopped");
    Ok(())
}
