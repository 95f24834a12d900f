//! Stdio transport
//!
//! Runs the MCP server over standard input/output. Logging must stay on
//! stderr while this transport is active.

use crate::server::GitLabMcpHandler;
use rmcp::ServiceExt;
use rmcp::transport::stdio;
use tracing::{error, info};

/// Serve until the client closes stdin
pub async fn run_stdio(handler: GitLabMcpHandler) -> anyhow::Result<()> {
    info!("Starting GitLab MCP server with stdio transport");

    let server = handler
        .serve(stdio())
        .await
        .inspect_err(|e| error!(error = ?e, "Failed to start stdio transport"))?;

    server.waiting().await?;

    info!("GitLab MCP server stopped");
    Ok(())
}
