//! GitLab MCP Server
//!
//! Exposes the GitLab REST API to MCP clients as tools, plus reference
//! documents and workflow prompts.

use clap::Parser;
use mcp_gitlab::{
    config::{AppConfig, ConfigOverrides, LogFormat, TransportMode, load_config},
    gitlab::GitLabClient,
    server::GitLabMcpHandler,
    transport::{bind_address, run_sse, run_stdio, run_streamable_http},
};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// GitLab MCP Server - GitLab's REST API as MCP tools
#[derive(Parser, Debug)]
#[command(name = "mcp-gitlab")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, env = "MCP_GITLAB_CONFIG")]
    config: Option<String>,

    /// Transport (stdio, sse, streamable-http)
    #[arg(long, env = "MCP_GITLAB_TRANSPORT")]
    transport: Option<TransportMode>,

    /// Bind host for HTTP transports
    #[arg(long, env = "MCP_GITLAB_HOST")]
    host: Option<String>,

    /// Bind port for HTTP transports
    #[arg(long, env = "MCP_GITLAB_PORT")]
    port: Option<u16>,

    /// GitLab instance URL
    #[arg(long, env = "GITLAB_URL")]
    gitlab_url: Option<String>,

    /// GitLab access token
    #[arg(long, env = "GITLAB_TOKEN", hide_env_values = true)]
    gitlab_token: Option<String>,

    /// Refuse every tool that changes GitLab state
    #[arg(
        long,
        env = "GITLAB_READ_ONLY",
        value_parser = clap::builder::BoolishValueParser::new()
    )]
    read_only: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "MCP_GITLAB_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format (pretty, json)
    #[arg(long, env = "MCP_GITLAB_LOG_FORMAT")]
    log_format: Option<LogFormat>,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            gitlab_url: self.gitlab_url.clone(),
            gitlab_token: self.gitlab_token.clone(),
            read_only: self.read_only,
            transport: self.transport,
            host: self.host.clone(),
            port: self.port,
            log_level: self.log_level.clone(),
            log_format: self.log_format,
        }
    }
}

/// Logs go to stderr; stdout carries the stdio transport.
fn init_logging(level: &str, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Pretty => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}

async fn serve(config: AppConfig, handler: GitLabMcpHandler) -> anyhow::Result<()> {
    match config.server.transport {
        TransportMode::Stdio => run_stdio(handler).await,
        TransportMode::Sse => {
            let bind = bind_address(&config.server.host, config.server.port)?;
            run_sse(handler, bind).await
        }
        TransportMode::StreamableHttp => {
            let bind = bind_address(&config.server.host, config.server.port)?;
            run_streamable_http(handler, bind).await
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine
    let _ = dotenvy::dotenv();

    let args = Args::parse();
    let overrides = args.overrides();

    let config = match load_config(args.config.as_deref(), &overrides) {
        Ok(config) => config,
        Err(e) => {
            // Logging isn't configured yet; use the requested level or the default
            init_logging(
                args.log_level.as_deref().unwrap_or("info"),
                args.log_format.unwrap_or_default(),
            );
            error!(error = %e, "Failed to load configuration");
            return Err(e.into());
        }
    };

    init_logging(&config.logging.level, config.logging.format);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        gitlab_url = %config.gitlab.url,
        transport = %config.server.transport,
        read_only = config.gitlab.read_only,
        "Starting GitLab MCP server"
    );

    let gitlab = Arc::new(
        GitLabClient::from_config(&config.gitlab)
            .inspect_err(|e| error!(error = %e, "Failed to create GitLab client"))?,
    );

    let handler = GitLabMcpHandler::new(&config, gitlab);

    serve(config, handler)
        .await
        .inspect_err(|e| error!(error = %e, "Server exited with an error"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_gitlab_flags_read_conventional_env() {
        let command = Args::command();
        let env_of = |id: &str| {
            command
                .get_arguments()
                .find(|arg| arg.get_id() == id)
                .and_then(|arg| arg.get_env())
                .and_then(|name| name.to_str())
                .map(str::to_string)
        };
        assert_eq!(env_of("gitlab_url").as_deref(), Some("GITLAB_URL"));
        assert_eq!(env_of("gitlab_token").as_deref(), Some("GITLAB_TOKEN"));
        assert_eq!(env_of("read_only").as_deref(), Some("GITLAB_READ_ONLY"));
    }

    #[test]
    fn test_read_only_flag() {
        let args = Args::try_parse_from(["mcp-gitlab", "--read-only"]).unwrap();
        assert!(args.overrides().read_only);
    }
}
