//! Configuration types for mcp-gitlab
//!
//! This module defines the configuration structure that can be loaded from
//! TOML files, environment variables, and command-line overrides.

use crate::util::SecretString;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// GitLab connection settings
    pub gitlab: GitLabConfig,

    /// Server/transport settings
    pub server: ServerConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// GitLab connection configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GitLabConfig {
    /// GitLab instance URL (e.g., `https://gitlab.com`)
    pub url: String,

    /// Access token (prefer env var GITLAB_TOKEN)
    pub token: Option<SecretString>,

    /// How the token is presented; detected from the token when unset
    pub auth_type: Option<AuthType>,

    /// Block every mutating tool
    pub read_only: bool,

    /// API version (default: "v4")
    pub api_version: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Whether to verify SSL certificates
    pub verify_ssl: bool,
}

impl Default for GitLabConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            token: None,
            auth_type: None,
            read_only: false,
            api_version: "v4".to_string(),
            timeout_secs: 30,
            verify_ssl: true,
        }
    }
}

impl GitLabConfig {
    /// Get the full API base URL
    pub fn api_url(&self) -> String {
        format!(
            "{}/api/{}",
            self.url.trim_end_matches('/'),
            self.api_version
        )
    }
}

/// Credential flavour accepted by GitLab
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthType {
    /// Personal, project, or group access token (`PRIVATE-TOKEN` header)
    Pat,
    /// OAuth2 access token (`Authorization: Bearer`)
    Oauth,
    /// CI/CD job token (`JOB-TOKEN` header)
    Job,
}

impl FromStr for AuthType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pat" | "private" | "private-token" => Ok(AuthType::Pat),
            "oauth" | "oauth2" | "bearer" => Ok(AuthType::Oauth),
            "job" | "job-token" | "ci" => Ok(AuthType::Job),
            other => Err(format!(
                "unknown auth type '{}', expected pat, oauth, or job",
                other
            )),
        }
    }
}

/// Server/transport configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Transport mode
    pub transport: TransportMode,

    /// HTTP host (for sse/streamable-http transports)
    pub host: String,

    /// HTTP port (for sse/streamable-http transports)
    pub port: u16,

    /// Server name for MCP
    pub name: String,

    /// Server version for MCP
    pub version: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            transport: TransportMode::Stdio,
            host: "127.0.0.1".to_string(),
            port: 8000,
            name: "mcp-gitlab".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Transport mode selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransportMode {
    /// Standard input/output (default)
    #[default]
    Stdio,
    /// HTTP with Server-Sent Events
    Sse,
    /// MCP streamable HTTP
    StreamableHttp,
}

impl TransportMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportMode::Stdio => "stdio",
            TransportMode::Sse => "sse",
            TransportMode::StreamableHttp => "streamable-http",
        }
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransportMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "stdio" => Ok(TransportMode::Stdio),
            "sse" => Ok(TransportMode::Sse),
            "streamable-http" | "http" => Ok(TransportMode::StreamableHttp),
            other => Err(format!(
                "unknown transport '{}', expected stdio, sse, or streamable-http",
                other
            )),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Output format (pretty, json)
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable output
    #[default]
    Pretty,
    /// JSON structured output
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format '{}', expected pretty or json", other)),
        }
    }
}
