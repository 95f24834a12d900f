//! GitLab MCP Server
//!
//! A Model Context Protocol server that exposes the GitLab REST API (v4) as
//! tools, alongside a handful of reference documents and workflow prompts.
//!
//! ## Features
//!
//! - **76 GitLab tools** for projects, approvals, groups, branches, commits,
//!   merge requests, notes and discussions, pipelines, jobs, tags, releases,
//!   CI/CD variables, and issues
//! - **Read-only mode**: every mutating tool is refused before any request is
//!   sent
//! - **Uniform results**: each tool returns one JSON object; failures are
//!   `{"error": "..."}` with a hint on what to do next
//! - **Three transports**: stdio, SSE, and streamable HTTP
//!
//! ## Example Configuration
//!
//! ```toml
//! [gitlab]
//! url = "https://gitlab.com"
//! # token from GITLAB_TOKEN
//! read_only = true
//!
//! [server]
//! transport = "streamable-http"
//! port = 8000
//! ```

pub mod access_control;
pub mod auth;
pub mod config;
pub mod content;
pub mod error;
pub mod gitlab;
pub mod server;
pub mod tools;
pub mod transport;
pub mod util;

pub use config::{AppConfig, load_config};
pub use error::{AppError, Result};
pub use server::GitLabMcpHandler;
