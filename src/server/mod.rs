//! MCP server

pub mod handler;

pub use handler::GitLabMcpHandler;
