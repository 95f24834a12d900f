//! Error types for mcp-gitlab
//!
//! This module defines the error hierarchy used throughout the application.
//! We use `thiserror` for library-style errors that are part of the API,
//! and convert to the JSON error envelope at the tool boundary (see [`mcp_mapper`]).

pub mod mcp_mapper;

use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("GitLab API error: {0}")]
    GitLab(#[from] GitLabError),

    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),
}

/// Configuration-related errors. Always fatal at startup.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(String),

    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    #[error("Missing required configuration: {field}")]
    Missing { field: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Raised by the write gate when a mutating operation is attempted in read-only mode
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Write operation '{operation}' is blocked because the server is in read-only mode")]
pub struct WriteDisabledError {
    pub operation: String,
}

impl WriteDisabledError {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
        }
    }
}

/// GitLab API specific errors
#[derive(Error, Debug)]
pub enum GitLabError {
    #[error("Request to GitLab failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("Request to GitLab timed out after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },

    #[error("GitLab returned HTTP {status}: {message}")]
    Api { status: u16, message: String },

    #[error("GitLab returned HTTP 404: resource not found ({message})")]
    NotFound { message: String },

    #[error("GitLab returned HTTP 401: authentication failed ({message})")]
    Unauthorized { message: String },

    #[error("GitLab returned HTTP 403: insufficient permissions ({message})")]
    Forbidden { message: String },

    #[error("GitLab returned HTTP 409: conflict ({message})")]
    Conflict { message: String },

    #[error("GitLab returned HTTP 422: validation failed ({message})")]
    Validation { message: String },

    #[error("GitLab returned HTTP 429: rate limited")]
    RateLimited { retry_after: Option<u64> },

    #[error("Invalid response from GitLab: {0}")]
    InvalidResponse(String),

    #[error(transparent)]
    WriteDisabled(#[from] WriteDisabledError),
}

/// Longest slice of a response body carried into an error message
const MAX_ERROR_BODY: usize = 500;

impl GitLabError {
    /// Create an appropriate error from an HTTP status code and response body
    pub fn from_response(status: u16, body: &str) -> Self {
        let message = extract_message(status, body);
        match status {
            401 => GitLabError::Unauthorized { message },
            403 => GitLabError::Forbidden { message },
            404 => GitLabError::NotFound { message },
            409 => GitLabError::Conflict { message },
            422 => GitLabError::Validation { message },
            429 => GitLabError::RateLimited { retry_after: None },
            _ => GitLabError::Api { status, message },
        }
    }

    /// HTTP status associated with this error, if it came from a response
    pub fn status(&self) -> Option<u16> {
        match self {
            GitLabError::Api { status, .. } => Some(*status),
            GitLabError::NotFound { .. } => Some(404),
            GitLabError::Unauthorized { .. } => Some(401),
            GitLabError::Forbidden { .. } => Some(403),
            GitLabError::Conflict { .. } => Some(409),
            GitLabError::Validation { .. } => Some(422),
            GitLabError::RateLimited { .. } => Some(429),
            _ => None,
        }
    }

    /// Whether the request never produced an HTTP response
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            GitLabError::Request(_) | GitLabError::Timeout { .. }
        )
    }
}

/// Pull the human-readable part out of a GitLab error body.
///
/// GitLab answers with `{"message": ...}` or `{"error": ...}`, where `message`
/// may itself be an object of field errors.
fn extract_message(status: u16, body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return format!("HTTP {}", status);
    }

    if let Ok(value) = serde_json::from_str::<serde_json::Value>(trimmed) {
        let field = value.get("message").or_else(|| value.get("error"));
        match field {
            Some(serde_json::Value::String(s)) => return s.clone(),
            Some(other) => return other.to_string(),
            None => {}
        }
    }

    truncate(trimmed, MAX_ERROR_BODY)
}

fn truncate(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}

/// Tool execution errors
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    #[error(transparent)]
    WriteDisabled(#[from] WriteDisabledError),

    #[error(transparent)]
    GitLab(#[from] GitLabError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Unknown tool: {0}")]
    NotFound(String),

    /// An ordered sequence stopped part way through
    #[error("{message} (completed before stopping: {completed:?})")]
    Sequence { message: String, completed: Vec<u64> },
}

impl ToolError {
    /// Reject an empty value for a required string argument
    pub fn require_non_empty(field: &str, value: &str) -> ToolResult<()> {
        if value.trim().is_empty() {
            return Err(ToolError::InvalidArguments(format!(
                "'{}' must not be empty",
                field
            )));
        }
        Ok(())
    }
}

/// Authentication errors
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("No authentication configured")]
    NotConfigured,

    #[error("Invalid token format")]
    InvalidToken,
}

/// Result type alias for the application
pub type Result<T> = std::result::Result<T, AppError>;

/// Result type alias for tool operations
pub type ToolResult<T> = std::result::Result<T, ToolError>;

/// Result type alias for GitLab API operations
pub type GitLabResult<T> = std::result::Result<T, GitLabError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gitlab_error_from_response() {
        assert!(matches!(
            GitLabError::from_response(401, ""),
            GitLabError::Unauthorized { .. }
        ));

        assert!(matches!(
            GitLabError::from_response(403, ""),
            GitLabError::Forbidden { .. }
        ));

        assert!(matches!(
            GitLabError::from_response(404, ""),
            GitLabError::NotFound { .. }
        ));

        assert!(matches!(
            GitLabError::from_response(409, ""),
            GitLabError::Conflict { .. }
        ));

        assert!(matches!(
            GitLabError::from_response(422, ""),
            GitLabError::Validation { .. }
        ));

        assert!(matches!(
            GitLabError::from_response(429, ""),
            GitLabError::RateLimited { .. }
        ));

        let api_err = GitLabError::from_response(500, "Internal server error");
        assert!(matches!(api_err, GitLabError::Api { status: 500, .. }));
    }

    #[test]
    fn test_message_extracted_from_json_body() {
        let err = GitLabError::from_response(404, r#"{"message":"404 Project Not Found"}"#);
        let text = err.to_string();
        assert!(text.contains("404 Project Not Found"));
        assert!(text.contains("not found"));

        let err = GitLabError::from_response(400, r#"{"error":"ref is missing"}"#);
        assert_eq!(err.to_string(), "GitLab returned HTTP 400: ref is missing");

        let err = GitLabError::from_response(
            422,
            r#"{"message":{"name":["has already been taken"]}}"#,
        );
        assert!(err.to_string().contains("has already been taken"));
    }

    #[test]
    fn test_long_body_truncated() {
        let body = "x".repeat(2000);
        let err = GitLabError::from_response(502, &body);
        let GitLabError::Api { message, .. } = err else {
            panic!("expected Api error");
        };
        assert_eq!(message.len(), MAX_ERROR_BODY + 3);
    }

    #[test]
    fn test_status() {
        assert_eq!(GitLabError::from_response(404, "").status(), Some(404));
        assert_eq!(GitLabError::Timeout { timeout_secs: 30 }.status(), None);
        assert!(GitLabError::Timeout { timeout_secs: 30 }.is_transport());
    }

    #[test]
    fn test_write_disabled_message() {
        let err = WriteDisabledError::new("gitlab_delete_branch");
        assert!(err.to_string().contains("read-only"));
        assert!(err.to_string().contains("gitlab_delete_branch"));
    }

    #[test]
    fn test_require_non_empty() {
        assert!(ToolError::require_non_empty("ref", "main").is_ok());
        assert!(matches!(
            ToolError::require_non_empty("ref", "  "),
            Err(ToolError::InvalidArguments(_))
        ));
    }
}
