//! MCP error mapping.
//!
//! Maps application errors to what MCP clients see.
//!
//! # Strategy
//! - Tool failures of any kind → a successful `CallToolResult` whose body is the
//!   envelope `{"error": "<message>. <hint>"}` (see [`error_envelope`])
//! - Prompt and resource lookups → `Err(McpError)` with a JSON-RPC error code
//!
//! Messages are built from error `Display` impls only. Those never carry the
//! credential, which lives in a `SecretString` inside the auth provider.

use rmcp::ErrorData as McpError;
use rmcp::model::ErrorCode;
use serde_json::{Value, json};
use std::borrow::Cow;

use super::{GitLabError, ToolError};

const NOT_FOUND_HINT: &str =
    "Verify the resource ID/path. Use gitlab_get_project to confirm it exists.";
const AUTH_HINT: &str = "Check GITLAB_TOKEN permissions. Token needs 'api' scope.";
const READ_ONLY_HINT: &str = "Server is in read-only mode. Set GITLAB_READ_ONLY=false (or drop --read-only) to enable write access.";

/// Build the JSON envelope returned to MCP clients for a failed tool call.
pub fn error_envelope(error: &ToolError) -> Value {
    json!({ "error": actionable_message(error) })
}

/// The error text plus a next step, when one is known.
pub fn actionable_message(error: &ToolError) -> String {
    match hint(error) {
        Some(hint) => format!("{}. {}", error, hint),
        None => error.to_string(),
    }
}

fn hint(error: &ToolError) -> Option<&'static str> {
    match error {
        ToolError::InvalidArguments(_) | ToolError::Serialization(_) => Some(
            "Check required parameters and pagination bounds (per_page must be between 1 and 100).",
        ),
        ToolError::WriteDisabled(_) => Some(READ_ONLY_HINT),
        ToolError::NotFound(_) => Some("Call tools/list to see the available tools."),
        ToolError::GitLab(e) => gitlab_hint(e),
        ToolError::Sequence { .. } => None,
    }
}

fn gitlab_hint(error: &GitLabError) -> Option<&'static str> {
    match error {
        GitLabError::NotFound { .. } => Some(NOT_FOUND_HINT),
        GitLabError::Unauthorized { .. } | GitLabError::Forbidden { .. } => Some(AUTH_HINT),
        GitLabError::Conflict { .. } => Some("The resource may already exist or be locked."),
        GitLabError::Validation { .. } => Some("Check required fields and formats."),
        GitLabError::RateLimited { .. } => Some("Wait before retrying."),
        GitLabError::Request(_) | GitLabError::Timeout { .. } => {
            Some("Check network access to GITLAB_URL, or raise GITLAB_TIMEOUT.")
        }
        GitLabError::InvalidResponse(_) => {
            Some("Check that GITLAB_URL points at the instance root and the token is valid.")
        }
        GitLabError::WriteDisabled(_) => Some(READ_ONLY_HINT),
        GitLabError::Api { .. } => None,
    }
}

/// Unknown prompt name
pub fn prompt_not_found(name: &str) -> McpError {
    McpError {
        code: ErrorCode::INVALID_PARAMS,
        message: Cow::Owned(format!("Prompt '{}' not found", name)),
        data: Some(json!({ "prompt": name, "error_type": "PromptNotFound" })),
    }
}

/// Required prompt argument absent or empty
pub fn missing_argument(name: &str) -> McpError {
    McpError {
        code: ErrorCode::INVALID_PARAMS,
        message: Cow::Owned(format!("Missing required argument: {}", name)),
        data: Some(json!({ "argument": name, "error_type": "MissingArgument" })),
    }
}

/// Unknown resource URI
pub fn resource_not_found(uri: &str) -> McpError {
    McpError {
        code: ErrorCode::RESOURCE_NOT_FOUND,
        message: Cow::Owned(format!("Resource '{}' not found", uri)),
        data: Some(json!({ "uri": uri, "error_type": "ResourceNotFound" })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WriteDisabledError;

    #[test]
    fn test_envelope_has_single_error_key() {
        let envelope = error_envelope(&ToolError::InvalidArguments("missing field `ref`".into()));
        let obj = envelope.as_object().unwrap();
        assert_eq!(obj.len(), 1);
        assert!(obj["error"].as_str().unwrap().contains("missing field `ref`"));
    }

    #[test]
    fn test_not_found_hint() {
        let err = ToolError::GitLab(GitLabError::from_response(
            404,
            r#"{"message":"404 Project Not Found"}"#,
        ));
        let msg = actionable_message(&err);
        assert!(msg.contains("404"));
        assert!(msg.contains("not found"));
        assert!(msg.contains("gitlab_get_project"));
    }

    #[test]
    fn test_write_disabled_hint() {
        let err = ToolError::WriteDisabled(WriteDisabledError::new("gitlab_delete_branch"));
        let msg = actionable_message(&err);
        assert!(msg.contains("read-only"));
        assert!(msg.contains("enable write access"));

        // The adapter backstop produces the same guidance
        let err = ToolError::GitLab(GitLabError::WriteDisabled(WriteDisabledError::new("DELETE")));
        assert!(actionable_message(&err).contains("GITLAB_READ_ONLY=false"));
    }

    #[test]
    fn test_auth_hint() {
        let err = ToolError::GitLab(GitLabError::from_response(401, ""));
        assert!(actionable_message(&err).contains("'api' scope"));
    }

    #[test]
    fn test_api_error_without_hint() {
        let err = ToolError::GitLab(GitLabError::from_response(500, "boom"));
        assert_eq!(actionable_message(&err), "GitLab returned HTTP 500: boom");
    }

    #[test]
    fn test_protocol_errors() {
        assert_eq!(prompt_not_found("x").code, ErrorCode::INVALID_PARAMS);
        assert_eq!(resource_not_found("resource://x").code, ErrorCode::RESOURCE_NOT_FOUND);
        assert!(missing_argument("project_id").message.contains("project_id"));
    }
}
