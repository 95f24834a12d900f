//! The read-only write gate.

use crate::config::GitLabConfig;
use crate::error::WriteDisabledError;
use tracing::warn;

use super::OperationType;

/// Fail when the server runs read-only.
///
/// Called before any request is built, so a blocked call has no side effects.
pub fn check_write_allowed(
    config: &GitLabConfig,
    operation: &str,
) -> Result<(), WriteDisabledError> {
    if config.read_only {
        warn!(operation, "Write blocked: server is read-only");
        return Err(WriteDisabledError::new(operation));
    }
    Ok(())
}

/// Gate a tool by its declared operation type; reads always pass.
pub fn check_tool_allowed(
    config: &GitLabConfig,
    tool_name: &str,
    operation: OperationType,
) -> Result<(), WriteDisabledError> {
    if operation.is_mutating() {
        check_write_allowed(config, tool_name)?;
    }
    Ok(())
}
