//! CI job tools

use crate::error::ToolError;
use crate::gitlab::RemoteId;
use crate::tools::executor::{ToolContext, ToolExecutor, ToolOutput};
use crate::util::JsonBody;
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::json;

use mcp_gitlab_macros::gitlab_tool;

/// Retry a job
#[gitlab_tool(
    name = "gitlab_retry_job",
    description = "Retry a failed or canceled job",
    category = "jobs",
    operation = "execute"
)]
pub struct RetryJob {
    /// Project ID or path
    pub project_id: RemoteId,
    pub job_id: u64,
}

#[async_trait]
impl ToolExecutor for RetryJob {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        ToolOutput::json_value(ctx.gitlab.retry_job(&self.project_id, self.job_id).await?)
    }
}

/// Variable passed to a manual job
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct JobVariable {
    pub key: String,
    pub value: String,
}

/// Start a manual job
#[gitlab_tool(
    name = "gitlab_play_job",
    description = "Trigger a manual job, optionally with extra variables",
    category = "jobs",
    operation = "execute"
)]
pub struct PlayJob {
    /// Project ID or path
    pub project_id: RemoteId,
    pub job_id: u64,
    #[serde(default)]
    pub variables: Option<Vec<JobVariable>>,
}

#[async_trait]
impl ToolExecutor for PlayJob {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let variables = match &self.variables {
            Some(vars) if !vars.is_empty() => Some(serde_json::to_value(vars)?),
            _ => None,
        };
        let body = JsonBody::new()
            .optional("job_variables_attributes", variables)
            .build();

        let job = ctx
            .gitlab
            .play_job(&self.project_id, self.job_id, &body)
            .await?;
        ToolOutput::json_value(job)
    }
}

/// Cancel a job
#[gitlab_tool(
    name = "gitlab_cancel_job",
    description = "Cancel a running job",
    category = "jobs",
    operation = "execute"
)]
pub struct CancelJob {
    /// Project ID or path
    pub project_id: RemoteId,
    pub job_id: u64,
}

#[async_trait]
impl ToolExecutor for CancelJob {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        ToolOutput::json_value(ctx.gitlab.cancel_job(&self.project_id, self.job_id).await?)
    }
}

fn default_tail_lines() -> usize {
    200
}

/// Get a job log
#[gitlab_tool(
    name = "gitlab_get_job_log",
    description = "Get the end of a job's log output",
    category = "jobs",
    operation = "read"
)]
pub struct GetJobLog {
    /// Project ID or path
    pub project_id: RemoteId,
    pub job_id: u64,
    /// Lines to keep from the end of the log; 0 returns the whole log
    #[serde(default = "default_tail_lines")]
    pub tail_lines: usize,
}

/// Last `tail` lines of a log
struct LogTail {
    text: String,
    total_lines: usize,
    shown_lines: usize,
}

fn tail_log(log: &str, tail: usize) -> LogTail {
    let lines: Vec<&str> = log.lines().collect();
    let total_lines = lines.len();
    let start = if tail > 0 && total_lines > tail {
        total_lines - tail
    } else {
        0
    };
    LogTail {
        text: lines[start..].join("\n"),
        total_lines,
        shown_lines: total_lines - start,
    }
}

#[async_trait]
impl ToolExecutor for GetJobLog {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let trace = ctx.gitlab.job_trace(&self.project_id, self.job_id).await?;
        let tail = tail_log(&trace, self.tail_lines);

        ToolOutput::json_value(json!({
            "log": tail.text,
            "total_lines": tail.total_lines,
            "shown_lines": tail.shown_lines,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tail_keeps_last_lines() {
        let log = (1..=10).map(|i| format!("line {i}")).collect::<Vec<_>>().join("\n");
        let tail = tail_log(&log, 3);
        assert_eq!(tail.total_lines, 10);
        assert_eq!(tail.shown_lines, 3);
        assert_eq!(tail.text, "line 8\nline 9\nline 10");
    }

    #[test]
    fn test_short_log_and_zero_tail() {
        let short = tail_log("a\nb", 200);
        assert_eq!((short.text.as_str(), short.shown_lines), ("a\nb", 2));

        let all = tail_log("a\nb\nc", 0);
        assert_eq!((all.text.as_str(), all.total_lines), ("a\nb\nc", 3));

        let empty = tail_log("", 5);
        assert_eq!((empty.total_lines, empty.shown_lines), (0, 0));
    }
}
