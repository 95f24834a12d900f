//! Commit tools

use crate::error::ToolError;
use crate::gitlab::{CommitActionKind, RemoteId};
use crate::tools::executor::{ToolContext, ToolExecutor, ToolOutput};
use crate::util::{JsonBody, Pagination, QueryBuilder};
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use mcp_gitlab_macros::gitlab_tool;

const DEFAULT_COMMITS_PER_PAGE: u32 = 40;

/// List commits
#[gitlab_tool(
    name = "gitlab_list_commits",
    description = "List repository commits, optionally filtered by ref, date range or file path",
    category = "commits",
    operation = "read"
)]
pub struct ListCommits {
    /// Project ID or path
    pub project_id: RemoteId,
    /// Branch or tag name
    #[serde(default)]
    pub ref_name: Option<String>,
    /// ISO 8601 date; only commits after it
    #[serde(default)]
    pub since: Option<String>,
    /// ISO 8601 date; only commits before it
    #[serde(default)]
    pub until: Option<String>,
    /// Only commits touching this file path
    #[serde(default)]
    pub path: Option<String>,
    #[serde(flatten)]
    pub pagination: Pagination,
}

#[async_trait]
impl ToolExecutor for ListCommits {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let query = QueryBuilder::new()
            .optional("ref_name", self.ref_name.as_deref())
            .optional("since", self.since.as_deref())
            .optional("until", self.until.as_deref())
            .optional("path", self.path.as_deref())
            .paginate(self.pagination, DEFAULT_COMMITS_PER_PAGE);

        let page = ctx.gitlab.list_commits(&self.project_id, query).await?;
        Ok(ToolOutput::page(page))
    }
}

/// Get a commit
#[gitlab_tool(
    name = "gitlab_get_commit",
    description = "Get a single commit, optionally with its file diffs",
    category = "commits",
    operation = "read"
)]
pub struct GetCommit {
    /// Project ID or path
    pub project_id: RemoteId,
    /// Commit SHA
    pub sha: String,
    /// Attach the diff under `diffs`
    #[serde(default)]
    pub include_diff: bool,
}

#[async_trait]
impl ToolExecutor for GetCommit {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        ToolError::require_non_empty("sha", &self.sha)?;

        let mut commit = ctx.gitlab.get_commit(&self.project_id, &self.sha).await?;
        if self.include_diff {
            let diff = ctx
                .gitlab
                .get_commit_diff(&self.project_id, &self.sha)
                .await?;
            if let Value::Object(map) = &mut commit {
                map.insert("diffs".to_string(), diff);
            }
        }
        ToolOutput::json_value(commit)
    }
}

/// One file change inside a commit
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CommitAction {
    pub action: CommitActionKind,
    /// Path of the file to change
    pub file_path: String,
    /// Original path, for `move`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_path: Option<String>,
    /// New file content, for `create` and `update`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// `text` or `base64`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,
    /// New executable flag, for `chmod`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execute_filemode: Option<bool>,
}

/// Create a commit
#[gitlab_tool(
    name = "gitlab_create_commit",
    description = "Create a commit with one or more file actions (create, delete, move, update, chmod)",
    category = "commits",
    operation = "write"
)]
pub struct CreateCommit {
    /// Project ID or path
    pub project_id: RemoteId,
    /// Target branch
    pub branch: String,
    pub commit_message: String,
    /// File actions, applied in order
    pub actions: Vec<CommitAction>,
    /// Branch to start from when `branch` does not exist yet
    #[serde(default)]
    pub start_branch: Option<String>,
}

#[async_trait]
impl ToolExecutor for CreateCommit {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        ToolError::require_non_empty("branch", &self.branch)?;
        ToolError::require_non_empty("commit_message", &self.commit_message)?;
        if self.actions.is_empty() {
            return Err(ToolError::InvalidArguments(
                "'actions' must contain at least one file action".to_string(),
            ));
        }

        let body = JsonBody::new()
            .field("branch", self.branch.as_str())
            .field("commit_message", self.commit_message.as_str())
            .field("actions", serde_json::to_value(&self.actions)?)
            .optional("start_branch", self.start_branch.as_deref())
            .build();

        ToolOutput::json_value(ctx.gitlab.create_commit(&self.project_id, &body).await?)
    }
}

/// Compare two refs
#[gitlab_tool(
    name = "gitlab_compare",
    description = "Compare two branches, tags or commits",
    category = "commits",
    operation = "read"
)]
pub struct Compare {
    /// Project ID or path
    pub project_id: RemoteId,
    /// Source branch, tag or SHA
    #[serde(rename = "from")]
    pub from_ref: String,
    /// Target branch, tag or SHA
    #[serde(rename = "to")]
    pub to_ref: String,
}

#[async_trait]
impl ToolExecutor for Compare {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        ToolError::require_non_empty("from", &self.from_ref)?;
        ToolError::require_non_empty("to", &self.to_ref)?;

        let result = ctx
            .gitlab
            .compare(&self.project_id, &self.from_ref, &self.to_ref)
            .await?;
        ToolOutput::json_value(result)
    }
}
