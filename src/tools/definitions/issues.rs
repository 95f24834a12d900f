//! Issue tools

use crate::error::ToolError;
use crate::gitlab::{IssueState, RemoteId, StateEvent};
use crate::tools::executor::{ToolContext, ToolExecutor, ToolOutput};
use crate::util::{JsonBody, Pagination, QueryBuilder};
use async_trait::async_trait;

use mcp_gitlab_macros::gitlab_tool;

const DEFAULT_ISSUES_PER_PAGE: u32 = 20;

/// List issues
#[gitlab_tool(
    name = "gitlab_list_issues",
    description = "List issues of a project",
    category = "issues",
    operation = "read"
)]
pub struct ListIssues {
    /// Project ID or path
    pub project_id: RemoteId,
    #[serde(default)]
    pub state: Option<IssueState>,
    /// Comma-separated label names
    #[serde(default)]
    pub labels: Option<String>,
    /// Search in title and description
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub assignee_id: Option<u64>,
    #[serde(flatten)]
    pub pagination: Pagination,
}

#[async_trait]
impl ToolExecutor for ListIssues {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let query = QueryBuilder::new()
            .optional("state", self.state)
            .optional("labels", self.labels.as_deref())
            .optional("search", self.search.as_deref())
            .optional("assignee_id", self.assignee_id)
            .paginate(self.pagination, DEFAULT_ISSUES_PER_PAGE);

        let page = ctx.gitlab.list_issues(&self.project_id, query).await?;
        Ok(ToolOutput::page(page))
    }
}

/// Get an issue
#[gitlab_tool(
    name = "gitlab_get_issue",
    description = "Get a single issue",
    category = "issues",
    operation = "read"
)]
pub struct GetIssue {
    /// Project ID or path
    pub project_id: RemoteId,
    pub issue_iid: u64,
}

#[async_trait]
impl ToolExecutor for GetIssue {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        ToolOutput::json_value(ctx.gitlab.get_issue(&self.project_id, self.issue_iid).await?)
    }
}

/// Create an issue
#[gitlab_tool(
    name = "gitlab_create_issue",
    description = "Create an issue",
    category = "issues",
    operation = "write"
)]
pub struct CreateIssue {
    /// Project ID or path
    pub project_id: RemoteId,
    pub title: String,
    /// Markdown description
    #[serde(default)]
    pub description: Option<String>,
    /// Comma-separated label names
    #[serde(default)]
    pub labels: Option<String>,
    #[serde(default)]
    pub assignee_ids: Option<Vec<u64>>,
    #[serde(default)]
    pub milestone_id: Option<u64>,
    #[serde(default)]
    pub confidential: Option<bool>,
    #[serde(default)]
    pub weight: Option<u32>,
}

#[async_trait]
impl ToolExecutor for CreateIssue {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        ToolError::require_non_empty("title", &self.title)?;

        let body = JsonBody::new()
            .field("title", self.title.as_str())
            .optional("description", self.description.as_deref())
            .optional("labels", self.labels.as_deref())
            .optional("assignee_ids", self.assignee_ids.clone())
            .optional("milestone_id", self.milestone_id)
            .optional("confidential", self.confidential)
            .optional("weight", self.weight)
            .build();

        ToolOutput::json_value(ctx.gitlab.create_issue(&self.project_id, &body).await?)
    }
}

/// Update an issue
#[gitlab_tool(
    name = "gitlab_update_issue",
    description = "Update an issue; also closes or reopens it via state_event",
    category = "issues",
    operation = "write",
    idempotent = true
)]
pub struct UpdateIssue {
    /// Project ID or path
    pub project_id: RemoteId,
    pub issue_iid: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Comma-separated label names
    #[serde(default)]
    pub labels: Option<String>,
    #[serde(default)]
    pub assignee_ids: Option<Vec<u64>>,
    #[serde(default)]
    pub state_event: Option<StateEvent>,
    #[serde(default)]
    pub weight: Option<u32>,
}

#[async_trait]
impl ToolExecutor for UpdateIssue {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let body = JsonBody::new()
            .optional("title", self.title.as_deref())
            .optional("description", self.description.as_deref())
            .optional("labels", self.labels.as_deref())
            .optional("assignee_ids", self.assignee_ids.clone())
            .optional("state_event", self.state_event)
            .optional("weight", self.weight)
            .build();

        let issue = ctx
            .gitlab
            .update_issue(&self.project_id, self.issue_iid, &body)
            .await?;
        ToolOutput::json_value(issue)
    }
}

/// Comment on an issue
#[gitlab_tool(
    name = "gitlab_add_issue_comment",
    description = "Add a comment to an issue",
    category = "issues",
    operation = "write"
)]
pub struct AddIssueComment {
    /// Project ID or path
    pub project_id: RemoteId,
    pub issue_iid: u64,
    /// Comment body (markdown)
    pub body: String,
}

#[async_trait]
impl ToolExecutor for AddIssueComment {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        ToolError::require_non_empty("body", &self.body)?;

        let body = JsonBody::new().field("body", self.body.as_str()).build();
        let note = ctx
            .gitlab
            .create_issue_note(&self.project_id, self.issue_iid, &body)
            .await?;
        ToolOutput::json_value(note)
    }
}
