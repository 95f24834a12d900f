//! Merge request tools

use crate::error::ToolError;
use crate::gitlab::{MergeRequestScope, MergeRequestState, RemoteId, StateEvent};
use crate::tools::executor::{ToolContext, ToolExecutor, ToolOutput};
use crate::util::{JsonBody, Pagination, QueryBuilder};
use async_trait::async_trait;
use serde_json::{Value, json};
use tracing::{debug, info};

use mcp_gitlab_macros::gitlab_tool;

const DEFAULT_MRS_PER_PAGE: u32 = 20;

/// Merge statuses that allow a merge to go ahead
const MERGEABLE_STATUSES: &[&str] = &["mergeable", "can_be_merged"];

/// List merge requests
#[gitlab_tool(
    name = "gitlab_list_mrs",
    description = "List merge requests of a project",
    category = "merge_requests",
    operation = "read"
)]
pub struct ListMrs {
    /// Project ID or path
    pub project_id: RemoteId,
    #[serde(default)]
    pub state: Option<MergeRequestState>,
    #[serde(default)]
    pub scope: Option<MergeRequestScope>,
    #[serde(default)]
    pub source_branch: Option<String>,
    #[serde(default)]
    pub target_branch: Option<String>,
    /// Search in title and description
    #[serde(default)]
    pub search: Option<String>,
    /// Comma-separated label names
    #[serde(default)]
    pub labels: Option<String>,
    #[serde(flatten)]
    pub pagination: Pagination,
}

#[async_trait]
impl ToolExecutor for ListMrs {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let query = QueryBuilder::new()
            .optional("state", self.state)
            .optional("scope", self.scope)
            .optional("source_branch", self.source_branch.as_deref())
            .optional("target_branch", self.target_branch.as_deref())
            .optional("search", self.search.as_deref())
            .optional("labels", self.labels.as_deref())
            .paginate(self.pagination, DEFAULT_MRS_PER_PAGE);

        let page = ctx
            .gitlab
            .list_merge_requests(&self.project_id, query)
            .await?;
        Ok(ToolOutput::page(page))
    }
}

/// Get a merge request
#[gitlab_tool(
    name = "gitlab_get_mr",
    description = "Get merge request details: title, state, branches, author, diff_refs and merge status",
    category = "merge_requests",
    operation = "read"
)]
pub struct GetMr {
    /// Project ID or path
    pub project_id: RemoteId,
    /// Merge request IID
    pub mr_iid: u64,
}

#[async_trait]
impl ToolExecutor for GetMr {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let mr = ctx
            .gitlab
            .get_merge_request(&self.project_id, self.mr_iid)
            .await?;
        ToolOutput::json_value(mr)
    }
}

/// Create a merge request
#[gitlab_tool(
    name = "gitlab_create_mr",
    description = "Create a merge request",
    category = "merge_requests",
    operation = "write"
)]
pub struct CreateMr {
    /// Project ID or path
    pub project_id: RemoteId,
    pub source_branch: String,
    pub target_branch: String,
    pub title: String,
    /// Markdown description
    #[serde(default)]
    pub description: Option<String>,
    /// Create as draft
    #[serde(default)]
    pub draft: Option<bool>,
    /// Squash commits on merge
    #[serde(default)]
    pub squash: Option<bool>,
    /// Delete the source branch on merge
    #[serde(default)]
    pub remove_source_branch: Option<bool>,
    /// Comma-separated label names
    #[serde(default)]
    pub labels: Option<String>,
}

#[async_trait]
impl ToolExecutor for CreateMr {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        ToolError::require_non_empty("source_branch", &self.source_branch)?;
        ToolError::require_non_empty("target_branch", &self.target_branch)?;
        ToolError::require_non_empty("title", &self.title)?;

        let body = JsonBody::new()
            .field("source_branch", self.source_branch.as_str())
            .field("target_branch", self.target_branch.as_str())
            .field("title", self.title.as_str())
            .optional("description", self.description.as_deref())
            .optional("draft", self.draft)
            .optional("squash", self.squash)
            .optional("remove_source_branch", self.remove_source_branch)
            .optional("labels", self.labels.as_deref())
            .build();

        let mr = ctx
            .gitlab
            .create_merge_request(&self.project_id, &body)
            .await?;
        ToolOutput::json_value(mr)
    }
}

/// Update a merge request
#[gitlab_tool(
    name = "gitlab_update_mr",
    description = "Update a merge request; also closes or reopens it via state_event",
    category = "merge_requests",
    operation = "write",
    idempotent = true
)]
pub struct UpdateMr {
    /// Project ID or path
    pub project_id: RemoteId,
    /// Merge request IID
    pub mr_iid: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub target_branch: Option<String>,
    /// Comma-separated label names
    #[serde(default)]
    pub labels: Option<String>,
    #[serde(default)]
    pub squash: Option<bool>,
    #[serde(default)]
    pub remove_source_branch: Option<bool>,
    #[serde(default)]
    pub draft: Option<bool>,
    #[serde(default)]
    pub state_event: Option<StateEvent>,
}

#[async_trait]
impl ToolExecutor for UpdateMr {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let body = JsonBody::new()
            .optional("title", self.title.as_deref())
            .optional("description", self.description.as_deref())
            .optional("target_branch", self.target_branch.as_deref())
            .optional("labels", self.labels.as_deref())
            .optional("squash", self.squash)
            .optional("remove_source_branch", self.remove_source_branch)
            .optional("draft", self.draft)
            .optional("state_event", self.state_event)
            .build();

        let mr = ctx
            .gitlab
            .update_merge_request(&self.project_id, self.mr_iid, &body)
            .await?;
        ToolOutput::json_value(mr)
    }
}

/// Merge a merge request
#[gitlab_tool(
    name = "gitlab_merge_mr",
    description = "Merge a merge request",
    category = "merge_requests",
    operation = "execute"
)]
pub struct MergeMr {
    /// Project ID or path
    pub project_id: RemoteId,
    /// Merge request IID
    pub mr_iid: u64,
    #[serde(default)]
    pub squash: Option<bool>,
    /// Delete the source branch after merge
    #[serde(default)]
    pub delete_source_branch: Option<bool>,
    #[serde(default)]
    pub merge_commit_message: Option<String>,
    #[serde(default)]
    pub squash_commit_message: Option<String>,
    /// Merge once the head pipeline passes
    #[serde(default)]
    pub merge_when_pipeline_succeeds: Option<bool>,
}

#[async_trait]
impl ToolExecutor for MergeMr {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let body = JsonBody::new()
            .optional("squash", self.squash)
            .optional("should_remove_source_branch", self.delete_source_branch)
            .optional("merge_commit_message", self.merge_commit_message.as_deref())
            .optional(
                "squash_commit_message",
                self.squash_commit_message.as_deref(),
            )
            .optional(
                "merge_when_pipeline_succeeds",
                self.merge_when_pipeline_succeeds,
            )
            .build();

        let mr = ctx
            .gitlab
            .merge_merge_request(&self.project_id, self.mr_iid, &body)
            .await?;
        ToolOutput::json_value(mr)
    }
}

/// Merge several merge requests in order
#[gitlab_tool(
    name = "gitlab_merge_mr_sequence",
    description = "Merge several merge requests in the given order, stopping at the first one that is not mergeable or fails",
    category = "merge_requests",
    operation = "execute"
)]
pub struct MergeMrSequence {
    /// Project ID or path
    pub project_id: RemoteId,
    /// Merge request IIDs, merged in this order
    pub mr_iids: Vec<u64>,
    #[serde(default)]
    pub squash: Option<bool>,
    /// Delete each source branch after merge
    #[serde(default)]
    pub delete_source_branch: Option<bool>,
    #[serde(default)]
    pub merge_when_pipeline_succeeds: Option<bool>,
    /// Check each merge request's merge status before merging it
    #[serde(default = "default_true")]
    pub require_mergeable_status: bool,
}

fn default_true() -> bool {
    true
}

/// `detailed_merge_status`, falling back to the older `merge_status`
fn merge_status(mr: &Value) -> &str {
    mr.get("detailed_merge_status")
        .and_then(Value::as_str)
        .or_else(|| mr.get("merge_status").and_then(Value::as_str))
        .unwrap_or("")
}

#[async_trait]
impl ToolExecutor for MergeMrSequence {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        if self.mr_iids.is_empty() {
            return Err(ToolError::InvalidArguments(
                "'mr_iids' must contain at least one merge request".to_string(),
            ));
        }

        let body = JsonBody::new()
            .optional("squash", self.squash)
            .optional("should_remove_source_branch", self.delete_source_branch)
            .optional(
                "merge_when_pipeline_succeeds",
                self.merge_when_pipeline_succeeds,
            )
            .build();

        let mut merged: Vec<u64> = Vec::with_capacity(self.mr_iids.len());

        for &iid in &self.mr_iids {
            if self.require_mergeable_status {
                let mr = ctx
                    .gitlab
                    .get_merge_request(&self.project_id, iid)
                    .await
                    .map_err(|e| ToolError::Sequence {
                        message: format!("Reading MR !{} failed: {}", iid, e),
                        completed: merged.clone(),
                    })?;

                let status = merge_status(&mr);
                if !MERGEABLE_STATUSES.contains(&status) {
                    return Err(ToolError::Sequence {
                        message: format!("MR !{} is not mergeable (status: {})", iid, status),
                        completed: merged,
                    });
                }
            }

            ctx.gitlab
                .merge_merge_request(&self.project_id, iid, &body)
                .await
                .map_err(|e| ToolError::Sequence {
                    message: format!("Merging MR !{} failed: {}", iid, e),
                    completed: merged.clone(),
                })?;

            debug!(iid, "Merged merge request");
            merged.push(iid);
        }

        info!(count = merged.len(), "Merged merge request sequence");
        ToolOutput::json_value(json!({ "status": "all_merged", "merged": merged }))
    }
}

/// Rebase a merge request
#[gitlab_tool(
    name = "gitlab_rebase_mr",
    description = "Rebase a merge request onto its target branch",
    category = "merge_requests",
    operation = "execute"
)]
pub struct RebaseMr {
    /// Project ID or path
    pub project_id: RemoteId,
    /// Merge request IID
    pub mr_iid: u64,
    /// Skip the CI pipeline for the rebased commits
    #[serde(default)]
    pub skip_ci: bool,
}

#[async_trait]
impl ToolExecutor for RebaseMr {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let result = ctx
            .gitlab
            .rebase_merge_request(&self.project_id, self.mr_iid, self.skip_ci)
            .await?;
        ToolOutput::json_value(result)
    }
}

/// Merge request file changes
#[gitlab_tool(
    name = "gitlab_mr_changes",
    description = "Get the file changes of a merge request with old/new paths and diffs",
    category = "merge_requests",
    operation = "read"
)]
pub struct MrChanges {
    /// Project ID or path
    pub project_id: RemoteId,
    /// Merge request IID
    pub mr_iid: u64,
}

#[async_trait]
impl ToolExecutor for MrChanges {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let changes = ctx
            .gitlab
            .merge_request_changes(&self.project_id, self.mr_iid)
            .await?;
        ToolOutput::json_value(changes)
    }
}
