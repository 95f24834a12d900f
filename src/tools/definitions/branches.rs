//! Branch tools

use crate::error::ToolError;
use crate::gitlab::RemoteId;
use crate::tools::executor::{ToolContext, ToolExecutor, ToolOutput};
use crate::util::Pagination;
use async_trait::async_trait;

use mcp_gitlab_macros::gitlab_tool;

/// List branches
#[gitlab_tool(
    name = "gitlab_list_branches",
    description = "List repository branches",
    category = "branches",
    operation = "read"
)]
pub struct ListBranches {
    /// Project ID or path
    pub project_id: RemoteId,
    /// Filter by branch name
    #[serde(default)]
    pub search: Option<String>,
    #[serde(flatten)]
    pub pagination: Pagination,
}

#[async_trait]
impl ToolExecutor for ListBranches {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let page = ctx
            .gitlab
            .list_branches(&self.project_id, self.search.as_deref(), self.pagination)
            .await?;
        Ok(ToolOutput::page(page))
    }
}

/// Create a branch
#[gitlab_tool(
    name = "gitlab_create_branch",
    description = "Create a new branch from a branch name or commit SHA",
    category = "branches",
    operation = "write"
)]
pub struct CreateBranch {
    /// Project ID or path
    pub project_id: RemoteId,
    /// New branch name
    pub branch_name: String,
    /// Source branch or commit SHA
    #[serde(rename = "ref")]
    pub ref_name: String,
}

#[async_trait]
impl ToolExecutor for CreateBranch {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        ToolError::require_non_empty("branch_name", &self.branch_name)?;
        ToolError::require_non_empty("ref", &self.ref_name)?;

        let branch = ctx
            .gitlab
            .create_branch(&self.project_id, &self.branch_name, &self.ref_name)
            .await?;
        ToolOutput::json_value(branch)
    }
}

/// Delete a branch
#[gitlab_tool(
    name = "gitlab_delete_branch",
    description = "Delete a branch",
    category = "branches",
    operation = "delete"
)]
pub struct DeleteBranch {
    /// Project ID or path
    pub project_id: RemoteId,
    /// Branch to delete
    pub branch_name: String,
}

#[async_trait]
impl ToolExecutor for DeleteBranch {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        ToolError::require_non_empty("branch_name", &self.branch_name)?;
        ctx.gitlab
            .delete_branch(&self.project_id, &self.branch_name)
            .await?;
        Ok(ToolOutput::status(
            "deleted",
            "branch",
            self.branch_name.as_str(),
        ))
    }
}
