//! Group and sharing tools

use crate::error::ToolError;
use crate::gitlab::{AccessLevel, RemoteId};
use crate::tools::executor::{ToolContext, ToolExecutor, ToolOutput};
use crate::util::Pagination;
use async_trait::async_trait;
use serde_json::json;

use mcp_gitlab_macros::gitlab_tool;

fn access_level(name: &str) -> Result<AccessLevel, ToolError> {
    AccessLevel::from_name(name).map_err(ToolError::InvalidArguments)
}

/// List groups
#[gitlab_tool(
    name = "gitlab_list_groups",
    description = "List groups visible to the authenticated user",
    category = "groups",
    operation = "read"
)]
pub struct ListGroups {
    /// Filter by name or path
    #[serde(default)]
    pub search: Option<String>,
    #[serde(flatten)]
    pub pagination: Pagination,
}

#[async_trait]
impl ToolExecutor for ListGroups {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let page = ctx
            .gitlab
            .list_groups(self.search.as_deref(), self.pagination)
            .await?;
        Ok(ToolOutput::page(page))
    }
}

/// Get a group
#[gitlab_tool(
    name = "gitlab_get_group",
    description = "Get details of a group",
    category = "groups",
    operation = "read"
)]
pub struct GetGroup {
    /// Group ID or full path
    pub group_id: RemoteId,
}

#[async_trait]
impl ToolExecutor for GetGroup {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        ToolOutput::json_value(ctx.gitlab.get_group(&self.group_id).await?)
    }
}

/// Share a project with a group
#[gitlab_tool(
    name = "gitlab_share_project_with_group",
    description = "Share a project with a group at the given access level (guest, reporter, developer, maintainer, owner)",
    category = "groups",
    operation = "write"
)]
pub struct ShareProjectWithGroup {
    /// Project ID or path
    pub project_id: RemoteId,
    /// ID of the group to share with
    pub group_id: u64,
    /// guest, reporter, developer, maintainer, or owner
    pub access_level: String,
}

#[async_trait]
impl ToolExecutor for ShareProjectWithGroup {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let level = access_level(&self.access_level)?;
        ctx.gitlab
            .share_project_with_group(&self.project_id, self.group_id, level)
            .await?;
        ToolOutput::json_value(json!({
            "status": "shared",
            "project_id": self.project_id.to_string(),
            "group_id": self.group_id,
        }))
    }
}

/// Stop sharing a project with a group
#[gitlab_tool(
    name = "gitlab_unshare_project_with_group",
    description = "Remove a group's access to a shared project",
    category = "groups",
    operation = "delete"
)]
pub struct UnshareProjectWithGroup {
    /// Project ID or path
    pub project_id: RemoteId,
    /// ID of the group to remove
    pub group_id: u64,
}

#[async_trait]
impl ToolExecutor for UnshareProjectWithGroup {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        ctx.gitlab
            .unshare_project_with_group(&self.project_id, self.group_id)
            .await?;
        ToolOutput::json_value(json!({
            "status": "unshared",
            "project_id": self.project_id.to_string(),
            "group_id": self.group_id,
        }))
    }
}

/// Share a group with another group
#[gitlab_tool(
    name = "gitlab_share_group_with_group",
    description = "Give members of one group access to another group",
    category = "groups",
    operation = "write"
)]
pub struct ShareGroupWithGroup {
    /// Group receiving the new members (ID or path)
    pub target_group_id: RemoteId,
    /// ID of the group whose members get access
    pub source_group_id: u64,
    /// guest, reporter, developer, maintainer, or owner
    pub access_level: String,
}

#[async_trait]
impl ToolExecutor for ShareGroupWithGroup {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let level = access_level(&self.access_level)?;
        ctx.gitlab
            .share_group_with_group(&self.target_group_id, self.source_group_id, level)
            .await?;
        ToolOutput::json_value(json!({ "status": "shared" }))
    }
}

/// Stop sharing a group with another group
#[gitlab_tool(
    name = "gitlab_unshare_group_with_group",
    description = "Remove a group's access to another group",
    category = "groups",
    operation = "delete"
)]
pub struct UnshareGroupWithGroup {
    /// Group that was shared (ID or path)
    pub target_group_id: RemoteId,
    /// ID of the group to remove
    pub source_group_id: u64,
}

#[async_trait]
impl ToolExecutor for UnshareGroupWithGroup {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        ctx.gitlab
            .unshare_group_with_group(&self.target_group_id, self.source_group_id)
            .await?;
        ToolOutput::json_value(json!({ "status": "unshared" }))
    }
}
