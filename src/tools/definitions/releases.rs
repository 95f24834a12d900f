//! Release tools

use crate::error::ToolError;
use crate::gitlab::RemoteId;
use crate::tools::executor::{ToolContext, ToolExecutor, ToolOutput};
use crate::util::{JsonBody, Pagination};
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::json;

use mcp_gitlab_macros::gitlab_tool;

/// List releases
#[gitlab_tool(
    name = "gitlab_list_releases",
    description = "List releases of a project",
    category = "releases",
    operation = "read"
)]
pub struct ListReleases {
    /// Project ID or path
    pub project_id: RemoteId,
    #[serde(flatten)]
    pub pagination: Pagination,
}

#[async_trait]
impl ToolExecutor for ListReleases {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let page = ctx
            .gitlab
            .list_releases(&self.project_id, self.pagination)
            .await?;
        Ok(ToolOutput::page(page))
    }
}

/// Get a release
#[gitlab_tool(
    name = "gitlab_get_release",
    description = "Get the release attached to a tag",
    category = "releases",
    operation = "read"
)]
pub struct GetRelease {
    /// Project ID or path
    pub project_id: RemoteId,
    pub tag_name: String,
}

#[async_trait]
impl ToolExecutor for GetRelease {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        ToolError::require_non_empty("tag_name", &self.tag_name)?;
        let release = ctx
            .gitlab
            .get_release(&self.project_id, &self.tag_name)
            .await?;
        ToolOutput::json_value(release)
    }
}

/// Asset link attached to a release
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ReleaseLink {
    pub name: String,
    pub url: String,
    /// other, runbook, image or package
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_type: Option<String>,
}

/// Create a release
#[gitlab_tool(
    name = "gitlab_create_release",
    description = "Create a release for a tag; pass ref to create the tag as well",
    category = "releases",
    operation = "write"
)]
pub struct CreateRelease {
    /// Project ID or path
    pub project_id: RemoteId,
    pub tag_name: String,
    #[serde(default)]
    pub name: Option<String>,
    /// Release notes (markdown)
    #[serde(default)]
    pub description: Option<String>,
    /// Branch or commit to tag when the tag does not exist yet
    #[serde(default, rename = "ref")]
    pub ref_name: Option<String>,
    /// ISO 8601 release date
    #[serde(default)]
    pub released_at: Option<String>,
    #[serde(default)]
    pub links: Option<Vec<ReleaseLink>>,
}

#[async_trait]
impl ToolExecutor for CreateRelease {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        ToolError::require_non_empty("tag_name", &self.tag_name)?;

        let assets = match &self.links {
            Some(links) => Some(json!({ "links": serde_json::to_value(links)? })),
            None => None,
        };
        let body = JsonBody::new()
            .field("tag_name", self.tag_name.as_str())
            .optional("name", self.name.as_deref())
            .optional("description", self.description.as_deref())
            .optional("ref", self.ref_name.as_deref())
            .optional("released_at", self.released_at.as_deref())
            .optional("assets", assets)
            .build();

        let release = ctx.gitlab.create_release(&self.project_id, &body).await?;
        ToolOutput::json_value(release)
    }
}

/// Update a release
#[gitlab_tool(
    name = "gitlab_update_release",
    description = "Update the name, notes or date of a release",
    category = "releases",
    operation = "write",
    idempotent = true
)]
pub struct UpdateRelease {
    /// Project ID or path
    pub project_id: RemoteId,
    pub tag_name: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub released_at: Option<String>,
}

#[async_trait]
impl ToolExecutor for UpdateRelease {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        ToolError::require_non_empty("tag_name", &self.tag_name)?;

        let body = JsonBody::new()
            .optional("name", self.name.as_deref())
            .optional("description", self.description.as_deref())
            .optional("released_at", self.released_at.as_deref())
            .build();

        let release = ctx
            .gitlab
            .update_release(&self.project_id, &self.tag_name, &body)
            .await?;
        ToolOutput::json_value(release)
    }
}

/// Delete a release
#[gitlab_tool(
    name = "gitlab_delete_release",
    description = "Delete a release; the tag itself is kept",
    category = "releases",
    operation = "delete"
)]
pub struct DeleteRelease {
    /// Project ID or path
    pub project_id: RemoteId,
    pub tag_name: String,
}

#[async_trait]
impl ToolExecutor for DeleteRelease {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        ToolError::require_non_empty("tag_name", &self.tag_name)?;
        ctx.gitlab
            .delete_release(&self.project_id, &self.tag_name)
            .await?;
        Ok(ToolOutput::status(
            "deleted",
            "tag_name",
            self.tag_name.as_str(),
        ))
    }
}
