//! Tag tools

use crate::error::ToolError;
use crate::gitlab::{RemoteId, SortOrder, TagOrderBy};
use crate::tools::executor::{ToolContext, ToolExecutor, ToolOutput};
use crate::util::{JsonBody, Pagination, QueryBuilder};
use async_trait::async_trait;

use mcp_gitlab_macros::gitlab_tool;

const DEFAULT_TAGS_PER_PAGE: u32 = 20;

/// List tags
#[gitlab_tool(
    name = "gitlab_list_tags",
    description = "List repository tags",
    category = "tags",
    operation = "read"
)]
pub struct ListTags {
    /// Project ID or path
    pub project_id: RemoteId,
    /// Filter by tag name
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub order_by: Option<TagOrderBy>,
    #[serde(default)]
    pub sort: Option<SortOrder>,
    #[serde(flatten)]
    pub pagination: Pagination,
}

#[async_trait]
impl ToolExecutor for ListTags {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let query = QueryBuilder::new()
            .optional("search", self.search.as_deref())
            .optional("order_by", self.order_by)
            .optional("sort", self.sort)
            .paginate(self.pagination, DEFAULT_TAGS_PER_PAGE);

        let page = ctx.gitlab.list_tags(&self.project_id, query).await?;
        Ok(ToolOutput::page(page))
    }
}

/// Get a tag
#[gitlab_tool(
    name = "gitlab_get_tag",
    description = "Get a single tag",
    category = "tags",
    operation = "read"
)]
pub struct GetTag {
    /// Project ID or path
    pub project_id: RemoteId,
    pub tag_name: String,
}

#[async_trait]
impl ToolExecutor for GetTag {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        ToolError::require_non_empty("tag_name", &self.tag_name)?;
        ToolOutput::json_value(ctx.gitlab.get_tag(&self.project_id, &self.tag_name).await?)
    }
}

/// Create a tag
#[gitlab_tool(
    name = "gitlab_create_tag",
    description = "Create a tag; a message makes it an annotated tag",
    category = "tags",
    operation = "write"
)]
pub struct CreateTag {
    /// Project ID or path
    pub project_id: RemoteId,
    pub tag_name: String,
    /// Branch or commit SHA to tag
    #[serde(rename = "ref")]
    pub ref_name: String,
    /// Annotation message
    #[serde(default)]
    pub message: Option<String>,
}

#[async_trait]
impl ToolExecutor for CreateTag {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        ToolError::require_non_empty("tag_name", &self.tag_name)?;
        ToolError::require_non_empty("ref", &self.ref_name)?;

        let message = self.message.as_deref().filter(|m| !m.is_empty());
        let body = JsonBody::new()
            .field("tag_name", self.tag_name.as_str())
            .field("ref", self.ref_name.as_str())
            .optional("message", message)
            .build();

        ToolOutput::json_value(ctx.gitlab.create_tag(&self.project_id, &body).await?)
    }
}

/// Delete a tag
#[gitlab_tool(
    name = "gitlab_delete_tag",
    description = "Delete a tag",
    category = "tags",
    operation = "delete"
)]
pub struct DeleteTag {
    /// Project ID or path
    pub project_id: RemoteId,
    pub tag_name: String,
}

#[async_trait]
impl ToolExecutor for DeleteTag {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        ToolError::require_non_empty("tag_name", &self.tag_name)?;
        ctx.gitlab.delete_tag(&self.project_id, &self.tag_name).await?;
        Ok(ToolOutput::status("deleted", "tag", self.tag_name.as_str()))
    }
}
