//! Project tools

use crate::error::ToolError;
use crate::gitlab::{MergeMethod, RemoteId, SquashOption, Visibility};
use crate::tools::executor::{ToolContext, ToolExecutor, ToolOutput};
use crate::util::JsonBody;
use async_trait::async_trait;

use mcp_gitlab_macros::gitlab_tool;

/// Get a project
#[gitlab_tool(
    name = "gitlab_get_project",
    description = "Get details of a GitLab project: default branch, visibility, merge settings, and URLs",
    category = "projects",
    operation = "read"
)]
pub struct GetProject {
    /// Project ID or URL-encoded path (e.g. "my-group/my-project")
    pub project_id: RemoteId,
}

#[async_trait]
impl ToolExecutor for GetProject {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        ToolOutput::json_value(ctx.gitlab.get_project(&self.project_id).await?)
    }
}

/// Create a project
#[gitlab_tool(
    name = "gitlab_create_project",
    description = "Create a new GitLab project",
    category = "projects",
    operation = "write"
)]
pub struct CreateProject {
    /// Project name
    pub name: String,
    /// Project path/slug (derived from the name when omitted)
    #[serde(default)]
    pub path: Option<String>,
    /// Namespace or group ID to create the project in
    #[serde(default)]
    pub namespace_id: Option<u64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub visibility: Option<Visibility>,
    /// Create the repository with an initial README
    #[serde(default)]
    pub initialize_with_readme: Option<bool>,
    #[serde(default)]
    pub default_branch: Option<String>,
}

#[async_trait]
impl ToolExecutor for CreateProject {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        ToolError::require_non_empty("name", &self.name)?;

        let body = JsonBody::new()
            .field("name", self.name.as_str())
            .optional("path", self.path.as_deref())
            .optional("namespace_id", self.namespace_id)
            .optional("description", self.description.as_deref())
            .optional("visibility", self.visibility)
            .optional("initialize_with_readme", self.initialize_with_readme)
            .optional("default_branch", self.default_branch.as_deref())
            .build();

        ToolOutput::json_value(ctx.gitlab.create_project(&body).await?)
    }
}

/// Delete a project
#[gitlab_tool(
    name = "gitlab_delete_project",
    description = "Delete a GitLab project. This action is irreversible",
    category = "projects",
    operation = "delete"
)]
pub struct DeleteProject {
    /// Project ID or path
    pub project_id: RemoteId,
}

#[async_trait]
impl ToolExecutor for DeleteProject {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        ctx.gitlab.delete_project(&self.project_id).await?;
        Ok(ToolOutput::status(
            "deleted",
            "project_id",
            self.project_id.to_string(),
        ))
    }
}

/// Update project merge settings
#[gitlab_tool(
    name = "gitlab_update_project_merge_settings",
    description = "Update merge settings of a project: pipeline and discussion requirements, squash option, merge method",
    category = "projects",
    operation = "write",
    idempotent = true
)]
pub struct UpdateProjectMergeSettings {
    /// Project ID or path
    pub project_id: RemoteId,
    /// Require a passing pipeline before merge
    #[serde(default)]
    pub only_allow_merge_if_pipeline_succeeds: Option<bool>,
    /// Require all discussions resolved before merge
    #[serde(default)]
    pub only_allow_merge_if_all_discussions_are_resolved: Option<bool>,
    /// Delete the source branch after merge by default
    #[serde(default)]
    pub remove_source_branch_after_merge: Option<bool>,
    #[serde(default)]
    pub squash_option: Option<SquashOption>,
    #[serde(default)]
    pub merge_method: Option<MergeMethod>,
}

#[async_trait]
impl ToolExecutor for UpdateProjectMergeSettings {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let body = JsonBody::new()
            .optional(
                "only_allow_merge_if_pipeline_succeeds",
                self.only_allow_merge_if_pipeline_succeeds,
            )
            .optional(
                "only_allow_merge_if_all_discussions_are_resolved",
                self.only_allow_merge_if_all_discussions_are_resolved,
            )
            .optional(
                "remove_source_branch_after_merge",
                self.remove_source_branch_after_merge,
            )
            .optional("squash_option", self.squash_option)
            .optional("merge_method", self.merge_method);

        if body.is_empty() {
            return Err(ToolError::InvalidArguments(
                "at least one setting must be provided".to_string(),
            ));
        }

        let result = ctx
            .gitlab
            .update_project(&self.project_id, &body.build())
            .await?;
        ToolOutput::json_value(result)
    }
}
