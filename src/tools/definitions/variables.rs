//! CI/CD variable tools, project and group level
//!
//! Values of variables flagged `masked` never leave the server: every tool
//! returning a variable replaces them with
//! [`MASKED_PLACEHOLDER`](crate::tools::MASKED_PLACEHOLDER).

use crate::error::ToolError;
use crate::gitlab::{RemoteId, VariableType};
use crate::tools::executor::{ToolContext, ToolExecutor, ToolOutput};
use crate::util::{JsonBody, Pagination};
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;

use mcp_gitlab_macros::gitlab_tool;

/// Settings shared by every create and update call
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct VariableSettings {
    #[serde(default)]
    pub variable_type: Option<VariableType>,
    /// Only exposed to protected branches and tags
    #[serde(default)]
    pub protected: Option<bool>,
    /// Hidden in job logs
    #[serde(default)]
    pub masked: Option<bool>,
    /// Do not expand `$VAR` references
    #[serde(default)]
    pub raw: Option<bool>,
    #[serde(default)]
    pub description: Option<String>,
}

impl VariableSettings {
    fn apply(&self, body: JsonBody) -> JsonBody {
        body.optional("variable_type", self.variable_type)
            .optional("protected", self.protected)
            .optional("masked", self.masked)
            .optional("raw", self.raw)
            .optional("description", self.description.as_deref())
    }
}

/// List project variables
#[gitlab_tool(
    name = "gitlab_list_variables",
    description = "List a project's CI/CD variables; masked values are shown as ***MASKED***",
    category = "variables",
    operation = "read"
)]
pub struct ListVariables {
    /// Project ID or path
    pub project_id: RemoteId,
    #[serde(flatten)]
    pub pagination: Pagination,
}

#[async_trait]
impl ToolExecutor for ListVariables {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let page = ctx
            .gitlab
            .list_project_variables(&self.project_id, self.pagination)
            .await?;
        Ok(ToolOutput::page(page).mask_variables())
    }
}

/// Create a project variable
#[gitlab_tool(
    name = "gitlab_create_variable",
    description = "Create a project CI/CD variable",
    category = "variables",
    operation = "write"
)]
pub struct CreateVariable {
    /// Project ID or path
    pub project_id: RemoteId,
    pub key: String,
    pub value: String,
    /// Environment scope (GitLab default `*`)
    #[serde(default)]
    pub environment_scope: Option<String>,
    #[serde(flatten)]
    pub settings: VariableSettings,
}

#[async_trait]
impl ToolExecutor for CreateVariable {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        ToolError::require_non_empty("key", &self.key)?;

        let body = JsonBody::new()
            .field("key", self.key.as_str())
            .field("value", self.value.as_str())
            .optional("environment_scope", self.environment_scope.as_deref());
        let body = self.settings.apply(body).build();

        let variable = ctx
            .gitlab
            .create_project_variable(&self.project_id, &body)
            .await?;
        Ok(ToolOutput::json_value(variable)?.mask_variables())
    }
}

/// Update a project variable
#[gitlab_tool(
    name = "gitlab_update_variable",
    description = "Update a project CI/CD variable; environment_scope selects which variant of the key to change",
    category = "variables",
    operation = "write",
    idempotent = true
)]
pub struct UpdateVariable {
    /// Project ID or path
    pub project_id: RemoteId,
    pub key: String,
    pub value: String,
    /// Which scoped variant of the key to update
    #[serde(default)]
    pub environment_scope: Option<String>,
    #[serde(flatten)]
    pub settings: VariableSettings,
}

#[async_trait]
impl ToolExecutor for UpdateVariable {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        ToolError::require_non_empty("key", &self.key)?;

        let body = self
            .settings
            .apply(JsonBody::new().field("value", self.value.as_str()))
            .build();

        let variable = ctx
            .gitlab
            .update_project_variable(
                &self.project_id,
                &self.key,
                self.environment_scope.as_deref(),
                &body,
            )
            .await?;
        Ok(ToolOutput::json_value(variable)?.mask_variables())
    }
}

/// Delete a project variable
#[gitlab_tool(
    name = "gitlab_delete_variable",
    description = "Delete a project CI/CD variable",
    category = "variables",
    operation = "delete"
)]
pub struct DeleteVariable {
    /// Project ID or path
    pub project_id: RemoteId,
    pub key: String,
    /// Which scoped variant of the key to delete
    #[serde(default)]
    pub environment_scope: Option<String>,
}

#[async_trait]
impl ToolExecutor for DeleteVariable {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        ToolError::require_non_empty("key", &self.key)?;
        ctx.gitlab
            .delete_project_variable(
                &self.project_id,
                &self.key,
                self.environment_scope.as_deref(),
            )
            .await?;
        Ok(ToolOutput::status("deleted", "key", self.key.as_str()))
    }
}

/// List group variables
#[gitlab_tool(
    name = "gitlab_list_group_variables",
    description = "List a group's CI/CD variables; masked values are shown as ***MASKED***",
    category = "variables",
    operation = "read"
)]
pub struct ListGroupVariables {
    /// Group ID or path
    pub group_id: RemoteId,
    #[serde(flatten)]
    pub pagination: Pagination,
}

#[async_trait]
impl ToolExecutor for ListGroupVariables {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let page = ctx
            .gitlab
            .list_group_variables(&self.group_id, self.pagination)
            .await?;
        Ok(ToolOutput::page(page).mask_variables())
    }
}

/// Create a group variable
#[gitlab_tool(
    name = "gitlab_create_group_variable",
    description = "Create a group CI/CD variable",
    category = "variables",
    operation = "write"
)]
pub struct CreateGroupVariable {
    /// Group ID or path
    pub group_id: RemoteId,
    pub key: String,
    pub value: String,
    #[serde(default)]
    pub environment_scope: Option<String>,
    #[serde(flatten)]
    pub settings: VariableSettings,
}

#[async_trait]
impl ToolExecutor for CreateGroupVariable {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        ToolError::require_non_empty("key", &self.key)?;

        let body = JsonBody::new()
            .field("key", self.key.as_str())
            .field("value", self.value.as_str())
            .optional("environment_scope", self.environment_scope.as_deref());
        let body = self.settings.apply(body).build();

        let variable = ctx
            .gitlab
            .create_group_variable(&self.group_id, &body)
            .await?;
        Ok(ToolOutput::json_value(variable)?.mask_variables())
    }
}

/// Update a group variable
#[gitlab_tool(
    name = "gitlab_update_group_variable",
    description = "Update a group CI/CD variable",
    category = "variables",
    operation = "write",
    idempotent = true
)]
pub struct UpdateGroupVariable {
    /// Group ID or path
    pub group_id: RemoteId,
    pub key: String,
    pub value: String,
    #[serde(flatten)]
    pub settings: VariableSettings,
}

#[async_trait]
impl ToolExecutor for UpdateGroupVariable {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        ToolError::require_non_empty("key", &self.key)?;

        let body = self
            .settings
            .apply(JsonBody::new().field("value", self.value.as_str()))
            .build();

        let variable = ctx
            .gitlab
            .update_group_variable(&self.group_id, &self.key, &body)
            .await?;
        Ok(ToolOutput::json_value(variable)?.mask_variables())
    }
}

/// Delete a group variable
#[gitlab_tool(
    name = "gitlab_delete_group_variable",
    description = "Delete a group CI/CD variable",
    category = "variables",
    operation = "delete"
)]
pub struct DeleteGroupVariable {
    /// Group ID or path
    pub group_id: RemoteId,
    pub key: String,
    /// Which scoped variant of the key to delete
    #[serde(default)]
    pub environment_scope: Option<String>,
}

#[async_trait]
impl ToolExecutor for DeleteGroupVariable {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        ToolError::require_non_empty("key", &self.key)?;
        ctx.gitlab
            .delete_group_variable(&self.group_id, &self.key, self.environment_scope.as_deref())
            .await?;
        Ok(ToolOutput::status("deleted", "key", self.key.as_str()))
    }
}
