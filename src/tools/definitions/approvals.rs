//! Approval settings and approval rule tools

use crate::error::ToolError;
use crate::gitlab::RemoteId;
use crate::tools::executor::{ToolContext, ToolExecutor, ToolOutput};
use crate::util::{JsonBody, Pagination};
use async_trait::async_trait;
use serde_json::Value;

use mcp_gitlab_macros::gitlab_tool;

fn rule_body(
    name: Option<&str>,
    approvals_required: Option<u32>,
    user_ids: Option<&[u64]>,
    group_ids: Option<&[u64]>,
) -> Value {
    JsonBody::new()
        .optional("name", name)
        .optional("approvals_required", approvals_required)
        .optional("user_ids", user_ids.map(|ids| ids.to_vec()))
        .optional("group_ids", group_ids.map(|ids| ids.to_vec()))
        .build()
}

/// Get project approval settings
#[gitlab_tool(
    name = "gitlab_get_project_approvals",
    description = "Get the approval configuration of a project",
    category = "approvals",
    operation = "read"
)]
pub struct GetProjectApprovals {
    /// Project ID or path
    pub project_id: RemoteId,
}

#[async_trait]
impl ToolExecutor for GetProjectApprovals {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        ToolOutput::json_value(ctx.gitlab.get_project_approvals(&self.project_id).await?)
    }
}

/// Update project approval settings
#[gitlab_tool(
    name = "gitlab_update_project_approvals",
    description = "Update the approval configuration of a project",
    category = "approvals",
    operation = "write",
    idempotent = true
)]
pub struct UpdateProjectApprovals {
    /// Project ID or path
    pub project_id: RemoteId,
    /// Approvals required before merge
    #[serde(default)]
    pub approvals_before_merge: Option<u32>,
    /// Drop existing approvals when new commits are pushed
    #[serde(default)]
    pub reset_approvals_on_push: Option<bool>,
    /// Prevent editing approvers per merge request
    #[serde(default)]
    pub disable_overriding_approvers_per_merge_request: Option<bool>,
    /// Let authors approve their own merge requests
    #[serde(default)]
    pub merge_requests_author_approval: Option<bool>,
    /// Prevent committers from approving
    #[serde(default)]
    pub merge_requests_disable_committers_approval: Option<bool>,
}

#[async_trait]
impl ToolExecutor for UpdateProjectApprovals {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let body = JsonBody::new()
            .optional("approvals_before_merge", self.approvals_before_merge)
            .optional("reset_approvals_on_push", self.reset_approvals_on_push)
            .optional(
                "disable_overriding_approvers_per_merge_request",
                self.disable_overriding_approvers_per_merge_request,
            )
            .optional(
                "merge_requests_author_approval",
                self.merge_requests_author_approval,
            )
            .optional(
                "merge_requests_disable_committers_approval",
                self.merge_requests_disable_committers_approval,
            )
            .build();

        let result = ctx
            .gitlab
            .update_project_approvals(&self.project_id, &body)
            .await?;
        ToolOutput::json_value(result)
    }
}

/// List project approval rules
#[gitlab_tool(
    name = "gitlab_list_project_approval_rules",
    description = "List the approval rules of a project",
    category = "approvals",
    operation = "read"
)]
pub struct ListProjectApprovalRules {
    /// Project ID or path
    pub project_id: RemoteId,
    #[serde(flatten)]
    pub pagination: Pagination,
}

#[async_trait]
impl ToolExecutor for ListProjectApprovalRules {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let page = ctx
            .gitlab
            .list_project_approval_rules(&self.project_id, self.pagination)
            .await?;
        Ok(ToolOutput::page(page))
    }
}

/// Create a project approval rule
#[gitlab_tool(
    name = "gitlab_create_project_approval_rule",
    description = "Create an approval rule on a project",
    category = "approvals",
    operation = "write"
)]
pub struct CreateProjectApprovalRule {
    /// Project ID or path
    pub project_id: RemoteId,
    /// Rule name
    pub name: String,
    /// Number of approvals required
    pub approvals_required: u32,
    /// Users who may approve
    #[serde(default)]
    pub user_ids: Option<Vec<u64>>,
    /// Groups whose members may approve
    #[serde(default)]
    pub group_ids: Option<Vec<u64>>,
}

#[async_trait]
impl ToolExecutor for CreateProjectApprovalRule {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        ToolError::require_non_empty("name", &self.name)?;
        let body = rule_body(
            Some(&self.name),
            Some(self.approvals_required),
            self.user_ids.as_deref(),
            self.group_ids.as_deref(),
        );
        let result = ctx
            .gitlab
            .create_project_approval_rule(&self.project_id, &body)
            .await?;
        ToolOutput::json_value(result)
    }
}

/// Update a project approval rule
#[gitlab_tool(
    name = "gitlab_update_project_approval_rule",
    description = "Update an approval rule on a project",
    category = "approvals",
    operation = "write",
    idempotent = true
)]
pub struct UpdateProjectApprovalRule {
    /// Project ID or path
    pub project_id: RemoteId,
    /// Approval rule ID
    pub rule_id: u64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub approvals_required: Option<u32>,
    #[serde(default)]
    pub user_ids: Option<Vec<u64>>,
    #[serde(default)]
    pub group_ids: Option<Vec<u64>>,
}

#[async_trait]
impl ToolExecutor for UpdateProjectApprovalRule {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let body = rule_body(
            self.name.as_deref(),
            self.approvals_required,
            self.user_ids.as_deref(),
            self.group_ids.as_deref(),
        );
        let result = ctx
            .gitlab
            .update_project_approval_rule(&self.project_id, self.rule_id, &body)
            .await?;
        ToolOutput::json_value(result)
    }
}

/// Delete a project approval rule
#[gitlab_tool(
    name = "gitlab_delete_project_approval_rule",
    description = "Delete an approval rule from a project",
    category = "approvals",
    operation = "delete"
)]
pub struct DeleteProjectApprovalRule {
    /// Project ID or path
    pub project_id: RemoteId,
    /// Approval rule ID
    pub rule_id: u64,
}

#[async_trait]
impl ToolExecutor for DeleteProjectApprovalRule {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        ctx.gitlab
            .delete_project_approval_rule(&self.project_id, self.rule_id)
            .await?;
        Ok(ToolOutput::status("deleted", "rule_id", self.rule_id))
    }
}

/// List merge request approval rules
#[gitlab_tool(
    name = "gitlab_list_mr_approval_rules",
    description = "List the approval rules of a merge request",
    category = "approvals",
    operation = "read"
)]
pub struct ListMrApprovalRules {
    /// Project ID or path
    pub project_id: RemoteId,
    /// Merge request IID
    pub mr_iid: u64,
    #[serde(flatten)]
    pub pagination: Pagination,
}

#[async_trait]
impl ToolExecutor for ListMrApprovalRules {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let page = ctx
            .gitlab
            .list_mr_approval_rules(&self.project_id, self.mr_iid, self.pagination)
            .await?;
        Ok(ToolOutput::page(page))
    }
}

/// Create a merge request approval rule
#[gitlab_tool(
    name = "gitlab_create_mr_approval_rule",
    description = "Create an approval rule on a merge request",
    category = "approvals",
    operation = "write"
)]
pub struct CreateMrApprovalRule {
    /// Project ID or path
    pub project_id: RemoteId,
    /// Merge request IID
    pub mr_iid: u64,
    /// Rule name
    pub name: String,
    /// Number of approvals required
    pub approvals_required: u32,
    #[serde(default)]
    pub user_ids: Option<Vec<u64>>,
    #[serde(default)]
    pub group_ids: Option<Vec<u64>>,
}

#[async_trait]
impl ToolExecutor for CreateMrApprovalRule {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        ToolError::require_non_empty("name", &self.name)?;
        let body = rule_body(
            Some(&self.name),
            Some(self.approvals_required),
            self.user_ids.as_deref(),
            self.group_ids.as_deref(),
        );
        let result = ctx
            .gitlab
            .create_mr_approval_rule(&self.project_id, self.mr_iid, &body)
            .await?;
        ToolOutput::json_value(result)
    }
}

/// Update a merge request approval rule
#[gitlab_tool(
    name = "gitlab_update_mr_approval_rule",
    description = "Update an approval rule on a merge request",
    category = "approvals",
    operation = "write",
    idempotent = true
)]
pub struct UpdateMrApprovalRule {
    /// Project ID or path
    pub project_id: RemoteId,
    /// Merge request IID
    pub mr_iid: u64,
    /// Approval rule ID
    pub rule_id: u64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub approvals_required: Option<u32>,
    #[serde(default)]
    pub user_ids: Option<Vec<u64>>,
    #[serde(default)]
    pub group_ids: Option<Vec<u64>>,
}

#[async_trait]
impl ToolExecutor for UpdateMrApprovalRule {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let body = rule_body(
            self.name.as_deref(),
            self.approvals_required,
            self.user_ids.as_deref(),
            self.group_ids.as_deref(),
        );
        let result = ctx
            .gitlab
            .update_mr_approval_rule(&self.project_id, self.mr_iid, self.rule_id, &body)
            .await?;
        ToolOutput::json_value(result)
    }
}

/// Delete a merge request approval rule
#[gitlab_tool(
    name = "gitlab_delete_mr_approval_rule",
    description = "Delete an approval rule from a merge request",
    category = "approvals",
    operation = "delete"
)]
pub struct DeleteMrApprovalRule {
    /// Project ID or path
    pub project_id: RemoteId,
    /// Merge request IID
    pub mr_iid: u64,
    /// Approval rule ID
    pub rule_id: u64,
}

#[async_trait]
impl ToolExecutor for DeleteMrApprovalRule {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        ctx.gitlab
            .delete_mr_approval_rule(&self.project_id, self.mr_iid, self.rule_id)
            .await?;
        Ok(ToolOutput::status("deleted", "rule_id", self.rule_id))
    }
}
