//! Merge request note (comment) and emoji tools

use crate::error::ToolError;
use crate::gitlab::RemoteId;
use crate::tools::executor::{ToolContext, ToolExecutor, ToolOutput};
use crate::util::{JsonBody, Pagination};
use async_trait::async_trait;
use serde_json::Value;

use mcp_gitlab_macros::gitlab_tool;

fn is_system_note(note: &Value) -> bool {
    note.get("system").and_then(Value::as_bool).unwrap_or(false)
}

/// List merge request notes
#[gitlab_tool(
    name = "gitlab_list_mr_notes",
    description = "List comments on a merge request; system notes are hidden unless include_system is set",
    category = "mr_notes",
    operation = "read"
)]
pub struct ListMrNotes {
    /// Project ID or path
    pub project_id: RemoteId,
    /// Merge request IID
    pub mr_iid: u64,
    /// Keep notes GitLab generates itself (pushes, label changes)
    #[serde(default)]
    pub include_system: bool,
    #[serde(flatten)]
    pub pagination: Pagination,
}

#[async_trait]
impl ToolExecutor for ListMrNotes {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let mut page = ctx
            .gitlab
            .list_mr_notes(&self.project_id, self.mr_iid, self.pagination)
            .await?;

        if !self.include_system {
            page.items.retain(|note| !is_system_note(note));
            // X-Total counts system notes too
            page.total = None;
        }
        Ok(ToolOutput::page(page))
    }
}

/// Add a merge request note
#[gitlab_tool(
    name = "gitlab_add_mr_note",
    description = "Add a comment to a merge request",
    category = "mr_notes",
    operation = "write"
)]
pub struct AddMrNote {
    /// Project ID or path
    pub project_id: RemoteId,
    /// Merge request IID
    pub mr_iid: u64,
    /// Comment body (markdown)
    pub body: String,
    /// Only visible to project members
    #[serde(default)]
    pub internal: bool,
}

#[async_trait]
impl ToolExecutor for AddMrNote {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        ToolError::require_non_empty("body", &self.body)?;

        let body = JsonBody::new()
            .field("body", self.body.as_str())
            .field("internal", self.internal)
            .build();
        let note = ctx
            .gitlab
            .create_mr_note(&self.project_id, self.mr_iid, &body)
            .await?;
        ToolOutput::json_value(note)
    }
}

/// Delete a merge request note
#[gitlab_tool(
    name = "gitlab_delete_mr_note",
    description = "Delete a comment from a merge request",
    category = "mr_notes",
    operation = "delete"
)]
pub struct DeleteMrNote {
    /// Project ID or path
    pub project_id: RemoteId,
    /// Merge request IID
    pub mr_iid: u64,
    pub note_id: u64,
}

#[async_trait]
impl ToolExecutor for DeleteMrNote {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        ctx.gitlab
            .delete_mr_note(&self.project_id, self.mr_iid, self.note_id)
            .await?;
        Ok(ToolOutput::status("deleted", "note_id", self.note_id))
    }
}

/// Edit a merge request note
#[gitlab_tool(
    name = "gitlab_update_mr_note",
    description = "Replace the body of a merge request comment",
    category = "mr_notes",
    operation = "write",
    idempotent = true
)]
pub struct UpdateMrNote {
    /// Project ID or path
    pub project_id: RemoteId,
    /// Merge request IID
    pub mr_iid: u64,
    pub note_id: u64,
    /// New body (markdown)
    pub body: String,
}

#[async_trait]
impl ToolExecutor for UpdateMrNote {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        ToolError::require_non_empty("body", &self.body)?;
        let note = ctx
            .gitlab
            .update_mr_note(&self.project_id, self.mr_iid, self.note_id, &self.body)
            .await?;
        ToolOutput::json_value(note)
    }
}

/// React to a note
#[gitlab_tool(
    name = "gitlab_award_emoji",
    description = "Add an emoji reaction to a merge request comment",
    category = "mr_notes",
    operation = "write"
)]
pub struct AwardEmoji {
    /// Project ID or path
    pub project_id: RemoteId,
    /// Merge request IID
    pub mr_iid: u64,
    pub note_id: u64,
    /// Emoji name without colons (e.g. thumbsup, eyes)
    pub emoji: String,
}

#[async_trait]
impl ToolExecutor for AwardEmoji {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        ToolError::require_non_empty("emoji", &self.emoji)?;
        let award = ctx
            .gitlab
            .award_note_emoji(&self.project_id, self.mr_iid, self.note_id, &self.emoji)
            .await?;
        ToolOutput::json_value(award)
    }
}

/// Remove a reaction
#[gitlab_tool(
    name = "gitlab_remove_emoji",
    description = "Remove an emoji reaction from a merge request comment",
    category = "mr_notes",
    operation = "delete"
)]
pub struct RemoveEmoji {
    /// Project ID or path
    pub project_id: RemoteId,
    /// Merge request IID
    pub mr_iid: u64,
    pub note_id: u64,
    /// ID of the award to remove
    pub award_id: u64,
}

#[async_trait]
impl ToolExecutor for RemoveEmoji {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        ctx.gitlab
            .delete_note_emoji(&self.project_id, self.mr_iid, self.note_id, self.award_id)
            .await?;
        Ok(ToolOutput::status("removed", "award_id", self.award_id))
    }
}
