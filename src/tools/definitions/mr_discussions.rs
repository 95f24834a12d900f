//! Merge request discussion (threaded review) tools

use crate::error::ToolError;
use crate::gitlab::{LineType, RemoteId};
use crate::tools::executor::{ToolContext, ToolExecutor, ToolOutput};
use crate::util::{JsonBody, Pagination};
use async_trait::async_trait;
use serde_json::{Value, json};

use mcp_gitlab_macros::gitlab_tool;

/// A thread is kept if at least one of its notes was written by a person
fn has_human_note(discussion: &Value) -> bool {
    discussion
        .get("notes")
        .and_then(Value::as_array)
        .is_some_and(|notes| {
            notes
                .iter()
                .any(|n| !n.get("system").and_then(Value::as_bool).unwrap_or(false))
        })
}

/// List merge request discussions
#[gitlab_tool(
    name = "gitlab_list_mr_discussions",
    description = "List discussion threads on a merge request, leaving out threads made only of system notes",
    category = "mr_discussions",
    operation = "read"
)]
pub struct ListMrDiscussions {
    /// Project ID or path
    pub project_id: RemoteId,
    /// Merge request IID
    pub mr_iid: u64,
    #[serde(flatten)]
    pub pagination: Pagination,
}

#[async_trait]
impl ToolExecutor for ListMrDiscussions {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let mut page = ctx
            .gitlab
            .list_mr_discussions(&self.project_id, self.mr_iid, self.pagination)
            .await?;

        let before = page.items.len();
        page.items.retain(has_human_note);
        if page.items.len() != before {
            page.total = None;
        }
        Ok(ToolOutput::page(page))
    }
}

/// Start a discussion
#[gitlab_tool(
    name = "gitlab_create_mr_discussion",
    description = "Start a discussion on a merge request. Supplying base_sha, head_sha, start_sha and new_path (from the MR's diff_refs) makes it an inline comment on the diff",
    category = "mr_discussions",
    operation = "write"
)]
pub struct CreateMrDiscussion {
    /// Project ID or path
    pub project_id: RemoteId,
    /// Merge request IID
    pub mr_iid: u64,
    /// Discussion body (markdown)
    pub body: String,
    #[serde(default)]
    pub base_sha: Option<String>,
    #[serde(default)]
    pub head_sha: Option<String>,
    #[serde(default)]
    pub start_sha: Option<String>,
    /// File the inline comment is attached to
    #[serde(default)]
    pub new_path: Option<String>,
    /// Previous file path, for renamed files
    #[serde(default)]
    pub old_path: Option<String>,
    /// Line in the new version of the file
    #[serde(default)]
    pub new_line: Option<u64>,
    /// Line in the old version of the file
    #[serde(default)]
    pub old_line: Option<u64>,
    /// First line of a multi-line comment
    #[serde(default)]
    pub line_range_start_line: Option<u64>,
    /// Last line of a multi-line comment
    #[serde(default)]
    pub line_range_end_line: Option<u64>,
    /// Side of the diff the range refers to (default new)
    #[serde(default)]
    pub line_range_type: Option<LineType>,
}

impl CreateMrDiscussion {
    /// Diff position, present only when every anchor field was supplied
    fn position(&self) -> Option<Value> {
        let (Some(base_sha), Some(head_sha), Some(start_sha), Some(new_path)) = (
            self.base_sha.as_deref(),
            self.head_sha.as_deref(),
            self.start_sha.as_deref(),
            self.new_path.as_deref(),
        ) else {
            return None;
        };

        let mut position = JsonBody::new()
            .field("base_sha", base_sha)
            .field("start_sha", start_sha)
            .field("head_sha", head_sha)
            .field("position_type", "text")
            .field("new_path", new_path)
            .field("old_path", self.old_path.as_deref().unwrap_or(new_path))
            .optional("new_line", self.new_line)
            .optional("old_line", self.old_line);

        if let (Some(start), Some(end)) = (self.line_range_start_line, self.line_range_end_line) {
            let kind = self.line_range_type.unwrap_or(LineType::New);
            let line_key = match kind {
                LineType::New => "new_line",
                LineType::Old => "old_line",
            };
            position = position.field(
                "line_range",
                json!({
                    "start": { "type": kind.as_str(), line_key: start },
                    "end": { "type": kind.as_str(), line_key: end },
                }),
            );
        }

        Some(position.build())
    }
}

#[async_trait]
impl ToolExecutor for CreateMrDiscussion {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        ToolError::require_non_empty("body", &self.body)?;

        let body = JsonBody::new()
            .field("body", self.body.as_str())
            .optional("position", self.position())
            .build();

        let discussion = ctx
            .gitlab
            .create_mr_discussion(&self.project_id, self.mr_iid, &body)
            .await?;
        ToolOutput::json_value(discussion)
    }
}

/// Reply to a discussion
#[gitlab_tool(
    name = "gitlab_reply_to_discussion",
    description = "Reply to an existing merge request discussion",
    category = "mr_discussions",
    operation = "write"
)]
pub struct ReplyToDiscussion {
    /// Project ID or path
    pub project_id: RemoteId,
    /// Merge request IID
    pub mr_iid: u64,
    pub discussion_id: String,
    /// Reply body (markdown)
    pub body: String,
}

#[async_trait]
impl ToolExecutor for ReplyToDiscussion {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        ToolError::require_non_empty("discussion_id", &self.discussion_id)?;
        ToolError::require_non_empty("body", &self.body)?;

        let note = ctx
            .gitlab
            .reply_to_mr_discussion(&self.project_id, self.mr_iid, &self.discussion_id, &self.body)
            .await?;
        ToolOutput::json_value(note)
    }
}

/// Resolve or reopen a discussion
#[gitlab_tool(
    name = "gitlab_resolve_discussion",
    description = "Resolve or unresolve a merge request discussion",
    category = "mr_discussions",
    operation = "write",
    idempotent = true
)]
pub struct ResolveDiscussion {
    /// Project ID or path
    pub project_id: RemoteId,
    /// Merge request IID
    pub mr_iid: u64,
    pub discussion_id: String,
    /// true to resolve, false to unresolve
    pub resolved: bool,
}

#[async_trait]
impl ToolExecutor for ResolveDiscussion {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        ToolError::require_non_empty("discussion_id", &self.discussion_id)?;

        let discussion = ctx
            .gitlab
            .resolve_mr_discussion(
                &self.project_id,
                self.mr_iid,
                &self.discussion_id,
                self.resolved,
            )
            .await?;
        ToolOutput::json_value(discussion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn discussion(args: Value) -> CreateMrDiscussion {
        let mut base = json!({"project_id": "g/p", "mr_iid": 1, "body": "nit"});
        if let (Value::Object(b), Value::Object(extra)) = (&mut base, args) {
            b.extend(extra);
        }
        serde_json::from_value(base).unwrap()
    }

    #[test]
    fn test_no_position_without_all_anchors() {
        let d = discussion(json!({"base_sha": "a", "head_sha": "b", "new_path": "src/lib.rs"}));
        assert!(d.position().is_none());
    }

    #[test]
    fn test_inline_position() {
        let d = discussion(json!({
            "base_sha": "a", "head_sha": "b", "start_sha": "c",
            "new_path": "src/lib.rs", "new_line": 12
        }));
        assert_eq!(
            d.position().unwrap(),
            json!({
                "base_sha": "a", "start_sha": "c", "head_sha": "b",
                "position_type": "text", "new_path": "src/lib.rs",
                "old_path": "src/lib.rs", "new_line": 12
            })
        );
    }

    #[test]
    fn test_line_range_uses_old_key() {
        let d = discussion(json!({
            "base_sha": "a", "head_sha": "b", "start_sha": "c", "new_path": "f.rs",
            "line_range_start_line": 3, "line_range_end_line": 7, "line_range_type": "old"
        }));
        let position = d.position().unwrap();
        assert_eq!(
            position["line_range"],
            json!({"start": {"type": "old", "old_line": 3}, "end": {"type": "old", "old_line": 7}})
        );
    }

    #[test]
    fn test_system_only_threads_dropped() {
        assert!(!has_human_note(&json!({"notes": [{"system": true}]})));
        assert!(has_human_note(&json!({"notes": [{"system": true}, {"system": false}]})));
        assert!(!has_human_note(&json!({"notes": []})));
    }
}
