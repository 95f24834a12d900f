//! Tool classification
//!
//! Every tool declares a category (the GitLab resource family it touches) and
//! an operation type. The write gate only looks at the operation type.

use serde::{Deserialize, Serialize};
use std::fmt;

/// GitLab resource family a tool belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolCategory {
    Projects,
    Approvals,
    Groups,
    Branches,
    Commits,
    MergeRequests,
    MrNotes,
    MrDiscussions,
    Pipelines,
    Jobs,
    Tags,
    Releases,
    Variables,
    Issues,
}

impl ToolCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolCategory::Projects => "projects",
            ToolCategory::Approvals => "approvals",
            ToolCategory::Groups => "groups",
            ToolCategory::Branches => "branches",
            ToolCategory::Commits => "commits",
            ToolCategory::MergeRequests => "merge_requests",
            ToolCategory::MrNotes => "mr_notes",
            ToolCategory::MrDiscussions => "mr_discussions",
            ToolCategory::Pipelines => "pipelines",
            ToolCategory::Jobs => "jobs",
            ToolCategory::Tags => "tags",
            ToolCategory::Releases => "releases",
            ToolCategory::Variables => "variables",
            ToolCategory::Issues => "issues",
        }
    }

    pub fn all() -> &'static [ToolCategory] {
        &[
            ToolCategory::Projects,
            ToolCategory::Approvals,
            ToolCategory::Groups,
            ToolCategory::Branches,
            ToolCategory::Commits,
            ToolCategory::MergeRequests,
            ToolCategory::MrNotes,
            ToolCategory::MrDiscussions,
            ToolCategory::Pipelines,
            ToolCategory::Jobs,
            ToolCategory::Tags,
            ToolCategory::Releases,
            ToolCategory::Variables,
            ToolCategory::Issues,
        ]
    }
}

impl fmt::Display for ToolCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operation type for determining read vs write access
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationType {
    /// get, list, compare
    Read,
    /// create, update, share
    Write,
    /// delete, unshare, remove
    Delete,
    /// merge, rebase, retry, cancel, play
    Execute,
}

impl OperationType {
    pub const fn is_read_only(&self) -> bool {
        matches!(self, OperationType::Read)
    }

    /// Whether the write gate applies
    pub const fn is_mutating(&self) -> bool {
        !self.is_read_only()
    }

    /// Whether the change removes data
    pub const fn is_destructive(&self) -> bool {
        matches!(self, OperationType::Delete)
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            OperationType::Read => "read",
            OperationType::Write => "write",
            OperationType::Delete => "delete",
            OperationType::Execute => "execute",
        }
    }
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_names_match_serde() {
        for category in ToolCategory::all() {
            let json = serde_json::to_value(category).unwrap();
            assert_eq!(json, category.as_str());
        }
    }

    #[test]
    fn test_operation_classes() {
        assert!(OperationType::Read.is_read_only());
        for op in [OperationType::Write, OperationType::Delete, OperationType::Execute] {
            assert!(op.is_mutating());
        }
        assert!(OperationType::Delete.is_destructive());
        assert!(!OperationType::Execute.is_destructive());
    }
}
