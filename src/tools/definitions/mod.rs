//! Tool definitions
//!
//! One module per GitLab resource family. Tools register themselves through
//! `#[gitlab_tool]`; see
//! [`ToolRegistry::register_all_auto`](crate::tools::ToolRegistry::register_all_auto).

pub mod approvals;
pub mod branches;
pub mod commits;
pub mod groups;
pub mod issues;
pub mod jobs;
pub mod merge_requests;
pub mod mr_discussions;
pub mod mr_notes;
pub mod pipelines;
pub mod projects;
pub mod releases;
pub mod tags;
pub mod variables;
