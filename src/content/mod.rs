//! Static content served next to the tools
//!
//! Reference documents are exposed as resources and workflow templates as
//! prompts. Neither touches the GitLab API.

pub mod prompts;
pub mod resources;
