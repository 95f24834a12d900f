//! GitLab API module
//!
//! The HTTP client, identifier handling, and one method per REST endpoint the
//! tools use.

mod api;
pub mod client;
pub mod id;
pub mod links;
pub mod types;

pub use client::GitLabClient;
pub use id::{RemoteId, encode_segment};
pub use types::*;
