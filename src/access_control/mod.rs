//! Access control module
//!
//! A single switch: when `gitlab.read_only` is set, every tool whose operation
//! type is not `Read` is refused before it reaches the network.

pub mod gate;
pub mod types;

pub use gate::{check_tool_allowed, check_write_allowed};
pub use types::{OperationType, ToolCategory};
