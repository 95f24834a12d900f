//! Configuration module
//!
//! Handles loading and validating configuration from TOML files, environment
//! variables, and command-line overrides.

pub mod loader;
pub mod types;

pub use loader::{ConfigOverrides, load_config, load_config_from_str, load_config_with_env};
pub use types::*;
