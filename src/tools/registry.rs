//! Tool registry
//!
//! Holds every tool with its metadata and runs calls through the same steps:
//! lookup, write gate, argument parsing, execution.

use crate::access_control::{OperationType, ToolCategory, check_tool_allowed};
use crate::error::ToolError;
use crate::tools::executor::ToolInfo;
use crate::tools::executor::{ToolContext, ToolExecutor, ToolOutput};
// async_trait required for dyn-compatibility with Box<dyn ToolHandler>
use async_trait::async_trait;
use schemars::Schema;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::time::Instant;
use tracing::{debug, instrument, warn};

/// Compile-time tool registration entry for auto-discovery
///
/// Submitted via `inventory::submit!` by the `#[gitlab_tool]` macro.
pub struct ToolRegistration {
    pub register_fn: fn(&mut ToolRegistry),
}

inventory::collect!(ToolRegistration);

/// A registered tool with all its metadata
pub struct RegisteredTool {
    pub name: &'static str,
    pub description: &'static str,
    pub category: ToolCategory,
    pub operation: OperationType,
    pub idempotent: bool,
    /// JSON Schema for the tool's input
    pub input_schema: Schema,
    handler: Box<dyn ToolHandler>,
}

/// Internal trait for type-erased tool handling
#[async_trait]
trait ToolHandler: Send + Sync {
    async fn call(&self, ctx: &ToolContext, args: Value) -> Result<ToolOutput, ToolError>;
}

struct TypedToolHandler<T> {
    _marker: std::marker::PhantomData<fn() -> T>,
}

#[async_trait]
impl<T> ToolHandler for TypedToolHandler<T>
where
    T: ToolExecutor + DeserializeOwned + 'static,
{
    async fn call(&self, ctx: &ToolContext, args: Value) -> Result<ToolOutput, ToolError> {
        let tool: T = serde_json::from_value(args)
            .map_err(|e| ToolError::InvalidArguments(e.to_string()))?;

        tool.execute(ctx).await
    }
}

/// Tool registry, ordered by name
#[derive(Default)]
pub struct ToolRegistry {
    tools: BTreeMap<&'static str, RegisteredTool>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every `#[gitlab_tool]` in the binary
    pub fn with_all_tools() -> Self {
        let mut registry = Self::new();
        registry.register_all_auto();
        registry
    }

    pub fn register<T>(&mut self)
    where
        T: ToolExecutor + DeserializeOwned + schemars::JsonSchema + ToolInfo + 'static,
    {
        let name = T::name();
        let tool = RegisteredTool {
            name,
            description: T::description(),
            category: T::category(),
            operation: T::operation_type(),
            idempotent: T::idempotent(),
            input_schema: schemars::schema_for!(T),
            handler: Box::new(TypedToolHandler::<T> {
                _marker: std::marker::PhantomData,
            }),
        };

        if self.tools.insert(name, tool).is_some() {
            warn!(name, "Tool registered twice; keeping the later definition");
        }
        debug!(name, category = %T::category(), "Registered tool");
    }

    /// Register all tools discovered via the `#[gitlab_tool]` macro
    pub fn register_all_auto(&mut self) {
        for registration in inventory::iter::<ToolRegistration> {
            (registration.register_fn)(self);
        }
    }

    pub fn get(&self, name: &str) -> Option<&RegisteredTool> {
        self.tools.get(name)
    }

    pub fn tool_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.tools.keys().copied()
    }

    pub fn tools(&self) -> impl Iterator<Item = &RegisteredTool> {
        self.tools.values()
    }

    pub fn tools_in_category(&self, category: ToolCategory) -> Vec<&RegisteredTool> {
        self.tools
            .values()
            .filter(|t| t.category == category)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Execute a tool by name
    ///
    /// The write gate runs before the arguments are even parsed, so a blocked
    /// call never reaches GitLab.
    #[instrument(skip(self, ctx, args), fields(tool = %name, request_id = %ctx.request_id))]
    pub async fn execute(
        &self,
        name: &str,
        ctx: &ToolContext,
        args: Value,
    ) -> Result<ToolOutput, ToolError> {
        let start = Instant::now();

        let tool = self
            .tools
            .get(name)
            .ok_or_else(|| ToolError::NotFound(name.to_string()))?;

        check_tool_allowed(&ctx.config, name, tool.operation)?;

        // Clients may omit `arguments` entirely for tools with no required fields
        let args = match args {
            Value::Null => Value::Object(Map::new()),
            other => other,
        };

        let result = tool.handler.call(ctx, args).await;

        let elapsed_ms = start.elapsed().as_millis() as u64;
        match &result {
            Ok(_) => debug!(elapsed_ms, "Tool call succeeded"),
            Err(ToolError::GitLab(e)) => warn!(
                elapsed_ms,
                status = ?e.status(),
                transport = e.is_transport(),
                error = %e,
                "GitLab call failed"
            ),
            Err(e) => warn!(elapsed_ms, error = %e, "Tool call failed"),
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_registry() {
        let registry = ToolRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.get("gitlab_get_project").is_none());
    }

    #[test]
    fn test_auto_registration_sorted() {
        let registry = ToolRegistry::with_all_tools();
        let names: Vec<_> = registry.tool_names().collect();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
        assert!(names.iter().all(|n| n.starts_with("gitlab_")));
    }
}
