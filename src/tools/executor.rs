//! Tool execution types
//!
//! `ToolExecutor` is what each tool implements; `ToolOutput` is what it
//! returns. Output is always a single JSON object.

use crate::access_control::{OperationType, ToolCategory};
use crate::config::GitLabConfig;
use crate::error::ToolError;
use crate::gitlab::{GitLabClient, ListPage};
// async_trait required for dyn-compatibility with Box<dyn ToolHandler>
use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value, json};
use std::sync::Arc;

/// Replaces the value of any CI/CD variable GitLab flags as masked
pub const MASKED_PLACEHOLDER: &str = "***MASKED***";

/// Static metadata, generated by `#[gitlab_tool]`
pub trait ToolInfo {
    fn name() -> &'static str;
    fn description() -> &'static str;
    fn category() -> ToolCategory;
    fn operation_type() -> OperationType;
    fn idempotent() -> bool;
}

/// Shared state handed to every tool call
#[derive(Clone)]
pub struct ToolContext {
    pub gitlab: Arc<GitLabClient>,
    pub config: Arc<GitLabConfig>,
    /// Correlates log lines for one call
    pub request_id: String,
}

impl ToolContext {
    pub fn new(gitlab: Arc<GitLabClient>, config: Arc<GitLabConfig>) -> Self {
        Self {
            gitlab,
            config,
            request_id: format!("{:08x}", rand::random::<u32>()),
        }
    }
}

/// Implemented by every tool struct
#[async_trait]
pub trait ToolExecutor: Send + Sync {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError>;
}

/// Result of a successful tool call
#[derive(Debug, Clone, PartialEq)]
pub struct ToolOutput {
    body: Value,
}

impl ToolOutput {
    /// Wrap a GitLab response. Objects pass through unchanged; arrays get the
    /// list envelope and scalars become `{"result": ...}`.
    pub fn json_value(value: Value) -> Result<Self, ToolError> {
        let body = match value {
            Value::Object(_) => value,
            Value::Array(items) => list_envelope(items, None, 0),
            Value::Null => json!({ "result": null }),
            other => json!({ "result": other }),
        };
        Ok(Self { body })
    }

    /// Serialize any value and wrap it like [`ToolOutput::json_value`]
    pub fn json<T: Serialize>(value: &T) -> Result<Self, ToolError> {
        Self::json_value(serde_json::to_value(value)?)
    }

    /// `{"items": [...], "count": n, "total": t, "has_more": bool}`
    pub fn page(page: ListPage) -> Self {
        Self {
            body: list_envelope(page.items, page.total, page.offset),
        }
    }

    /// Confirmation for calls whose response carries nothing useful
    pub fn status(status: &str, field: &str, value: impl Into<Value>) -> Self {
        let mut body = Map::new();
        body.insert("status".to_string(), Value::String(status.to_string()));
        body.insert(field.to_string(), value.into());
        Self {
            body: Value::Object(body),
        }
    }

    /// Hide the value of every variable flagged `masked`, in a single variable
    /// or a list of them.
    pub fn mask_variables(mut self) -> Self {
        match self.body.get_mut("items") {
            Some(Value::Array(items)) => items.iter_mut().for_each(mask_variable),
            _ => mask_variable(&mut self.body),
        }
        self
    }

    pub fn body(&self) -> &Value {
        &self.body
    }

    pub fn into_value(self) -> Value {
        self.body
    }

    /// Pretty-printed JSON, as sent to the client
    pub fn to_json_string(&self) -> String {
        serde_json::to_string_pretty(&self.body).unwrap_or_else(|_| self.body.to_string())
    }
}

fn list_envelope(items: Vec<Value>, total: Option<u64>, offset: u64) -> Value {
    let count = items.len() as u64;
    let has_more = total.is_some_and(|t| offset + count < t);
    json!({
        "items": items,
        "count": count,
        "total": total,
        "has_more": has_more,
    })
}

fn mask_variable(variable: &mut Value) {
    let Some(obj) = variable.as_object_mut() else {
        return;
    };
    let masked = obj.get("masked").and_then(Value::as_bool).unwrap_or(false);
    if masked && obj.contains_key("value") {
        obj.insert(
            "value".to_string(),
            Value::String(MASKED_PLACEHOLDER.to_string()),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_passes_through() {
        let out = ToolOutput::json_value(json!({"id": 1, "name": "api"})).unwrap();
        assert_eq!(out.body(), &json!({"id": 1, "name": "api"}));
    }

    #[test]
    fn test_non_objects_wrapped() {
        let out = ToolOutput::json_value(json!([1, 2])).unwrap();
        assert_eq!(out.body()["count"], 2);
        assert_eq!(out.body()["has_more"], false);

        let out = ToolOutput::json_value(json!("done")).unwrap();
        assert_eq!(out.body(), &json!({"result": "done"}));
    }

    #[test]
    fn test_page_has_more() {
        let out = ToolOutput::page(ListPage {
            items: vec![json!({"id": 1}), json!({"id": 2})],
            total: Some(5),
            offset: 0,
        });
        assert_eq!(
            out.body(),
            &json!({"items": [{"id": 1}, {"id": 2}], "count": 2, "total": 5, "has_more": true})
        );

        let out = ToolOutput::page(ListPage {
            items: vec![json!({"id": 1})],
            total: None,
            offset: 0,
        });
        assert_eq!(out.body()["has_more"], false);
        assert!(out.body()["total"].is_null());
    }

    #[test]
    fn test_last_page_has_no_more() {
        let out = ToolOutput::page(ListPage {
            items: vec![json!({"id": 41}), json!({"id": 42})],
            total: Some(42),
            offset: 40,
        });
        assert_eq!(out.body()["count"], 2);
        assert_eq!(out.body()["has_more"], false);

        let out = ToolOutput::page(ListPage {
            items: vec![json!({"id": 21})],
            total: Some(42),
            offset: 20,
        });
        assert_eq!(out.body()["has_more"], true);
    }

    #[test]
    fn test_masking() {
        let out = ToolOutput::page(ListPage {
            items: vec![
                json!({"key": "TOKEN", "value": "secret123", "masked": true}),
                json!({"key": "REGION", "value": "eu-west-1", "masked": false}),
            ],
            total: None,
            offset: 0,
        })
        .mask_variables();
        assert_eq!(out.body()["items"][0]["value"], MASKED_PLACEHOLDER);
        assert_eq!(out.body()["items"][1]["value"], "eu-west-1");
        assert!(!out.to_json_string().contains("secret123"));

        let single = ToolOutput::json_value(json!({"key": "K", "value": "v", "masked": true}))
            .unwrap()
            .mask_variables();
        assert_eq!(single.body()["value"], MASKED_PLACEHOLDER);
    }

    #[test]
    fn test_status() {
        let out = ToolOutput::status("deleted", "branch", "old");
        assert_eq!(out.body(), &json!({"status": "deleted", "branch": "old"}));
    }
}
