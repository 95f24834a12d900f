//! Utility functions shared across the application.

mod secret;

pub use secret::SecretString;

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fmt::Display;

/// Largest page size GitLab honours
pub const MAX_PER_PAGE: u32 = 100;

/// Clamp a requested page size into `1..=100`.
pub fn clamp_per_page(requested: Option<u32>, default: u32) -> u32 {
    requested.unwrap_or(default).clamp(1, MAX_PER_PAGE)
}

/// `page` and `per_page` arguments shared by every list tool
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, JsonSchema)]
pub struct Pagination {
    /// Page number, starting at 1
    #[serde(default)]
    pub page: Option<u32>,
    /// Results per page (1-100)
    #[serde(default)]
    pub per_page: Option<u32>,
}

impl Pagination {
    /// First page with the given size
    pub const fn per_page(per_page: u32) -> Self {
        Self {
            page: None,
            per_page: Some(per_page),
        }
    }
}

/// Builder for URL query parameters.
///
/// Provides a fluent API for constructing query strings with proper URL encoding.
///
/// # Example
/// ```ignore
/// let query = QueryBuilder::new()
///     .param("per_page", 20)
///     .optional("state", Some("opened"))
///     .optional("labels", None::<&str>)
///     .build();
/// // Returns "?per_page=20&state=opened"
/// ```
#[derive(Default)]
pub struct QueryBuilder {
    params: Vec<(String, String)>,
}

impl QueryBuilder {
    /// Create a new empty query builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a required parameter (always included).
    pub fn param(mut self, key: &str, value: impl Display) -> Self {
        self.params.push((
            key.to_string(),
            urlencoding::encode(&value.to_string()).into_owned(),
        ));
        self
    }

    /// Add an optional parameter (only included if Some).
    pub fn optional<T: Display>(self, key: &str, value: Option<T>) -> Self {
        match value {
            Some(v) => self.param(key, v),
            None => self,
        }
    }

    /// Add `per_page`, clamped into the range GitLab accepts.
    pub fn per_page(self, requested: Option<u32>, default: u32) -> Self {
        self.param("per_page", clamp_per_page(requested, default))
    }

    /// Add `per_page` (clamped) and `page` (at least 1) when one was asked for.
    pub fn paginate(self, pagination: Pagination, default_per_page: u32) -> Self {
        self.per_page(pagination.per_page, default_per_page)
            .optional("page", pagination.page.map(|page| page.max(1)))
    }

    /// Build the query string.
    ///
    /// Returns an empty string if no parameters were added,
    /// otherwise returns "?key1=value1&key2=value2...".
    pub fn build(self) -> String {
        if self.params.is_empty() {
            String::new()
        } else {
            format!(
                "?{}",
                self.params
                    .into_iter()
                    .map(|(k, v)| format!("{k}={v}"))
                    .collect::<Vec<_>>()
                    .join("&")
            )
        }
    }
}

/// Builder for JSON request bodies, the body-side twin of [`QueryBuilder`].
///
/// Unset optional fields are left out entirely rather than sent as `null`.
#[derive(Default)]
pub struct JsonBody {
    fields: Map<String, Value>,
}

impl JsonBody {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field that is always sent.
    pub fn field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }

    /// Add a field only when a value was supplied.
    pub fn optional<T: Into<Value>>(self, key: &str, value: Option<T>) -> Self {
        match value {
            Some(v) => self.field(key, v),
            None => self,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn build(self) -> Value {
        Value::Object(self.fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_query_builder_encodes() {
        let query = QueryBuilder::new()
            .param("search", "feat/login page")
            .optional("state", Some("opened"))
            .optional("labels", None::<&str>)
            .build();
        assert_eq!(query, "?search=feat%2Flogin%20page&state=opened");
    }

    #[test]
    fn test_query_builder_empty() {
        assert_eq!(QueryBuilder::new().build(), "");
    }

    #[test]
    fn test_paginate() {
        let query = QueryBuilder::new()
            .paginate(
                Pagination {
                    page: Some(3),
                    per_page: Some(500),
                },
                20,
            )
            .build();
        assert_eq!(query, "?per_page=100&page=3");

        let first = Pagination {
            page: Some(0),
            per_page: None,
        };
        assert_eq!(QueryBuilder::new().paginate(first, 20).build(), "?per_page=20&page=1");
        assert_eq!(
            QueryBuilder::new().paginate(Pagination::default(), 40).build(),
            "?per_page=40"
        );
    }

    #[test]
    fn test_per_page_clamped() {
        assert_eq!(QueryBuilder::new().per_page(Some(500), 20).build(), "?per_page=100");
        assert_eq!(QueryBuilder::new().per_page(Some(0), 20).build(), "?per_page=1");
        assert_eq!(QueryBuilder::new().per_page(None, 40).build(), "?per_page=40");
    }

    #[test]
    fn test_json_body_skips_unset() {
        let body = JsonBody::new()
            .field("branch", "feature")
            .optional("squash", Some(true))
            .optional("labels", None::<String>)
            .build();
        assert_eq!(body, json!({"branch": "feature", "squash": true}));
    }
}
