//! GitLab API client
//!
//! Thin HTTP layer over the REST v4 API. Responses come back as
//! `serde_json::Value`; each endpoint's shape is interpreted by its caller.
//! Nothing here retries: a failed call surfaces as a `GitLabError`.

use crate::auth::{BoxedAuthProvider, create_auth_provider};
use crate::config::GitLabConfig;
use crate::error::{AppError, GitLabError, GitLabResult, WriteDisabledError};
use crate::gitlab::types::ListPage;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, RETRY_AFTER};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// GitLab API client
pub struct GitLabClient {
    http: Client,
    base_url: String,
    auth: BoxedAuthProvider,
    timeout_secs: u64,
    read_only: bool,
}

impl GitLabClient {
    /// Create a new GitLab client from configuration
    pub fn new(config: &GitLabConfig, auth: BoxedAuthProvider) -> GitLabResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90))
            .danger_accept_invalid_certs(!config.verify_ssl)
            .user_agent(format!("mcp-gitlab/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(GitLabError::Request)?;

        if !config.verify_ssl {
            warn!("TLS certificate verification is disabled");
        }
        debug!(auth = auth.auth_type(), base_url = %config.api_url(), "GitLab client ready");

        Ok(Self {
            http,
            base_url: config.api_url(),
            auth,
            timeout_secs: config.timeout_secs,
            read_only: config.read_only,
        })
    }

    /// Build the auth provider from `config` and create the client
    pub fn from_config(config: &GitLabConfig) -> Result<Self, AppError> {
        let auth = create_auth_provider(config)?;
        Ok(Self::new(config, auth)?)
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Build a URL for an API endpoint
    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// Add authentication to a request
    async fn authenticate(&self, request: RequestBuilder) -> GitLabResult<RequestBuilder> {
        let header = self
            .auth
            .get_auth_header()
            .await
            .map_err(|e| GitLabError::Unauthorized {
                message: e.to_string(),
            })?;

        Ok(request
            .header(header.header_name(), header.header_value())
            .header(ACCEPT, "application/json"))
    }

    /// Refuse mutating requests in read-only mode
    fn ensure_writable(&self, method: &str, endpoint: &str) -> GitLabResult<()> {
        if self.read_only {
            warn!(method, endpoint, "Blocked mutating request in read-only mode");
            return Err(WriteDisabledError::new(format!("{} {}", method, endpoint)).into());
        }
        Ok(())
    }

    /// Send a request and turn non-success statuses into errors
    async fn execute(&self, request: RequestBuilder) -> GitLabResult<Response> {
        let request = self.authenticate(request).await?;

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                GitLabError::Timeout {
                    timeout_secs: self.timeout_secs,
                }
            } else {
                GitLabError::Request(e)
            }
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(GitLabError::RateLimited {
                retry_after: retry_after(response.headers()),
            });
        }

        let body = response.text().await.unwrap_or_default();
        debug!(status = status.as_u16(), "GitLab returned an error status");
        Err(GitLabError::from_response(status.as_u16(), &body))
    }

    /// Decode a success body as JSON; empty bodies decode to `null`
    async fn decode(response: Response) -> GitLabResult<Value> {
        if response.status() == StatusCode::NO_CONTENT {
            return Ok(Value::Null);
        }

        if is_html(response.headers()) {
            return Err(GitLabError::InvalidResponse(
                "Unexpected HTML response, check URL and authentication".to_string(),
            ));
        }

        let text = response.text().await.map_err(|e| {
            GitLabError::InvalidResponse(format!("Failed to read response body: {}", e))
        })?;

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&text)
            .map_err(|e| GitLabError::InvalidResponse(format!("Failed to parse response: {}", e)))
    }

    /// Make a GET request
    #[instrument(skip(self), fields(endpoint = %endpoint))]
    pub async fn get(&self, endpoint: &str) -> GitLabResult<Value> {
        let response = self.execute(self.http.get(self.url(endpoint))).await?;
        Self::decode(response).await
    }

    /// Make a GET request against a list endpoint
    #[instrument(skip(self), fields(endpoint = %endpoint))]
    pub async fn get_page(&self, endpoint: &str) -> GitLabResult<ListPage> {
        let response = self.execute(self.http.get(self.url(endpoint))).await?;
        let headers = response.headers();
        let total = header_number(headers, "x-total");
        let offset = match (
            header_number(headers, "x-page"),
            header_number(headers, "x-per-page"),
        ) {
            (Some(page), Some(per_page)) => page.saturating_sub(1) * per_page,
            _ => 0,
        };

        match Self::decode(response).await? {
            Value::Array(items) => Ok(ListPage {
                items,
                total,
                offset,
            }),
            Value::Null => Ok(ListPage {
                items: Vec::new(),
                total,
                offset,
            }),
            other => Err(GitLabError::InvalidResponse(format!(
                "Expected a JSON array, got {}",
                json_kind(&other)
            ))),
        }
    }

    /// Make a GET request returning raw text (not JSON)
    #[instrument(skip(self), fields(endpoint = %endpoint))]
    pub async fn get_text(&self, endpoint: &str) -> GitLabResult<String> {
        let response = self.execute(self.http.get(self.url(endpoint))).await?;
        response.text().await.map_err(|e| {
            GitLabError::InvalidResponse(format!("Failed to read response text: {}", e))
        })
    }

    /// Make a POST request
    #[instrument(skip(self, body), fields(endpoint = %endpoint))]
    pub async fn post(&self, endpoint: &str, body: &Value) -> GitLabResult<Value> {
        self.ensure_writable("POST", endpoint)?;
        let request = with_body(self.http.post(self.url(endpoint)), body);
        let response = self.execute(request).await?;
        Self::decode(response).await
    }

    /// Make a PUT request
    #[instrument(skip(self, body), fields(endpoint = %endpoint))]
    pub async fn put(&self, endpoint: &str, body: &Value) -> GitLabResult<Value> {
        self.ensure_writable("PUT", endpoint)?;
        let request = with_body(self.http.put(self.url(endpoint)), body);
        let response = self.execute(request).await?;
        Self::decode(response).await
    }

    /// Make a DELETE request
    #[instrument(skip(self), fields(endpoint = %endpoint))]
    pub async fn delete(&self, endpoint: &str) -> GitLabResult<Value> {
        self.ensure_writable("DELETE", endpoint)?;
        let response = self.execute(self.http.delete(self.url(endpoint))).await?;
        Self::decode(response).await
    }
}

/// `Value::Null` means "no body", for action endpoints like `/retry`
fn with_body(request: RequestBuilder, body: &Value) -> RequestBuilder {
    if body.is_null() {
        request
    } else {
        request.json(body)
    }
}

fn retry_after(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
}

fn is_html(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.to_ascii_lowercase().contains("text/html"))
}

/// Numeric pagination header; GitLab sends an empty value when it doesn't apply
fn header_number(headers: &HeaderMap, name: &str) -> Option<u64> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[test]
    fn test_retry_after_header() {
        let mut headers = HeaderMap::new();
        assert_eq!(retry_after(&headers), None);
        headers.insert(RETRY_AFTER, HeaderValue::from_static("30"));
        assert_eq!(retry_after(&headers), Some(30));
    }

    #[test]
    fn test_html_detection() {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/html; charset=utf-8"));
        assert!(is_html(&headers));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        assert!(!is_html(&headers));
    }
}
