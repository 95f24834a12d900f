//! Server handler integration tests

use mcp_gitlab::config::{AppConfig, GitLabConfig, ServerConfig};
use mcp_gitlab::content::{prompts, resources};
use mcp_gitlab::gitlab::GitLabClient;
use mcp_gitlab::server::GitLabMcpHandler;
use mcp_gitlab::util::SecretString;
use rmcp::handler::server::ServerHandler;
use rmcp::model::{CallToolResult, JsonObject};
use serde_json::{Value, json};
use std::sync::Arc;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Create test configuration
fn create_test_config(gitlab_url: &str, read_only: bool) -> AppConfig {
    AppConfig {
        server: ServerConfig {
            name: "test-mcp-gitlab".to_string(),
            version: "0.1.0".to_string(),
            ..Default::default()
        },
        gitlab: GitLabConfig {
            url: gitlab_url.to_string(),
            token: Some(SecretString::new("test-token")),
            read_only,
            timeout_secs: 5,
            ..Default::default()
        },
        ..Default::default()
    }
}

fn create_test_handler(mock_server: &MockServer, read_only: bool) -> GitLabMcpHandler {
    let config = create_test_config(&mock_server.uri(), read_only);
    let gitlab = Arc::new(GitLabClient::from_config(&config.gitlab).unwrap());
    GitLabMcpHandler::new(&config, gitlab)
}

fn args(value: Value) -> Option<JsonObject> {
    match value {
        Value::Object(map) => Some(map),
        _ => None,
    }
}

/// Parse the single text block of a tool result
fn result_json(result: &CallToolResult) -> Value {
    assert_eq!(result.content.len(), 1);
    let block = serde_json::to_value(&result.content[0]).unwrap();
    assert_eq!(block["type"], "text");
    serde_json::from_str(block["text"].as_str().unwrap()).unwrap()
}

#[tokio::test]
async fn test_handler_get_info() {
    let mock_server = MockServer::start().await;
    let handler = create_test_handler(&mock_server, false);

    let info = handler.get_info();

    assert_eq!(info.server_info.name, "test-mcp-gitlab");
    assert_eq!(info.server_info.version, "0.1.0");
    assert!(info.capabilities.tools.is_some());
    assert!(info.capabilities.resources.is_some());
    assert!(info.capabilities.prompts.is_some());

    let instructions = info.instructions.unwrap();
    assert!(instructions.contains("GitLab"));
    assert!(instructions.contains("Tool families"));
    assert!(instructions.contains("merge_requests"));
    assert!(instructions.contains("variables"));
    assert!(!instructions.contains("read-only mode"));
}

#[tokio::test]
async fn test_instructions_mention_read_only() {
    let mock_server = MockServer::start().await;
    let handler = create_test_handler(&mock_server, true);

    assert!(handler.is_read_only());
    let instructions = handler.get_info().instructions.unwrap();
    assert!(instructions.contains("read-only mode"));
}

#[tokio::test]
async fn test_tool_definitions() {
    let mock_server = MockServer::start().await;
    let handler = create_test_handler(&mock_server, false);

    let tools = handler.mcp_tools();
    assert_eq!(tools.len(), 76);
    assert_eq!(handler.tool_count(), 76);
    assert!(tools.iter().all(|t| t.name.starts_with("gitlab_")));

    let find = |name: &str| tools.iter().find(|t| t.name == name).unwrap();

    let get_project = find("gitlab_get_project");
    let hints = get_project.annotations.as_ref().unwrap();
    assert_eq!(hints.read_only_hint, Some(true));
    assert_eq!(hints.destructive_hint, Some(false));
    assert_eq!(get_project.input_schema.get("type"), Some(&json!("object")));
    assert!(get_project.input_schema.get("$schema").is_none());
    assert!(
        get_project.input_schema["properties"]
            .as_object()
            .unwrap()
            .contains_key("project_id")
    );

    let delete_branch = find("gitlab_delete_branch");
    let hints = delete_branch.annotations.as_ref().unwrap();
    assert_eq!(hints.read_only_hint, Some(false));
    assert_eq!(hints.destructive_hint, Some(true));
}

#[tokio::test]
async fn test_read_only_server_still_lists_every_tool() {
    let mock_server = MockServer::start().await;
    let handler = create_test_handler(&mock_server, true);
    assert_eq!(handler.mcp_tools().len(), 76);
}

#[tokio::test]
async fn test_execute_tool_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v4/projects/test%2Fproject/issues"))
        .and(header("PRIVATE-TOKEN", "test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "iid": 1, "title": "Test Issue", "state": "opened"}
        ])))
        .mount(&mock_server)
        .await;

    let handler = create_test_handler(&mock_server, false);
    let result = handler
        .execute_tool(
            "gitlab_list_issues",
            args(json!({"project_id": "test/project"})),
        )
        .await;

    assert_ne!(result.is_error, Some(true));
    let body = result_json(&result);
    assert_eq!(body["count"], 1);
    assert_eq!(body["items"][0]["title"], "Test Issue");
}

#[tokio::test]
async fn test_execute_tool_error_envelope() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v4/projects/404"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "404 Not Found"})))
        .mount(&mock_server)
        .await;

    let handler = create_test_handler(&mock_server, false);
    let result = handler
        .execute_tool("gitlab_get_project", args(json!({"project_id": 404})))
        .await;

    assert_eq!(result.is_error, Some(true));
    let body = result_json(&result);
    let envelope = body.as_object().unwrap();
    assert_eq!(envelope.len(), 1);
    assert!(envelope["error"].as_str().unwrap().contains("404"));
}

#[tokio::test]
async fn test_execute_tool_read_only_envelope() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&mock_server)
        .await;

    let handler = create_test_handler(&mock_server, true);
    let result = handler
        .execute_tool(
            "gitlab_create_issue",
            args(json!({"project_id": 1, "title": "blocked"})),
        )
        .await;

    assert_eq!(result.is_error, Some(true));
    let message = result_json(&result)["error"].as_str().unwrap().to_string();
    assert!(message.contains("read-only"));
    assert!(message.contains("gitlab_create_issue"));
}

#[tokio::test]
async fn test_execute_unknown_tool() {
    let mock_server = MockServer::start().await;
    let handler = create_test_handler(&mock_server, false);

    let result = handler.execute_tool("gitlab_nope", None).await;
    assert_eq!(result.is_error, Some(true));
    assert!(
        result_json(&result)["error"]
            .as_str()
            .unwrap()
            .contains("Unknown tool: gitlab_nope")
    );
}

#[tokio::test]
async fn test_execute_tool_missing_arguments() {
    let mock_server = MockServer::start().await;
    let handler = create_test_handler(&mock_server, false);

    let result = handler.execute_tool("gitlab_get_project", None).await;
    assert_eq!(result.is_error, Some(true));
    assert!(
        result_json(&result)["error"]
            .as_str()
            .unwrap()
            .starts_with("Invalid arguments")
    );
}

#[test]
fn test_content_catalogue() {
    let documents = resources::list();
    assert_eq!(documents.len(), 6);
    assert!(documents.iter().all(|r| r.mime_type.as_deref() == Some("text/markdown")));

    let templates = prompts::list();
    assert_eq!(templates.len(), 5);
    let review = templates.iter().find(|p| p.name == "review_mr").unwrap();
    let arguments = review.arguments.as_ref().unwrap();
    assert!(arguments.iter().all(|a| a.required == Some(true)));
}

#[test]
fn test_prompt_render_through_content() {
    let arguments = args(json!({"project_id": "acme/api", "mr_iid": "12"}));
    let result = prompts::render("review_mr", arguments.as_ref()).unwrap();
    assert_eq!(result.messages.len(), 2);

    let rendered = serde_json::to_value(&result.messages[0]).unwrap();
    let text = rendered["content"]["text"].as_str().unwrap();
    assert!(text.contains("acme/api"));
    assert!(text.contains("12"));
}
