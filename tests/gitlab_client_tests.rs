//! GitLab client integration tests with mock server

use mcp_gitlab::config::{AuthType, ConfigOverrides, GitLabConfig, load_config_with_env};
use mcp_gitlab::error::GitLabError;
use mcp_gitlab::gitlab::{GitLabClient, RemoteId};
use mcp_gitlab::util::{Pagination, SecretString};
use serde_json::json;
use std::collections::HashMap;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config(mock_server: &MockServer, token: &str) -> GitLabConfig {
    GitLabConfig {
        url: mock_server.uri(),
        token: Some(SecretString::new(token)),
        timeout_secs: 5,
        ..Default::default()
    }
}

/// Helper to create a test client pointing to mock server
fn create_test_client(mock_server: &MockServer) -> GitLabClient {
    GitLabClient::from_config(&config(mock_server, "test-token")).unwrap()
}

#[tokio::test]
async fn test_get_request_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v4/projects/123"))
        .and(header("PRIVATE-TOKEN", "test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 123,
            "name": "test-project",
            "path_with_namespace": "group/test-project"
        })))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let result = client.get("/projects/123").await.unwrap();

    assert_eq!(result["id"], 123);
    assert_eq!(result["name"], "test-project");
}

#[tokio::test]
async fn test_oauth_token_sent_as_bearer() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v4/projects/1"))
        .and(header("Authorization", "Bearer oauth-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 1})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut cfg = config(&mock_server, "oauth-token");
    cfg.auth_type = Some(AuthType::Oauth);
    let client = GitLabClient::from_config(&cfg).unwrap();
    client.get("/projects/1").await.unwrap();
}

#[tokio::test]
async fn test_job_token_detected_from_prefix() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v4/projects/1"))
        .and(header("JOB-TOKEN", "glcbt-abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 1})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = GitLabClient::from_config(&config(&mock_server, "glcbt-abc123")).unwrap();
    client.get("/projects/1").await.unwrap();
}

#[tokio::test]
async fn test_cli_token_sent_as_private_token_inside_ci_job() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v4/projects/1"))
        .and(header("PRIVATE-TOKEN", "glpat-cli"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 1})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let env: HashMap<String, String> = [
        ("GITLAB_URL".to_string(), mock_server.uri()),
        ("CI_JOB_TOKEN".to_string(), "job-abc".to_string()),
    ]
    .into_iter()
    .collect();
    let overrides = ConfigOverrides {
        gitlab_token: Some("glpat-cli".to_string()),
        ..Default::default()
    };
    let app_config = load_config_with_env(None, &env, &overrides).unwrap();

    let client = GitLabClient::from_config(&app_config.gitlab).unwrap();
    client.get("/projects/1").await.unwrap();
}

#[tokio::test]
async fn test_post_sends_json_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v4/projects/123/repository/branches"))
        .and(body_json(json!({"branch": "feature", "ref": "main"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"name": "feature"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let branch = client
        .create_branch(&RemoteId::Numeric(123), "feature", "main")
        .await
        .unwrap();
    assert_eq!(branch["name"], "feature");
}

#[tokio::test]
async fn test_unauthorized_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v4/projects/123"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"message": "401 Unauthorized"})),
        )
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let err = client.get("/projects/123").await.unwrap_err();

    assert!(matches!(err, GitLabError::Unauthorized { .. }));
    assert_eq!(err.status(), Some(401));
    assert!(!err.to_string().contains("test-token"));
}

#[tokio::test]
async fn test_not_found_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v4/projects/999"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"message": "404 Project Not Found"})),
        )
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let err = client.get("/projects/999").await.unwrap_err();

    match err {
        GitLabError::NotFound { message } => assert_eq!(message, "404 Project Not Found"),
        other => panic!("expected NotFound, got {:?}", other),
    }
}

#[tokio::test]
async fn test_rate_limited_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v4/projects"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "30"))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let err = client.get("/projects").await.unwrap_err();

    assert!(matches!(
        err,
        GitLabError::RateLimited {
            retry_after: Some(30)
        }
    ));
}

#[tokio::test]
async fn test_validation_error_with_field_messages() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v4/projects/1/repository/tags"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "message": {"tag_name": ["is invalid"]}
        })))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let err = client
        .post("/projects/1/repository/tags", &json!({"tag_name": "bad tag"}))
        .await
        .unwrap_err();

    assert!(matches!(err, GitLabError::Validation { .. }));
    assert!(err.to_string().contains("is invalid"));
}

#[tokio::test]
async fn test_server_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v4/projects/1"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let err = client.get("/projects/1").await.unwrap_err();
    assert_eq!(err.to_string(), "GitLab returned HTTP 502: Bad Gateway");
}

#[tokio::test]
async fn test_html_response_rejected() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v4/projects/1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("<html><body>Sign in</body></html>", "text/html"),
        )
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let err = client.get("/projects/1").await.unwrap_err();

    assert!(matches!(err, GitLabError::InvalidResponse(_)));
    assert!(err.to_string().contains("Unexpected HTML response"));
}

#[tokio::test]
async fn test_invalid_json_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v4/projects/1"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("{not json", "application/json"))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let err = client.get("/projects/1").await.unwrap_err();
    assert!(matches!(err, GitLabError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_empty_response_body_on_delete() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/v4/projects/123/repository/branches/old"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let result = client
        .delete_branch(&RemoteId::Numeric(123), "old")
        .await
        .unwrap();
    assert!(result.is_null());
}

#[tokio::test]
async fn test_project_path_encoding() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v4/projects/group%2Fsubgroup%2Fproject"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 7})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let project: RemoteId = "group/subgroup/project".parse().unwrap();
    let result = client.get_project(&project).await.unwrap();
    assert_eq!(result["id"], 7);
}

#[tokio::test]
async fn test_list_reads_total_header() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v4/projects/1/repository/branches"))
        .and(query_param("per_page", "2"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("X-Total", "5")
                .set_body_json(json!([{"name": "main"}, {"name": "dev"}])),
        )
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let page = client
        .list_branches(&RemoteId::Numeric(1), None, Pagination::per_page(2))
        .await
        .unwrap();
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.total, Some(5));
}

#[tokio::test]
async fn test_list_rejects_object_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v4/projects/1/repository/tags"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "nope"})))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let err = client.get_page("/projects/1/repository/tags").await.unwrap_err();
    assert!(err.to_string().contains("Expected a JSON array, got an object"));
}

#[tokio::test]
async fn test_job_trace_read_as_text() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v4/projects/1/jobs/42/trace"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("line 1\nline 2\n", "text/plain"))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let log = client.job_trace(&RemoteId::Numeric(1), 42).await.unwrap();
    assert_eq!(log, "line 1\nline 2\n");
}

#[tokio::test]
async fn test_read_only_blocks_mutations_before_sending() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut cfg = config(&mock_server, "test-token");
    cfg.read_only = true;
    let client = GitLabClient::from_config(&cfg).unwrap();
    assert!(client.is_read_only());

    let err = client
        .delete_branch(&RemoteId::Numeric(1), "main")
        .await
        .unwrap_err();
    assert!(matches!(err, GitLabError::WriteDisabled(_)));

    let err = client
        .create_branch(&RemoteId::Numeric(1), "x", "main")
        .await
        .unwrap_err();
    assert!(matches!(err, GitLabError::WriteDisabled(_)));
}
