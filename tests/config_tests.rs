//! Configuration loading integration tests

use mcp_gitlab::config::{
    AuthType, ConfigOverrides, LogFormat, TransportMode, load_config_from_str,
    load_config_with_env,
};
use mcp_gitlab::error::ConfigError;
use std::collections::HashMap;
use std::io::Write;
use tempfile::NamedTempFile;

fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

const FULL_TOML: &str = r#"
[gitlab]
url = "https://gitlab.internal.example/"
token = "file-token"
read_only = true
timeout_secs = 45
verify_ssl = false

[server]
transport = "streamable-http"
host = "0.0.0.0"
port = 9100
name = "team-gitlab"

[logging]
level = "debug"
format = "json"
"#;

#[test]
fn test_full_config_file() {
    let file = write_config(FULL_TOML);
    let config = load_config_with_env(
        Some(file.path().to_str().unwrap()),
        &HashMap::new(),
        &ConfigOverrides::default(),
    )
    .unwrap();

    assert_eq!(config.gitlab.url, "https://gitlab.internal.example");
    assert_eq!(config.gitlab.api_url(), "https://gitlab.internal.example/api/v4");
    assert_eq!(config.gitlab.token.as_ref().unwrap().expose_secret(), "file-token");
    assert!(config.gitlab.read_only);
    assert_eq!(config.gitlab.timeout_secs, 45);
    assert!(!config.gitlab.verify_ssl);

    assert_eq!(config.server.transport, TransportMode::StreamableHttp);
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.server.port, 9100);
    assert_eq!(config.server.name, "team-gitlab");

    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.logging.format, LogFormat::Json);
}

#[test]
fn test_missing_config_file() {
    let err = load_config_with_env(
        Some("/nonexistent/mcp-gitlab.toml"),
        &HashMap::new(),
        &ConfigOverrides::default(),
    )
    .unwrap_err();
    assert!(err.to_string().contains("Configuration file not found"));
}

#[test]
fn test_env_defaults() {
    let config = load_config_with_env(
        None,
        &env(&[("GITLAB_URL", "https://gitlab.com"), ("GITLAB_TOKEN", "glpat-abc")]),
        &ConfigOverrides::default(),
    )
    .unwrap();

    assert!(!config.gitlab.read_only);
    assert!(config.gitlab.verify_ssl);
    assert_eq!(config.gitlab.timeout_secs, 30);
    assert_eq!(config.server.transport, TransportMode::Stdio);
    assert_eq!(config.server.port, 8000);
    assert_eq!(config.server.name, "mcp-gitlab");
    assert_eq!(config.logging.format, LogFormat::Pretty);
}

#[test]
fn test_prefixed_env_overrides_file() {
    let file = write_config(FULL_TOML);
    let config = load_config_with_env(
        Some(file.path().to_str().unwrap()),
        &env(&[
            ("MCP_GITLAB__SERVER__PORT", "9200"),
            ("MCP_GITLAB__SERVER__TRANSPORT", "sse"),
        ]),
        &ConfigOverrides::default(),
    )
    .unwrap();

    assert_eq!(config.server.port, 9200);
    assert_eq!(config.server.transport, TransportMode::Sse);
    assert_eq!(config.server.host, "0.0.0.0");
}

#[test]
fn test_gitlab_env_overrides_file() {
    let file = write_config(FULL_TOML);
    let config = load_config_with_env(
        Some(file.path().to_str().unwrap()),
        &env(&[
            ("GITLAB_URL", "https://gitlab.com"),
            ("GITLAB_TOKEN", "env-token"),
            ("GITLAB_READ_ONLY", "false"),
        ]),
        &ConfigOverrides::default(),
    )
    .unwrap();

    assert_eq!(config.gitlab.url, "https://gitlab.com");
    assert_eq!(config.gitlab.token.as_ref().unwrap().expose_secret(), "env-token");
    assert!(!config.gitlab.read_only);
}

#[test]
fn test_cli_overrides_everything() {
    let file = write_config(FULL_TOML);
    let overrides = ConfigOverrides {
        gitlab_token: Some("cli-token".to_string()),
        transport: Some(TransportMode::Stdio),
        port: Some(7000),
        log_level: Some("warn".to_string()),
        log_format: Some(LogFormat::Pretty),
        ..Default::default()
    };
    let config = load_config_with_env(
        Some(file.path().to_str().unwrap()),
        &env(&[("GITLAB_TOKEN", "env-token"), ("MCP_GITLAB__SERVER__PORT", "9200")]),
        &overrides,
    )
    .unwrap();

    assert_eq!(config.gitlab.token.as_ref().unwrap().expose_secret(), "cli-token");
    assert_eq!(config.server.transport, TransportMode::Stdio);
    assert_eq!(config.server.port, 7000);
    assert_eq!(config.logging.level, "warn");
    assert_eq!(config.logging.format, LogFormat::Pretty);
}

#[test]
fn test_read_only_flag_cannot_be_disabled_by_env() {
    let overrides = ConfigOverrides {
        read_only: true,
        ..Default::default()
    };
    let config = load_config_with_env(
        None,
        &env(&[
            ("GITLAB_URL", "https://gitlab.com"),
            ("GITLAB_TOKEN", "t"),
            ("GITLAB_READ_ONLY", "no"),
        ]),
        &overrides,
    )
    .unwrap();
    assert!(config.gitlab.read_only);
}

#[test]
fn test_oauth_token_from_env() {
    let config = load_config_with_env(
        None,
        &env(&[("GITLAB_URL", "https://gitlab.com"), ("GITLAB_OAUTH_TOKEN", "oauth")]),
        &ConfigOverrides::default(),
    )
    .unwrap();
    assert_eq!(config.gitlab.auth_type, Some(AuthType::Oauth));
}

#[test]
fn test_cli_token_drops_auth_type_implied_by_env() {
    let overrides = ConfigOverrides {
        gitlab_token: Some("glpat-cli".to_string()),
        ..Default::default()
    };
    let config = load_config_with_env(
        None,
        &env(&[("GITLAB_URL", "https://gitlab.com"), ("CI_JOB_TOKEN", "job-abc")]),
        &overrides,
    )
    .unwrap();

    assert_eq!(config.gitlab.token.as_ref().unwrap().expose_secret(), "glpat-cli");
    assert_eq!(config.gitlab.auth_type, None);
}

#[test]
fn test_cli_token_keeps_explicit_auth_type() {
    let overrides = ConfigOverrides {
        gitlab_token: Some("oauth-cli".to_string()),
        ..Default::default()
    };
    let config = load_config_with_env(
        None,
        &env(&[
            ("GITLAB_URL", "https://gitlab.com"),
            ("CI_JOB_TOKEN", "job-abc"),
            ("GITLAB_AUTH_TYPE", "oauth"),
        ]),
        &overrides,
    )
    .unwrap();

    assert_eq!(config.gitlab.auth_type, Some(AuthType::Oauth));
}

#[test]
fn test_invalid_auth_type() {
    let err = load_config_with_env(
        None,
        &env(&[
            ("GITLAB_URL", "https://gitlab.com"),
            ("GITLAB_TOKEN", "t"),
            ("GITLAB_AUTH_TYPE", "kerberos"),
        ]),
        &ConfigOverrides::default(),
    )
    .unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { .. }));
}

#[test]
fn test_token_not_in_debug_output() {
    let config = load_config_from_str(
        r#"
[gitlab]
url = "https://gitlab.com"
token = "glpat-super-secret"
"#,
    )
    .unwrap();
    assert!(!format!("{:?}", config).contains("glpat-super-secret"));
}

#[test]
fn test_from_str_without_token() {
    let config = load_config_from_str(
        r#"
[gitlab]
url = "http://localhost:8080"
"#,
    )
    .unwrap();
    assert!(config.gitlab.token.is_none());
    assert_eq!(config.gitlab.url, "http://localhost:8080");
}

#[test]
fn test_zero_port_rejected() {
    let err = load_config_from_str(
        r#"
[gitlab]
url = "https://gitlab.com"

[server]
port = 0
"#,
    )
    .unwrap_err();
    assert!(err.to_string().contains("server.port"));
}
