//! GitLab web URL parsing
//!
//! Users often paste a browser URL where a project path or MR number is
//! expected. These helpers pull the API-relevant parts back out.

use regex::Regex;
use std::sync::LazyLock;

static MR_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"https?://[^/]+/(.+?)/-/merge_requests/(\d+)").expect("Invalid MR URL regex")
});

static PIPELINE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"https?://[^/]+/(.+?)/-/pipelines/(\d+)").expect("Invalid pipeline URL regex")
});

static PROJECT_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://[^/]+/(.+?)(?:/-/.*)?/?$").expect("Invalid project URL regex")
});

/// Project path and IID from `https://host/group/project/-/merge_requests/42`
pub fn parse_mr_url(url: &str) -> Option<(String, u64)> {
    parse_numbered(&MR_URL, url)
}

/// Project path and pipeline ID from `https://host/group/project/-/pipelines/7`
pub fn parse_pipeline_url(url: &str) -> Option<(String, u64)> {
    parse_numbered(&PIPELINE_URL, url)
}

/// Project path from any project web URL, including deep links below `/-/`
pub fn parse_project_url(url: &str) -> Option<String> {
    let caps = PROJECT_URL.captures(url.trim())?;
    let path = decode(caps.get(1)?.as_str());
    let path = path.trim_matches('/');
    (!path.is_empty()).then(|| path.to_string())
}

fn parse_numbered(re: &Regex, url: &str) -> Option<(String, u64)> {
    let caps = re.captures(url.trim())?;
    let path = decode(caps.get(1)?.as_str());
    let number = caps.get(2)?.as_str().parse().ok()?;
    Some((path, number))
}

fn decode(segment: &str) -> String {
    urlencoding::decode(segment)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| segment.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mr_url() {
        assert_eq!(
            parse_mr_url("https://gitlab.com/acme/backend/api/-/merge_requests/42"),
            Some(("acme/backend/api".to_string(), 42))
        );
        assert_eq!(
            parse_mr_url("https://gitlab.com/acme/api/-/merge_requests/42/diffs"),
            Some(("acme/api".to_string(), 42))
        );
        assert_eq!(parse_mr_url("acme/api"), None);
    }

    #[test]
    fn test_pipeline_url() {
        assert_eq!(
            parse_pipeline_url("https://gitlab.example.com/acme/api/-/pipelines/1234"),
            Some(("acme/api".to_string(), 1234))
        );
        assert_eq!(
            parse_pipeline_url("https://gitlab.example.com/acme/api/-/merge_requests/1"),
            None
        );
    }

    #[test]
    fn test_project_url() {
        assert_eq!(
            parse_project_url("https://gitlab.com/acme/api"),
            Some("acme/api".to_string())
        );
        assert_eq!(
            parse_project_url("https://gitlab.com/acme/api/"),
            Some("acme/api".to_string())
        );
        assert_eq!(
            parse_project_url("https://gitlab.com/acme/api/-/tree/main"),
            Some("acme/api".to_string())
        );
        assert_eq!(
            parse_project_url("https://gitlab.com/my%20group/api"),
            Some("my group/api".to_string())
        );
        assert_eq!(parse_project_url("acme/api"), None);
    }
}
