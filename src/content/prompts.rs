//! Workflow prompts
//!
//! A prompt is a Markdown template with `{name}` placeholders plus a short
//! assistant reply that opens the conversation. Rendering produces two
//! messages: the filled template as the user turn, then the opener.

use crate::error::mcp_mapper::{missing_argument, prompt_not_found};
use crate::gitlab::links::{parse_mr_url, parse_pipeline_url};
use rmcp::ErrorData as McpError;
use rmcp::model::{
    GetPromptResult, JsonObject, Prompt, PromptArgument, PromptMessage, PromptMessageRole,
};
use serde_json::Value;
use std::collections::BTreeMap;

/// Resolved argument values, keyed by argument name
pub type PromptValues = BTreeMap<&'static str, String>;

#[derive(Debug, Clone, Copy)]
pub struct PromptArg {
    pub name: &'static str,
    pub description: &'static str,
    /// `None` makes the argument required
    pub default: Option<&'static str>,
}

impl PromptArg {
    const fn required(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            description,
            default: None,
        }
    }

    const fn optional(
        name: &'static str,
        description: &'static str,
        default: &'static str,
    ) -> Self {
        Self {
            name,
            description,
            default: Some(default),
        }
    }
}

/// Web URL a prompt accepts in place of `project_id`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WebUrl {
    /// `.../-/merge_requests/<iid>` fills `mr_iid`
    MergeRequest,
    /// `.../-/pipelines/<id>` fills `pipeline_id`
    Pipeline,
}

impl WebUrl {
    fn parse(self, url: &str) -> Option<(String, u64)> {
        match self {
            WebUrl::MergeRequest => parse_mr_url(url),
            WebUrl::Pipeline => parse_pipeline_url(url),
        }
    }

    fn number_arg(self) -> &'static str {
        match self {
            WebUrl::MergeRequest => "mr_iid",
            WebUrl::Pipeline => "pipeline_id",
        }
    }
}

pub struct PromptTemplate {
    pub name: &'static str,
    pub description: &'static str,
    pub args: &'static [PromptArg],
    template: &'static str,
    opener: fn(&PromptValues) -> String,
    web_url: Option<WebUrl>,
}

const PROJECT_ID: PromptArg = PromptArg::required(
    "project_id",
    "Project ID or full path (e.g. 'group/project')",
);

pub static PROMPTS: &[PromptTemplate] = &[
    PromptTemplate {
        name: "review_mr",
        description: "Review a merge request: read it, check its pipeline, go through the diff, and leave discussion comments",
        args: &[
            PromptArg::required(
                "project_id",
                "Project ID or path; a merge request URL also works and fills mr_iid",
            ),
            PromptArg::required("mr_iid", "Merge request IID"),
        ],
        template: include_str!("../../content/prompts/review-mr.md"),
        opener: |v| {
            format!(
                "I'll review MR !{} in project {}. Let me start by fetching the MR details and pipeline status.",
                v["mr_iid"], v["project_id"]
            )
        },
        web_url: Some(WebUrl::MergeRequest),
    },
    PromptTemplate {
        name: "diagnose_pipeline",
        description: "Diagnose a failed pipeline: find the failed jobs, read their logs, and suggest a fix",
        args: &[
            PromptArg::required(
                "project_id",
                "Project ID or path; a pipeline URL also works and fills pipeline_id",
            ),
            PromptArg::required("pipeline_id", "Pipeline ID"),
        ],
        template: include_str!("../../content/prompts/diagnose-pipeline.md"),
        opener: |v| {
            format!(
                "I'll diagnose pipeline {} in project {}. Let me fetch the pipeline details and check for failed jobs.",
                v["pipeline_id"], v["project_id"]
            )
        },
        web_url: Some(WebUrl::Pipeline),
    },
    PromptTemplate {
        name: "prepare_release",
        description: "Prepare a release: compare commits since the last tag, draft a changelog, then create the tag and release",
        args: &[
            PROJECT_ID,
            PromptArg::required("tag_name", "Tag for the new release (e.g. 'v1.4.0')"),
            PromptArg::optional("ref", "Branch or commit to release from", "main"),
        ],
        template: include_str!("../../content/prompts/prepare-release.md"),
        opener: |v| {
            format!(
                "I'll prepare release {} from {} in project {}. Let me find the previous tag and compare commits.",
                v["tag_name"], v["ref"], v["project_id"]
            )
        },
        web_url: None,
    },
    PromptTemplate {
        name: "setup_branch_protection",
        description: "Set up branch protection: review merge settings, pick a merge method, and create approval rules",
        args: &[PROJECT_ID],
        template: include_str!("../../content/prompts/setup-branch-protection.md"),
        opener: |v| {
            format!(
                "I'll help set up branch protection for project {}. Let me review the current project settings and approval configuration.",
                v["project_id"]
            )
        },
        web_url: None,
    },
    PromptTemplate {
        name: "triage_issues",
        description: "Triage open issues: categorize, prioritize, spot duplicates, and suggest labels",
        args: &[
            PROJECT_ID,
            PromptArg::optional("label", "Only triage issues carrying this label", ""),
        ],
        template: include_str!("../../content/prompts/triage-issues.md"),
        opener: |v| {
            let filter = match v["label"].as_str() {
                "" => String::new(),
                label => format!(" filtered by label \"{}\"", label),
            };
            format!(
                "I'll triage open issues in project {}{}. Let me start by listing the open issues.",
                v["project_id"], filter
            )
        },
        web_url: None,
    },
];

pub fn find(name: &str) -> Option<&'static PromptTemplate> {
    PROMPTS.iter().find(|p| p.name == name)
}

/// Prompt descriptors for `prompts/list`
pub fn list() -> Vec<Prompt> {
    PROMPTS.iter().map(PromptTemplate::descriptor).collect()
}

/// Render `name` with the caller's arguments
pub fn render(name: &str, arguments: Option<&JsonObject>) -> Result<GetPromptResult, McpError> {
    let prompt = find(name).ok_or_else(|| prompt_not_found(name))?;
    let values = prompt.resolve(arguments)?;
    Ok(GetPromptResult {
        description: Some(prompt.description.to_string()),
        messages: vec![
            PromptMessage::new_text(PromptMessageRole::User, prompt.fill(&values)),
            PromptMessage::new_text(PromptMessageRole::Assistant, (prompt.opener)(&values)),
        ],
    })
}

impl PromptTemplate {
    fn descriptor(&self) -> Prompt {
        let args = self
            .args
            .iter()
            .map(|arg| PromptArgument {
                name: arg.name.to_string(),
                title: None,
                description: Some(arg.description.to_string()),
                required: Some(arg.default.is_none()),
            })
            .collect();
        Prompt::new(self.name, Some(self.description), Some(args))
    }

    /// Collect every declared argument, applying defaults and URL expansion
    pub fn resolve(&self, arguments: Option<&JsonObject>) -> Result<PromptValues, McpError> {
        let mut supplied: BTreeMap<&'static str, String> = BTreeMap::new();
        for arg in self.args {
            if let Some(value) = arguments
                .and_then(|args| args.get(arg.name))
                .and_then(argument_text)
            {
                supplied.insert(arg.name, value);
            }
        }

        if let Some(kind) = self.web_url
            && let Some((path, number)) = supplied
                .get("project_id")
                .and_then(|url| kind.parse(url))
        {
            supplied.insert("project_id", path);
            supplied
                .entry(kind.number_arg())
                .or_insert_with(|| number.to_string());
        }

        let mut values = PromptValues::new();
        for arg in self.args {
            let value = match (supplied.remove(arg.name), arg.default) {
                (Some(value), _) => value,
                (None, Some(default)) => default.to_string(),
                (None, None) => return Err(missing_argument(arg.name)),
            };
            values.insert(arg.name, value);
        }
        Ok(values)
    }

    /// Substitute `{name}` for every resolved argument in one pass, so
    /// substituted text is never scanned again. Unknown placeholders stay.
    pub fn fill(&self, values: &PromptValues) -> String {
        let mut out = String::with_capacity(self.template.len());
        let mut rest = self.template;
        while let Some(start) = rest.find('{') {
            out.push_str(&rest[..start]);
            let after = &rest[start + 1..];
            let placeholder = after
                .find('}')
                .and_then(|end| values.get(&after[..end]).map(|value| (end, value)));
            match placeholder {
                Some((end, value)) => {
                    out.push_str(value);
                    rest = &after[end + 1..];
                }
                None => {
                    out.push('{');
                    rest = after;
                }
            }
        }
        out.push_str(rest);
        out
    }
}

/// Strings are trimmed and numbers stringified; blanks count as absent.
fn argument_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rmcp::model::{ErrorCode, PromptMessageContent};
    use rstest::rstest;
    use serde_json::json;

    fn args(value: Value) -> JsonObject {
        match value {
            Value::Object(map) => map,
            _ => unreachable!("test arguments must be an object"),
        }
    }

    fn text(message: &PromptMessage) -> &str {
        match &message.content {
            PromptMessageContent::Text { text } => text,
            other => panic!("expected text content, got {:?}", other),
        }
    }

    #[rstest]
    #[case("review_mr", json!({"project_id": "123", "mr_iid": "42"}))]
    #[case("diagnose_pipeline", json!({"project_id": "123", "pipeline_id": "999"}))]
    #[case("prepare_release", json!({"project_id": "123", "tag_name": "v1.0.0"}))]
    #[case("setup_branch_protection", json!({"project_id": "123"}))]
    #[case("triage_issues", json!({"project_id": "123", "label": "bug"}))]
    fn test_renders_user_then_assistant(#[case] name: &str, #[case] arguments: Value) {
        let result = render(name, Some(&args(arguments))).unwrap();
        assert_eq!(result.messages.len(), 2);
        assert_eq!(result.messages[0].role, PromptMessageRole::User);
        assert_eq!(result.messages[1].role, PromptMessageRole::Assistant);

        let body = text(&result.messages[0]);
        assert!(body.starts_with('#'));
        assert!(body.contains("123"));
        assert!(!body.contains("{project_id}"));
    }

    #[test]
    fn test_catalogue() {
        let names: Vec<_> = list().into_iter().map(|p| p.name).collect();
        assert_eq!(
            names,
            [
                "review_mr",
                "diagnose_pipeline",
                "prepare_release",
                "setup_branch_protection",
                "triage_issues"
            ]
        );
    }

    #[test]
    fn test_review_opener() {
        let result = render(
            "review_mr",
            Some(&args(json!({"project_id": "456", "mr_iid": 78}))),
        )
        .unwrap();
        assert!(text(&result.messages[0]).contains("78"));
        assert_eq!(
            text(&result.messages[1]),
            "I'll review MR !78 in project 456. Let me start by fetching the MR details and pipeline status."
        );
    }

    #[test]
    fn test_release_ref_defaults_to_main() {
        let result = render(
            "prepare_release",
            Some(&args(json!({"project_id": "123", "tag_name": "v2.0.0"}))),
        )
        .unwrap();
        assert!(text(&result.messages[0]).contains("`main`"));
        assert!(text(&result.messages[1]).contains("from main"));
    }

    #[test]
    fn test_argument_text_not_substituted_again() {
        let result = render(
            "prepare_release",
            Some(&args(json!({"project_id": "{tag_name}", "tag_name": "v1"}))),
        )
        .unwrap();
        let body = text(&result.messages[0]);
        assert!(body.contains("of project **{tag_name}** from `main`"));
        assert!(body.starts_with("# Prepare Release v1"));
    }

    #[test]
    fn test_unknown_placeholder_left_alone() {
        let template = PromptTemplate {
            template: "{project_id} keeps {other} and {",
            ..*find("setup_branch_protection").unwrap()
        };
        let mut values = PromptValues::new();
        values.insert("project_id", "acme/api".to_string());
        assert_eq!(template.fill(&values), "acme/api keeps {other} and {");
    }

    #[test]
    fn test_triage_label_in_opener() {
        let with_label = render(
            "triage_issues",
            Some(&args(json!({"project_id": "1", "label": "bug"}))),
        )
        .unwrap();
        assert_eq!(
            text(&with_label.messages[1]),
            "I'll triage open issues in project 1 filtered by label \"bug\". Let me start by listing the open issues."
        );

        let without = render("triage_issues", Some(&args(json!({"project_id": "1"})))).unwrap();
        assert_eq!(
            text(&without.messages[1]),
            "I'll triage open issues in project 1. Let me start by listing the open issues."
        );
    }

    #[test]
    fn test_mr_url_fills_project_and_iid() {
        let result = render(
            "review_mr",
            Some(&args(json!({"project_id": "https://gitlab.com/acme/api/-/merge_requests/17"}))),
        )
        .unwrap();
        assert_eq!(
            text(&result.messages[1]),
            "I'll review MR !17 in project acme/api. Let me start by fetching the MR details and pipeline status."
        );
    }

    #[test]
    fn test_pipeline_url_keeps_explicit_id() {
        let prompt = find("diagnose_pipeline").unwrap();
        let values = prompt
            .resolve(Some(&args(json!({
                "project_id": "https://gitlab.example.com/acme/api/-/pipelines/1234",
                "pipeline_id": "99"
            }))))
            .unwrap();
        assert_eq!(values["project_id"], "acme/api");
        assert_eq!(values["pipeline_id"], "99");
    }

    #[test]
    fn test_missing_required_argument() {
        let err = render("review_mr", Some(&args(json!({"project_id": "123"})))).unwrap_err();
        assert_eq!(err.code, ErrorCode::INVALID_PARAMS);
        assert!(err.message.contains("mr_iid"));

        let err = render("setup_branch_protection", None).unwrap_err();
        assert!(err.message.contains("project_id"));

        let err = render(
            "setup_branch_protection",
            Some(&args(json!({"project_id": "  "}))),
        )
        .unwrap_err();
        assert!(err.message.contains("project_id"));
    }

    #[test]
    fn test_unknown_prompt() {
        let err = render("summon_release_manager", None).unwrap_err();
        assert!(err.message.contains("summon_release_manager"));
    }
}
