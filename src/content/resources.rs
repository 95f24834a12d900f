//! Reference documents served as MCP resources
//!
//! Each document is Markdown compiled into the binary, so the server needs no
//! files at runtime.

use crate::error::mcp_mapper::resource_not_found;
use rmcp::ErrorData as McpError;
use rmcp::model::{AnnotateAble, RawResource, ReadResourceResult, Resource, ResourceContents};

pub const MIME_TYPE: &str = "text/markdown";

/// A static Markdown document
#[derive(Debug, Clone, Copy)]
pub struct Document {
    pub uri: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub body: &'static str,
}

pub static DOCUMENTS: &[Document] = &[
    Document {
        uri: "resource://rules/gitlab-ci",
        name: "GitLab CI/CD Pipeline Patterns",
        description: "workflow:rules, the needs graph, caching versus artifacts, secrets, and deployment safety for .gitlab-ci.yml",
        body: include_str!("../../content/resources/gitlab-ci.md"),
    },
    Document {
        uri: "resource://rules/git-workflow",
        name: "Git Workflow Standards",
        description: "Short-lived branches, branch naming, rebasing, merge methods, and release tagging",
        body: include_str!("../../content/resources/git-workflow.md"),
    },
    Document {
        uri: "resource://rules/mr-hygiene",
        name: "Merge Request Best Practices",
        description: "Merge request size, description, draft state, thread resolution, approvals, and merging",
        body: include_str!("../../content/resources/mr-hygiene.md"),
    },
    Document {
        uri: "resource://rules/conventional-commits",
        name: "Conventional Commits Spec",
        description: "Commit message format, types and their version bumps, breaking changes, and footers",
        body: include_str!("../../content/resources/conventional-commits.md"),
    },
    Document {
        uri: "resource://guides/code-review",
        name: "Code Review Standards",
        description: "Review priorities, Conventional Comments labels, and reviewer/author responsibilities",
        body: include_str!("../../content/resources/code-review.md"),
    },
    Document {
        uri: "resource://guides/codeowners",
        name: "GitLab CODEOWNERS Reference",
        description: "CODEOWNERS location, pattern syntax, sections with required approvals, and optional sections",
        body: include_str!("../../content/resources/codeowners.md"),
    },
];

pub fn find(uri: &str) -> Option<&'static Document> {
    DOCUMENTS.iter().find(|doc| doc.uri == uri)
}

impl Document {
    fn to_resource(self) -> Resource {
        let mut raw = RawResource::new(self.uri, self.name);
        raw.description = Some(self.description.to_string());
        raw.mime_type = Some(MIME_TYPE.to_string());
        raw.no_annotation()
    }

    fn contents(self) -> ResourceContents {
        let mut contents = ResourceContents::text(self.body, self.uri);
        if let ResourceContents::TextResourceContents { mime_type, .. } = &mut contents {
            *mime_type = Some(MIME_TYPE.to_string());
        }
        contents
    }
}

/// Every document, in catalogue order
pub fn list() -> Vec<Resource> {
    DOCUMENTS.iter().map(|doc| doc.to_resource()).collect()
}

/// Body of the document at `uri`
pub fn read(uri: &str) -> Result<ReadResourceResult, McpError> {
    let doc = find(uri).ok_or_else(|| resource_not_found(uri))?;
    Ok(ReadResourceResult {
        contents: vec![doc.contents()],
    })
}
