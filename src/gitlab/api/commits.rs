use serde_json::Value;

use super::project_path;
use crate::error::GitLabResult;
use crate::gitlab::{GitLabClient, ListPage, RemoteId, encode_segment};
use crate::util::QueryBuilder;

impl GitLabClient {
    pub async fn list_commits(
        &self,
        project: &RemoteId,
        query: QueryBuilder,
    ) -> GitLabResult<ListPage> {
        let endpoint = format!("{}/repository/commits{}", project_path(project), query.build());
        self.get_page(&endpoint).await
    }

    pub async fn get_commit(&self, project: &RemoteId, sha: &str) -> GitLabResult<Value> {
        let endpoint = format!(
            "{}/repository/commits/{}",
            project_path(project),
            encode_segment(sha)
        );
        self.get(&endpoint).await
    }

    pub async fn get_commit_diff(&self, project: &RemoteId, sha: &str) -> GitLabResult<Value> {
        let endpoint = format!(
            "{}/repository/commits/{}/diff",
            project_path(project),
            encode_segment(sha)
        );
        self.get(&endpoint).await
    }

    /// Create a commit from a list of file actions
    pub async fn create_commit(&self, project: &RemoteId, body: &Value) -> GitLabResult<Value> {
        self.post(&format!("{}/repository/commits", project_path(project)), body)
            .await
    }

    pub async fn compare(&self, project: &RemoteId, from: &str, to: &str) -> GitLabResult<Value> {
        let query = QueryBuilder::new().param("from", from).param("to", to).build();
        self.get(&format!("{}/repository/compare{}", project_path(project), query))
            .await
    }
}
