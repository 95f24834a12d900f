use serde_json::Value;

use super::project_path;
use crate::error::GitLabResult;
use crate::gitlab::{GitLabClient, ListPage, RemoteId, encode_segment};
use crate::util::QueryBuilder;

impl GitLabClient {
    pub async fn list_tags(
        &self,
        project: &RemoteId,
        query: QueryBuilder,
    ) -> GitLabResult<ListPage> {
        let endpoint = format!("{}/repository/tags{}", project_path(project), query.build());
        self.get_page(&endpoint).await
    }

    pub async fn get_tag(&self, project: &RemoteId, tag_name: &str) -> GitLabResult<Value> {
        let endpoint = format!(
            "{}/repository/tags/{}",
            project_path(project),
            encode_segment(tag_name)
        );
        self.get(&endpoint).await
    }

    pub async fn create_tag(&self, project: &RemoteId, body: &Value) -> GitLabResult<Value> {
        self.post(&format!("{}/repository/tags", project_path(project)), body)
            .await
    }

    pub async fn delete_tag(&self, project: &RemoteId, tag_name: &str) -> GitLabResult<Value> {
        let endpoint = format!(
            "{}/repository/tags/{}",
            project_path(project),
            encode_segment(tag_name)
        );
        self.delete(&endpoint).await
    }
}
