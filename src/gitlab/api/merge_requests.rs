use serde_json::{Value, json};

use super::{mr_path, project_path};
use crate::error::GitLabResult;
use crate::gitlab::{GitLabClient, ListPage, RemoteId};
use crate::util::QueryBuilder;

impl GitLabClient {
    pub async fn list_merge_requests(
        &self,
        project: &RemoteId,
        query: QueryBuilder,
    ) -> GitLabResult<ListPage> {
        let endpoint = format!("{}/merge_requests{}", project_path(project), query.build());
        self.get_page(&endpoint).await
    }

    pub async fn get_merge_request(&self, project: &RemoteId, iid: u64) -> GitLabResult<Value> {
        self.get(&mr_path(project, iid)).await
    }

    pub async fn create_merge_request(
        &self,
        project: &RemoteId,
        body: &Value,
    ) -> GitLabResult<Value> {
        self.post(&format!("{}/merge_requests", project_path(project)), body)
            .await
    }

    pub async fn update_merge_request(
        &self,
        project: &RemoteId,
        iid: u64,
        body: &Value,
    ) -> GitLabResult<Value> {
        self.put(&mr_path(project, iid), body).await
    }

    pub async fn merge_merge_request(
        &self,
        project: &RemoteId,
        iid: u64,
        body: &Value,
    ) -> GitLabResult<Value> {
        self.put(&format!("{}/merge", mr_path(project, iid)), body)
            .await
    }

    /// Starts an asynchronous rebase; GitLab answers 202
    pub async fn rebase_merge_request(
        &self,
        project: &RemoteId,
        iid: u64,
        skip_ci: bool,
    ) -> GitLabResult<Value> {
        let body = json!({ "skip_ci": skip_ci });
        self.put(&format!("{}/rebase", mr_path(project, iid)), &body)
            .await
    }

    pub async fn merge_request_changes(
        &self,
        project: &RemoteId,
        iid: u64,
    ) -> GitLabResult<Value> {
        self.get(&format!("{}/changes", mr_path(project, iid))).await
    }
}
