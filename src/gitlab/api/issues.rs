use serde_json::Value;

use super::project_path;
use crate::error::GitLabResult;
use crate::gitlab::{GitLabClient, ListPage, RemoteId};
use crate::util::QueryBuilder;

fn issue_path(project: &RemoteId, iid: u64) -> String {
    format!("{}/issues/{}", project_path(project), iid)
}

impl GitLabClient {
    pub async fn list_issues(
        &self,
        project: &RemoteId,
        query: QueryBuilder,
    ) -> GitLabResult<ListPage> {
        let endpoint = format!("{}/issues{}", project_path(project), query.build());
        self.get_page(&endpoint).await
    }

    pub async fn get_issue(&self, project: &RemoteId, iid: u64) -> GitLabResult<Value> {
        self.get(&issue_path(project, iid)).await
    }

    pub async fn create_issue(&self, project: &RemoteId, body: &Value) -> GitLabResult<Value> {
        self.post(&format!("{}/issues", project_path(project)), body)
            .await
    }

    pub async fn update_issue(
        &self,
        project: &RemoteId,
        iid: u64,
        body: &Value,
    ) -> GitLabResult<Value> {
        self.put(&issue_path(project, iid), body).await
    }

    pub async fn create_issue_note(
        &self,
        project: &RemoteId,
        iid: u64,
        body: &Value,
    ) -> GitLabResult<Value> {
        self.post(&format!("{}/notes", issue_path(project, iid)), body)
            .await
    }
}
