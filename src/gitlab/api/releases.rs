use serde_json::Value;

use super::project_path;
use crate::error::GitLabResult;
use crate::gitlab::{GitLabClient, ListPage, RemoteId, encode_segment};
use crate::util::{Pagination, QueryBuilder};

const DEFAULT_PER_PAGE: u32 = 20;

fn release_path(project: &RemoteId, tag_name: &str) -> String {
    format!("{}/releases/{}", project_path(project), encode_segment(tag_name))
}

impl GitLabClient {
    pub async fn list_releases(
        &self,
        project: &RemoteId,
        pagination: Pagination,
    ) -> GitLabResult<ListPage> {
        let query = QueryBuilder::new().paginate(pagination, DEFAULT_PER_PAGE).build();
        self.get_page(&format!("{}/releases{}", project_path(project), query))
            .await
    }

    pub async fn get_release(&self, project: &RemoteId, tag_name: &str) -> GitLabResult<Value> {
        self.get(&release_path(project, tag_name)).await
    }

    pub async fn create_release(&self, project: &RemoteId, body: &Value) -> GitLabResult<Value> {
        self.post(&format!("{}/releases", project_path(project)), body)
            .await
    }

    pub async fn update_release(
        &self,
        project: &RemoteId,
        tag_name: &str,
        body: &Value,
    ) -> GitLabResult<Value> {
        self.put(&release_path(project, tag_name), body).await
    }

    /// Removes the release only; the tag stays
    pub async fn delete_release(&self, project: &RemoteId, tag_name: &str) -> GitLabResult<Value> {
        self.delete(&release_path(project, tag_name)).await
    }
}
