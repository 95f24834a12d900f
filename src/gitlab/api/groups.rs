use serde_json::{Value, json};

use super::{group_path, project_path};
use crate::error::GitLabResult;
use crate::gitlab::{AccessLevel, GitLabClient, ListPage, RemoteId};
use crate::util::{Pagination, QueryBuilder};

const DEFAULT_PER_PAGE: u32 = 50;

impl GitLabClient {
    pub async fn list_groups(
        &self,
        search: Option<&str>,
        pagination: Pagination,
    ) -> GitLabResult<ListPage> {
        let query = QueryBuilder::new()
            .optional("search", search)
            .paginate(pagination, DEFAULT_PER_PAGE)
            .build();
        self.get_page(&format!("/groups{}", query)).await
    }

    pub async fn get_group(&self, group: &RemoteId) -> GitLabResult<Value> {
        self.get(&group_path(group)).await
    }

    pub async fn share_project_with_group(
        &self,
        project: &RemoteId,
        group_id: u64,
        access: AccessLevel,
    ) -> GitLabResult<Value> {
        let body = json!({ "group_id": group_id, "group_access": access.value() });
        self.post(&format!("{}/share", project_path(project)), &body)
            .await
    }

    pub async fn unshare_project_with_group(
        &self,
        project: &RemoteId,
        group_id: u64,
    ) -> GitLabResult<Value> {
        self.delete(&format!("{}/share/{}", project_path(project), group_id))
            .await
    }

    /// Give `source_group_id` members access to `target`
    pub async fn share_group_with_group(
        &self,
        target: &RemoteId,
        source_group_id: u64,
        access: AccessLevel,
    ) -> GitLabResult<Value> {
        let body = json!({ "group_id": source_group_id, "group_access": access.value() });
        self.post(&format!("{}/share", group_path(target)), &body)
            .await
    }

    pub async fn unshare_group_with_group(
        &self,
        target: &RemoteId,
        source_group_id: u64,
    ) -> GitLabResult<Value> {
        self.delete(&format!("{}/share/{}", group_path(target), source_group_id))
            .await
    }
}
