//! Project and group CI/CD variables.
//!
//! A key can exist once per environment scope; `filter[environment_scope]`
//! picks which one an update or delete targets.

use serde_json::Value;

use super::{group_path, project_path};
use crate::error::GitLabResult;
use crate::gitlab::{GitLabClient, ListPage, RemoteId, encode_segment};
use crate::util::{Pagination, QueryBuilder};

const DEFAULT_PER_PAGE: u32 = 100;

fn scoped(endpoint: String, environment_scope: Option<&str>) -> String {
    let query = QueryBuilder::new()
        .optional("filter[environment_scope]", environment_scope)
        .build();
    format!("{}{}", endpoint, query)
}

impl GitLabClient {
    pub async fn list_project_variables(
        &self,
        project: &RemoteId,
        pagination: Pagination,
    ) -> GitLabResult<ListPage> {
        let query = QueryBuilder::new().paginate(pagination, DEFAULT_PER_PAGE).build();
        self.get_page(&format!("{}/variables{}", project_path(project), query))
            .await
    }

    pub async fn create_project_variable(
        &self,
        project: &RemoteId,
        body: &Value,
    ) -> GitLabResult<Value> {
        self.post(&format!("{}/variables", project_path(project)), body)
            .await
    }

    pub async fn update_project_variable(
        &self,
        project: &RemoteId,
        key: &str,
        environment_scope: Option<&str>,
        body: &Value,
    ) -> GitLabResult<Value> {
        let endpoint = format!("{}/variables/{}", project_path(project), encode_segment(key));
        self.put(&scoped(endpoint, environment_scope), body).await
    }

    pub async fn delete_project_variable(
        &self,
        project: &RemoteId,
        key: &str,
        environment_scope: Option<&str>,
    ) -> GitLabResult<Value> {
        let endpoint = format!("{}/variables/{}", project_path(project), encode_segment(key));
        self.delete(&scoped(endpoint, environment_scope)).await
    }

    pub async fn list_group_variables(
        &self,
        group: &RemoteId,
        pagination: Pagination,
    ) -> GitLabResult<ListPage> {
        let query = QueryBuilder::new().paginate(pagination, DEFAULT_PER_PAGE).build();
        self.get_page(&format!("{}/variables{}", group_path(group), query))
            .await
    }

    pub async fn create_group_variable(
        &self,
        group: &RemoteId,
        body: &Value,
    ) -> GitLabResult<Value> {
        self.post(&format!("{}/variables", group_path(group)), body)
            .await
    }

    pub async fn update_group_variable(
        &self,
        group: &RemoteId,
        key: &str,
        body: &Value,
    ) -> GitLabResult<Value> {
        let endpoint = format!("{}/variables/{}", group_path(group), encode_segment(key));
        self.put(&endpoint, body).await
    }

    pub async fn delete_group_variable(
        &self,
        group: &RemoteId,
        key: &str,
        environment_scope: Option<&str>,
    ) -> GitLabResult<Value> {
        let endpoint = format!("{}/variables/{}", group_path(group), encode_segment(key));
        self.delete(&scoped(endpoint, environment_scope)).await
    }
}
