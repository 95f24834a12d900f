use serde_json::Value;

use super::{mr_path, project_path};
use crate::error::GitLabResult;
use crate::gitlab::{GitLabClient, ListPage, RemoteId};
use crate::util::{Pagination, QueryBuilder};

const DEFAULT_PER_PAGE: u32 = 100;

impl GitLabClient {
    pub async fn get_project_approvals(&self, project: &RemoteId) -> GitLabResult<Value> {
        self.get(&format!("{}/approvals", project_path(project)))
            .await
    }

    /// Approval settings are changed with POST, not PUT
    pub async fn update_project_approvals(
        &self,
        project: &RemoteId,
        body: &Value,
    ) -> GitLabResult<Value> {
        self.post(&format!("{}/approvals", project_path(project)), body)
            .await
    }

    pub async fn list_project_approval_rules(
        &self,
        project: &RemoteId,
        pagination: Pagination,
    ) -> GitLabResult<ListPage> {
        let query = QueryBuilder::new().paginate(pagination, DEFAULT_PER_PAGE).build();
        self.get_page(&format!("{}/approval_rules{}", project_path(project), query))
            .await
    }

    pub async fn create_project_approval_rule(
        &self,
        project: &RemoteId,
        body: &Value,
    ) -> GitLabResult<Value> {
        self.post(&format!("{}/approval_rules", project_path(project)), body)
            .await
    }

    pub async fn update_project_approval_rule(
        &self,
        project: &RemoteId,
        rule_id: u64,
        body: &Value,
    ) -> GitLabResult<Value> {
        let endpoint = format!("{}/approval_rules/{}", project_path(project), rule_id);
        self.put(&endpoint, body).await
    }

    pub async fn delete_project_approval_rule(
        &self,
        project: &RemoteId,
        rule_id: u64,
    ) -> GitLabResult<Value> {
        let endpoint = format!("{}/approval_rules/{}", project_path(project), rule_id);
        self.delete(&endpoint).await
    }

    pub async fn list_mr_approval_rules(
        &self,
        project: &RemoteId,
        mr_iid: u64,
        pagination: Pagination,
    ) -> GitLabResult<ListPage> {
        let query = QueryBuilder::new().paginate(pagination, DEFAULT_PER_PAGE).build();
        self.get_page(&format!("{}/approval_rules{}", mr_path(project, mr_iid), query))
            .await
    }

    pub async fn create_mr_approval_rule(
        &self,
        project: &RemoteId,
        mr_iid: u64,
        body: &Value,
    ) -> GitLabResult<Value> {
        self.post(&format!("{}/approval_rules", mr_path(project, mr_iid)), body)
            .await
    }

    pub async fn update_mr_approval_rule(
        &self,
        project: &RemoteId,
        mr_iid: u64,
        rule_id: u64,
        body: &Value,
    ) -> GitLabResult<Value> {
        let endpoint = format!("{}/approval_rules/{}", mr_path(project, mr_iid), rule_id);
        self.put(&endpoint, body).await
    }

    pub async fn delete_mr_approval_rule(
        &self,
        project: &RemoteId,
        mr_iid: u64,
        rule_id: u64,
    ) -> GitLabResult<Value> {
        let endpoint = format!("{}/approval_rules/{}", mr_path(project, mr_iid), rule_id);
        self.delete(&endpoint).await
    }
}
