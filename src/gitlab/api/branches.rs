use serde_json::{Value, json};

use super::project_path;
use crate::error::GitLabResult;
use crate::gitlab::{GitLabClient, ListPage, RemoteId, encode_segment};
use crate::util::{Pagination, QueryBuilder};

const DEFAULT_PER_PAGE: u32 = 100;

impl GitLabClient {
    pub async fn list_branches(
        &self,
        project: &RemoteId,
        search: Option<&str>,
        pagination: Pagination,
    ) -> GitLabResult<ListPage> {
        let query = QueryBuilder::new()
            .optional("search", search)
            .paginate(pagination, DEFAULT_PER_PAGE)
            .build();
        self.get_page(&format!("{}/repository/branches{}", project_path(project), query))
            .await
    }

    pub async fn create_branch(
        &self,
        project: &RemoteId,
        branch: &str,
        ref_name: &str,
    ) -> GitLabResult<Value> {
        let body = json!({ "branch": branch, "ref": ref_name });
        self.post(&format!("{}/repository/branches", project_path(project)), &body)
            .await
    }

    pub async fn delete_branch(&self, project: &RemoteId, branch: &str) -> GitLabResult<Value> {
        let endpoint = format!(
            "{}/repository/branches/{}",
            project_path(project),
            encode_segment(branch)
        );
        self.delete(&endpoint).await
    }
}
