use serde_json::{Value, json};

use super::mr_path;
use crate::error::GitLabResult;
use crate::gitlab::{GitLabClient, ListPage, RemoteId, encode_segment};
use crate::util::{Pagination, QueryBuilder};

const DEFAULT_PER_PAGE: u32 = 100;

impl GitLabClient {
    pub async fn list_mr_discussions(
        &self,
        project: &RemoteId,
        mr_iid: u64,
        pagination: Pagination,
    ) -> GitLabResult<ListPage> {
        let query = QueryBuilder::new().paginate(pagination, DEFAULT_PER_PAGE).build();
        self.get_page(&format!("{}/discussions{}", mr_path(project, mr_iid), query))
            .await
    }

    /// Start a thread, optionally anchored to a diff position
    pub async fn create_mr_discussion(
        &self,
        project: &RemoteId,
        mr_iid: u64,
        body: &Value,
    ) -> GitLabResult<Value> {
        self.post(&format!("{}/discussions", mr_path(project, mr_iid)), body)
            .await
    }

    pub async fn reply_to_mr_discussion(
        &self,
        project: &RemoteId,
        mr_iid: u64,
        discussion_id: &str,
        text: &str,
    ) -> GitLabResult<Value> {
        let body = json!({ "body": text });
        let endpoint = format!(
            "{}/discussions/{}/notes",
            mr_path(project, mr_iid),
            encode_segment(discussion_id)
        );
        self.post(&endpoint, &body).await
    }

    pub async fn resolve_mr_discussion(
        &self,
        project: &RemoteId,
        mr_iid: u64,
        discussion_id: &str,
        resolved: bool,
    ) -> GitLabResult<Value> {
        let body = json!({ "resolved": resolved });
        let endpoint = format!(
            "{}/discussions/{}",
            mr_path(project, mr_iid),
            encode_segment(discussion_id)
        );
        self.put(&endpoint, &body).await
    }
}
