use serde_json::{Value, json};

use super::mr_path;
use crate::error::GitLabResult;
use crate::gitlab::{GitLabClient, ListPage, RemoteId};
use crate::util::{Pagination, QueryBuilder};

const DEFAULT_PER_PAGE: u32 = 100;

impl GitLabClient {
    pub async fn list_mr_notes(
        &self,
        project: &RemoteId,
        mr_iid: u64,
        pagination: Pagination,
    ) -> GitLabResult<ListPage> {
        let query = QueryBuilder::new().paginate(pagination, DEFAULT_PER_PAGE).build();
        self.get_page(&format!("{}/notes{}", mr_path(project, mr_iid), query))
            .await
    }

    pub async fn create_mr_note(
        &self,
        project: &RemoteId,
        mr_iid: u64,
        body: &Value,
    ) -> GitLabResult<Value> {
        self.post(&format!("{}/notes", mr_path(project, mr_iid)), body)
            .await
    }

    pub async fn update_mr_note(
        &self,
        project: &RemoteId,
        mr_iid: u64,
        note_id: u64,
        text: &str,
    ) -> GitLabResult<Value> {
        let body = json!({ "body": text });
        self.put(&format!("{}/notes/{}", mr_path(project, mr_iid), note_id), &body)
            .await
    }

    pub async fn delete_mr_note(
        &self,
        project: &RemoteId,
        mr_iid: u64,
        note_id: u64,
    ) -> GitLabResult<Value> {
        self.delete(&format!("{}/notes/{}", mr_path(project, mr_iid), note_id))
            .await
    }

    pub async fn award_note_emoji(
        &self,
        project: &RemoteId,
        mr_iid: u64,
        note_id: u64,
        name: &str,
    ) -> GitLabResult<Value> {
        let body = json!({ "name": name });
        let endpoint = format!("{}/notes/{}/award_emoji", mr_path(project, mr_iid), note_id);
        self.post(&endpoint, &body).await
    }

    pub async fn delete_note_emoji(
        &self,
        project: &RemoteId,
        mr_iid: u64,
        note_id: u64,
        award_id: u64,
    ) -> GitLabResult<Value> {
        let endpoint = format!(
            "{}/notes/{}/award_emoji/{}",
            mr_path(project, mr_iid),
            note_id,
            award_id
        );
        self.delete(&endpoint).await
    }
}
