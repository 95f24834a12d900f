use serde_json::Value;

use super::project_path;
use crate::error::GitLabResult;
use crate::gitlab::{GitLabClient, ListPage, RemoteId};
use crate::util::{Pagination, QueryBuilder};

const DEFAULT_JOBS_PER_PAGE: u32 = 100;

impl GitLabClient {
    pub async fn list_pipelines(
        &self,
        project: &RemoteId,
        query: QueryBuilder,
    ) -> GitLabResult<ListPage> {
        let endpoint = format!("{}/pipelines{}", project_path(project), query.build());
        self.get_page(&endpoint).await
    }

    pub async fn get_pipeline(&self, project: &RemoteId, pipeline_id: u64) -> GitLabResult<Value> {
        self.get(&format!("{}/pipelines/{}", project_path(project), pipeline_id))
            .await
    }

    pub async fn list_pipeline_jobs(
        &self,
        project: &RemoteId,
        pipeline_id: u64,
        pagination: Pagination,
    ) -> GitLabResult<ListPage> {
        let query = QueryBuilder::new()
            .paginate(pagination, DEFAULT_JOBS_PER_PAGE)
            .build();
        let endpoint = format!(
            "{}/pipelines/{}/jobs{}",
            project_path(project),
            pipeline_id,
            query
        );
        self.get_page(&endpoint).await
    }

    /// Trigger a pipeline for a ref
    pub async fn create_pipeline(&self, project: &RemoteId, body: &Value) -> GitLabResult<Value> {
        self.post(&format!("{}/pipeline", project_path(project)), body)
            .await
    }

    pub async fn retry_pipeline(
        &self,
        project: &RemoteId,
        pipeline_id: u64,
    ) -> GitLabResult<Value> {
        let endpoint = format!("{}/pipelines/{}/retry", project_path(project), pipeline_id);
        self.post(&endpoint, &Value::Null).await
    }

    pub async fn cancel_pipeline(
        &self,
        project: &RemoteId,
        pipeline_id: u64,
    ) -> GitLabResult<Value> {
        let endpoint = format!("{}/pipelines/{}/cancel", project_path(project), pipeline_id);
        self.post(&endpoint, &Value::Null).await
    }
}
