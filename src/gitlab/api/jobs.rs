use serde_json::Value;

use super::project_path;
use crate::error::GitLabResult;
use crate::gitlab::{GitLabClient, RemoteId};

impl GitLabClient {
    pub async fn retry_job(&self, project: &RemoteId, job_id: u64) -> GitLabResult<Value> {
        let endpoint = format!("{}/jobs/{}/retry", project_path(project), job_id);
        self.post(&endpoint, &Value::Null).await
    }

    pub async fn cancel_job(&self, project: &RemoteId, job_id: u64) -> GitLabResult<Value> {
        let endpoint = format!("{}/jobs/{}/cancel", project_path(project), job_id);
        self.post(&endpoint, &Value::Null).await
    }

    /// Start a manual job
    pub async fn play_job(
        &self,
        project: &RemoteId,
        job_id: u64,
        body: &Value,
    ) -> GitLabResult<Value> {
        let endpoint = format!("{}/jobs/{}/play", project_path(project), job_id);
        self.post(&endpoint, body).await
    }

    /// Raw job log; served as plain text
    pub async fn job_trace(&self, project: &RemoteId, job_id: u64) -> GitLabResult<String> {
        self.get_text(&format!("{}/jobs/{}/trace", project_path(project), job_id))
            .await
    }
}
