use serde_json::Value;

use super::project_path;
use crate::error::GitLabResult;
use crate::gitlab::{GitLabClient, RemoteId};

impl GitLabClient {
    pub async fn get_project(&self, project: &RemoteId) -> GitLabResult<Value> {
        self.get(&project_path(project)).await
    }

    pub async fn create_project(&self, body: &Value) -> GitLabResult<Value> {
        self.post("/projects", body).await
    }

    /// Schedules deletion; GitLab answers 202 with a status message
    pub async fn delete_project(&self, project: &RemoteId) -> GitLabResult<Value> {
        self.delete(&project_path(project)).await
    }

    /// Project settings share one endpoint (merge method, squash option, ...)
    pub async fn update_project(&self, project: &RemoteId, body: &Value) -> GitLabResult<Value> {
        self.put(&project_path(project), body).await
    }
}
