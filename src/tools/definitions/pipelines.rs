//! Pipeline tools

use crate::error::ToolError;
use crate::gitlab::{PipelineStatus, RemoteId, VariableType};
use crate::tools::executor::{ToolContext, ToolExecutor, ToolOutput};
use crate::util::{JsonBody, Pagination, QueryBuilder};
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use mcp_gitlab_macros::gitlab_tool;

const DEFAULT_PIPELINES_PER_PAGE: u32 = 20;

/// List pipelines
#[gitlab_tool(
    name = "gitlab_list_pipelines",
    description = "List pipelines of a project with id, status, ref, source and creation time",
    category = "pipelines",
    operation = "read"
)]
pub struct ListPipelines {
    /// Project ID or path
    pub project_id: RemoteId,
    /// Filter by branch or tag
    #[serde(default, rename = "ref")]
    pub ref_name: Option<String>,
    #[serde(default)]
    pub status: Option<PipelineStatus>,
    /// Filter by trigger source (push, web, trigger, schedule, ...)
    #[serde(default)]
    pub source: Option<String>,
    #[serde(flatten)]
    pub pagination: Pagination,
}

#[async_trait]
impl ToolExecutor for ListPipelines {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let query = QueryBuilder::new()
            .optional("ref", self.ref_name.as_deref())
            .optional("status", self.status)
            .optional("source", self.source.as_deref())
            .paginate(self.pagination, DEFAULT_PIPELINES_PER_PAGE);

        let page = ctx.gitlab.list_pipelines(&self.project_id, query).await?;
        Ok(ToolOutput::page(page))
    }
}

/// Get a pipeline
#[gitlab_tool(
    name = "gitlab_get_pipeline",
    description = "Get pipeline details, optionally with its jobs",
    category = "pipelines",
    operation = "read"
)]
pub struct GetPipeline {
    /// Project ID or path
    pub project_id: RemoteId,
    pub pipeline_id: u64,
    /// Attach the pipeline's jobs under `jobs`
    #[serde(default)]
    pub include_jobs: bool,
}

#[async_trait]
impl ToolExecutor for GetPipeline {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let mut pipeline = ctx
            .gitlab
            .get_pipeline(&self.project_id, self.pipeline_id)
            .await?;

        if self.include_jobs {
            let jobs = ctx
                .gitlab
                .list_pipeline_jobs(&self.project_id, self.pipeline_id, Pagination::default())
                .await?;
            if let Value::Object(map) = &mut pipeline {
                map.insert("jobs".to_string(), Value::Array(jobs.items));
            }
        }
        ToolOutput::json_value(pipeline)
    }
}

/// Variable passed to a new pipeline
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PipelineVariable {
    pub key: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variable_type: Option<VariableType>,
}

/// Trigger a pipeline
#[gitlab_tool(
    name = "gitlab_create_pipeline",
    description = "Run a new pipeline on a branch or tag",
    category = "pipelines",
    operation = "execute"
)]
pub struct CreatePipeline {
    /// Project ID or path
    pub project_id: RemoteId,
    /// Branch or tag to run the pipeline on
    #[serde(rename = "ref")]
    pub ref_name: String,
    #[serde(default)]
    pub variables: Option<Vec<PipelineVariable>>,
}

#[async_trait]
impl ToolExecutor for CreatePipeline {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        ToolError::require_non_empty("ref", &self.ref_name)?;

        let variables = match &self.variables {
            Some(vars) if !vars.is_empty() => Some(serde_json::to_value(vars)?),
            _ => None,
        };
        let body = JsonBody::new()
            .field("ref", self.ref_name.as_str())
            .optional("variables", variables)
            .build();

        let pipeline = ctx.gitlab.create_pipeline(&self.project_id, &body).await?;
        ToolOutput::json_value(pipeline)
    }
}

/// Retry a pipeline
#[gitlab_tool(
    name = "gitlab_retry_pipeline",
    description = "Retry the failed jobs of a pipeline",
    category = "pipelines",
    operation = "execute"
)]
pub struct RetryPipeline {
    /// Project ID or path
    pub project_id: RemoteId,
    pub pipeline_id: u64,
}

#[async_trait]
impl ToolExecutor for RetryPipeline {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let pipeline = ctx
            .gitlab
            .retry_pipeline(&self.project_id, self.pipeline_id)
            .await?;
        ToolOutput::json_value(pipeline)
    }
}

/// Cancel a pipeline
#[gitlab_tool(
    name = "gitlab_cancel_pipeline",
    description = "Cancel a running pipeline",
    category = "pipelines",
    operation = "execute"
)]
pub struct CancelPipeline {
    /// Project ID or path
    pub project_id: RemoteId,
    pub pipeline_id: u64,
}

#[async_trait]
impl ToolExecutor for CancelPipeline {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let pipeline = ctx
            .gitlab
            .cancel_pipeline(&self.project_id, self.pipeline_id)
            .await?;
        ToolOutput::json_value(pipeline)
    }
}
