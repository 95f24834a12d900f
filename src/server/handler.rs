//! MCP server handler
//!
//! Bridges the MCP protocol to the tool registry and the static content.

use crate::access_control::ToolCategory;
use crate::config::{AppConfig, GitLabConfig};
use crate::content::{prompts, resources};
use crate::error::mcp_mapper::error_envelope;
use crate::gitlab::GitLabClient;
use crate::tools::{RegisteredTool, ToolContext, ToolRegistry};
use rmcp::ErrorData as McpError;
use rmcp::handler::server::ServerHandler;
use rmcp::model::{
    CallToolRequestParam, CallToolResult, Content, GetPromptRequestParam, GetPromptResult,
    Implementation, InitializeResult, JsonObject, ListPromptsResult, ListResourcesResult,
    ListToolsResult, PaginatedRequestParam, ReadResourceRequestParam, ReadResourceResult,
    ServerCapabilities, Tool, ToolAnnotations,
};
use rmcp::service::{RequestContext, RoleServer};
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// GitLab MCP server handler
///
/// Cheap to clone; HTTP transports build one per session.
#[derive(Clone)]
pub struct GitLabMcpHandler {
    name: String,
    version: String,
    registry: Arc<ToolRegistry>,
    gitlab: Arc<GitLabClient>,
    config: Arc<GitLabConfig>,
}

impl GitLabMcpHandler {
    pub fn new(config: &AppConfig, gitlab: Arc<GitLabClient>) -> Self {
        Self::with_registry(config, gitlab, Arc::new(ToolRegistry::with_all_tools()))
    }

    /// Share one registry between handlers
    pub fn with_registry(
        config: &AppConfig,
        gitlab: Arc<GitLabClient>,
        registry: Arc<ToolRegistry>,
    ) -> Self {
        info!(
            tools = registry.len(),
            read_only = config.gitlab.read_only,
            "Initialized GitLab MCP handler"
        );

        Self {
            name: config.server.name.clone(),
            version: config.server.version.clone(),
            registry,
            gitlab,
            config: Arc::new(config.gitlab.clone()),
        }
    }

    pub fn tool_count(&self) -> usize {
        self.registry.len()
    }

    pub fn is_read_only(&self) -> bool {
        self.config.read_only
    }

    /// Registry tools as MCP tool definitions, sorted by name
    pub fn mcp_tools(&self) -> Vec<Tool> {
        self.registry.tools().map(to_mcp_tool).collect()
    }

    /// Run a tool and wrap its JSON in a protocol result
    ///
    /// Never fails at the protocol level: errors become the `{"error": ...}`
    /// envelope with `is_error` set.
    pub async fn execute_tool(&self, name: &str, arguments: Option<JsonObject>) -> CallToolResult {
        let ctx = ToolContext::new(self.gitlab.clone(), self.config.clone());
        let args = arguments.map(Value::Object).unwrap_or(Value::Null);

        match self.registry.execute(name, &ctx, args).await {
            Ok(output) => CallToolResult::success(vec![Content::text(output.to_json_string())]),
            Err(e) => {
                warn!(tool = name, error = %e, "Returning error envelope");
                let envelope = error_envelope(&e);
                let text = serde_json::to_string_pretty(&envelope)
                    .unwrap_or_else(|_| envelope.to_string());
                CallToolResult::error(vec![Content::text(text)])
            }
        }
    }

    fn instructions(&self) -> String {
        let mut text = String::from(
            "GitLab MCP server. Tools are prefixed gitlab_ and take a project ID or full path \
             (\"group/project\"). Every tool returns one JSON object; failures are \
             {\"error\": \"...\"}. Lists are paginated with page/per_page (max 100). \
             Resources under resource://rules and resource://guides hold team conventions.",
        );
        let families: Vec<&str> = ToolCategory::all().iter().map(|c| c.as_str()).collect();
        text.push_str(&format!(" Tool families: {}.", families.join(", ")));
        if self.is_read_only() {
            text.push_str(" The server is in read-only mode: only read tools will succeed.");
        }
        text
    }
}

fn to_mcp_tool(tool: &RegisteredTool) -> Tool {
    let mut mcp_tool = Tool::new(tool.name, tool.description, Arc::new(input_schema(tool)));
    mcp_tool.annotations = Some(ToolAnnotations {
        title: None,
        read_only_hint: Some(tool.operation.is_read_only()),
        destructive_hint: Some(tool.operation.is_destructive()),
        idempotent_hint: Some(tool.idempotent),
        open_world_hint: Some(true),
    });
    mcp_tool
}

/// The generated schema minus the draft marker and Rust type name.
/// `$defs` stays so nested argument types still resolve.
fn input_schema(tool: &RegisteredTool) -> JsonObject {
    let mut schema = match serde_json::to_value(&tool.input_schema) {
        Ok(Value::Object(map)) => map,
        _ => JsonObject::new(),
    };
    schema.remove("$schema");
    schema.remove("title");
    schema.insert("type".to_string(), Value::String("object".to_string()));
    schema
        .entry("properties")
        .or_insert_with(|| Value::Object(JsonObject::new()));
    schema
}

impl ServerHandler for GitLabMcpHandler {
    fn get_info(&self) -> InitializeResult {
        InitializeResult {
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .enable_prompts()
                .build(),
            server_info: Implementation {
                name: self.name.clone(),
                version: self.version.clone(),
                ..Default::default()
            },
            instructions: Some(self.instructions()),
            ..Default::default()
        }
    }

    #[instrument(skip(self, _request, _context))]
    fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = Result<ListToolsResult, McpError>> + Send + '_ {
        debug!("Listing tools");
        async move {
            Ok(ListToolsResult {
                tools: self.mcp_tools(),
                ..Default::default()
            })
        }
    }

    #[instrument(skip(self, request, _context), fields(tool = %request.name))]
    fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = Result<CallToolResult, McpError>> + Send + '_ {
        debug!("Calling tool");
        async move { Ok(self.execute_tool(&request.name, request.arguments).await) }
    }

    fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = Result<ListResourcesResult, McpError>> + Send + '_ {
        async move {
            Ok(ListResourcesResult {
                resources: resources::list(),
                ..Default::default()
            })
        }
    }

    #[instrument(skip(self, request, _context), fields(uri = %request.uri))]
    fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = Result<ReadResourceResult, McpError>> + Send + '_ {
        debug!("Reading resource");
        std::future::ready(resources::read(&request.uri))
    }

    fn list_prompts(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = Result<ListPromptsResult, McpError>> + Send + '_ {
        async move {
            Ok(ListPromptsResult {
                prompts: prompts::list(),
                ..Default::default()
            })
        }
    }

    #[instrument(skip(self, request, _context), fields(prompt = %request.name))]
    fn get_prompt(
        &self,
        request: GetPromptRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = Result<GetPromptResult, McpError>> + Send + '_ {
        debug!("Rendering prompt");
        std::future::ready(prompts::render(&request.name, request.arguments.as_ref()))
    }
}
