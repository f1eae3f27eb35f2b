//! MCP Server handler for the GitHub Actions variables API.

use rmcp::{
    handler::server::ServerHandler,
    model::{
        CallToolRequestParam, CallToolResult, Content, ErrorData as McpError, Implementation,
        ListToolsResult, PaginatedRequestParam, ServerCapabilities, ServerInfo, Tool,
        ToolsCapability,
    },
    service::RequestContext,
    RoleServer,
};
use schemars::JsonSchema;
use serde::Serialize;
use std::sync::Arc;

use crate::{
    mcp::{CreateParams, DeleteParams, GetParams, ListParams, UpdateParams},
    Create, CreateVariable, Delete, Get, GitHubClient, GitHubError, List, PaginationMode,
    RepositoryRef, Update, UpdateVariable, Variable, VariableId, VariableScope,
};

/// GitHub Actions variables MCP Server.
///
/// Implements the MCP ServerHandler trait, providing tools to manage
/// variables through the Model Context Protocol.
///
/// # Tools
///
/// - `get` - Fetch a single variable
/// - `list` - List variables, one page or all pages
/// - `create` - Create a variable
/// - `update` - Change a variable's value or name
/// - `delete` - Delete a variable
#[derive(Clone)]
pub struct GitHubServer {
    client: Arc<GitHubClient>,
}

impl GitHubServer {
    /// Create a new GitHubServer from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if `GITHUB_TOKEN` is not set.
    pub fn from_env() -> crate::Result<Self> {
        let client = GitHubClient::from_env()?;
        Ok(Self::new(client))
    }

    /// Create a new GitHubServer with an existing client.
    pub fn new(client: GitHubClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }

    /// Generate JSON Schema for a type.
    fn schema<T: JsonSchema>() -> Arc<serde_json::Map<String, serde_json::Value>> {
        let schema = schemars::schema_for!(T);
        let value = serde_json::to_value(&schema).unwrap_or(serde_json::json!({}));
        match value {
            serde_json::Value::Object(map) => Arc::new(map),
            _ => Arc::new(serde_json::Map::new()),
        }
    }

    /// Convert GitHubError to McpError.
    fn to_mcp_error(err: GitHubError) -> McpError {
        match &err {
            GitHubError::NotFound { message } => {
                McpError::resource_not_found(message.clone(), None)
            }
            GitHubError::ConfigMissing(msg) => McpError::invalid_params(msg.clone(), None),
            GitHubError::InvalidRepository(_) | GitHubError::Validation { .. } => {
                McpError::invalid_params(err.to_string(), None)
            }
            _ => McpError::internal_error(err.to_string(), None),
        }
    }

    fn scope(repo: &str, environment: Option<String>) -> Result<VariableScope, McpError> {
        let repo: RepositoryRef = repo.parse().map_err(Self::to_mcp_error)?;
        Ok(match environment {
            Some(env) => VariableScope::environment(repo, env),
            None => VariableScope::repository(repo),
        })
    }

    fn json<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
        let text = serde_json::to_string_pretty(value)
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    fn status_result(
        client: &GitHubClient,
        action: &str,
        id: &VariableId,
    ) -> Result<CallToolResult, McpError> {
        Self::json(&serde_json::json!({
            "status": client.last_response().map(|r| r.status),
            "message": format!("{action} {} in {}", id.name, id.scope),
        }))
    }

    /// Route a tool call by name, parsing `args` into that tool's parameters.
    ///
    /// # Errors
    ///
    /// Returns `invalid_params` for an unknown tool or arguments that don't
    /// match the tool's schema, otherwise whatever the tool returns.
    pub async fn dispatch(
        &self,
        tool: &str,
        args: serde_json::Value,
    ) -> Result<CallToolResult, McpError> {
        fn parse<T: serde::de::DeserializeOwned>(args: serde_json::Value) -> Result<T, McpError> {
            serde_json::from_value(args).map_err(|e| McpError::invalid_params(e.to_string(), None))
        }

        match tool {
            "get" => self.handle_get(parse(args)?).await,
            "list" => self.handle_list(parse(args)?).await,
            "create" => self.handle_create(parse(args)?).await,
            "update" => self.handle_update(parse(args)?).await,
            "delete" => self.handle_delete(parse(args)?).await,
            other => Err(McpError::invalid_params(
                format!("Unknown tool: {other}"),
                None,
            )),
        }
    }

    /// Handle the `get` tool.
    ///
    /// # Errors
    ///
    /// Returns an MCP error if the repository is malformed or the API call fails.
    pub async fn handle_get(&self, params: GetParams) -> Result<CallToolResult, McpError> {
        let scope = Self::scope(&params.repo, params.environment)?;
        let variable = Variable::get(&self.client, VariableId::new(scope, params.name))
            .await
            .map_err(Self::to_mcp_error)?;
        Self::json(&variable)
    }

    /// Handle the `list` tool.
    async fn handle_list(&self, params: ListParams) -> Result<CallToolResult, McpError> {
        let scope = Self::scope(&params.repo, params.environment)?;
        let client = match params.per_page {
            Some(n) => self.client.detached().with_per_page(n),
            None => self.client.detached(),
        };
        let mode = if params.all {
            PaginationMode::All
        } else {
            PaginationMode::FirstPage
        };

        let list = Variable::list_with_mode(&client, &scope, mode)
            .await
            .map_err(Self::to_mcp_error)?;
        Self::json(&list)
    }

    /// Handle the `create` tool.
    async fn handle_create(&self, params: CreateParams) -> Result<CallToolResult, McpError> {
        let scope = Self::scope(&params.repo, params.environment)?;
        let id = VariableId::new(scope, params.name.as_str());
        let client = self.client.detached();
        Variable::create(
            &client,
            &id.scope,
            CreateVariable::new(params.name, params.value),
        )
        .await
        .map_err(Self::to_mcp_error)?;
        Self::status_result(&client, "Created", &id)
    }

    /// Handle the `update` tool.
    async fn handle_update(&self, params: UpdateParams) -> Result<CallToolResult, McpError> {
        if params.value.is_none() && params.new_name.is_none() {
            return Err(McpError::invalid_params(
                "At least one of value or new_name is required",
                None,
            ));
        }

        let scope = Self::scope(&params.repo, params.environment)?;
        let id = VariableId::new(scope, params.name);
        let update = UpdateVariable {
            name: params.new_name,
            value: params.value,
        };
        let client = self.client.detached();
        Variable::update(&client, id.clone(), update)
            .await
            .map_err(Self::to_mcp_error)?;
        Self::status_result(&client, "Updated", &id)
    }

    /// Handle the `delete` tool.
    async fn handle_delete(&self, params: DeleteParams) -> Result<CallToolResult, McpError> {
        let scope = Self::scope(&params.repo, params.environment)?;
        let id = VariableId::new(scope, params.name);
        let client = self.client.detached();
        let deleted = Variable::delete(&client, id.clone())
            .await
            .map_err(Self::to_mcp_error)?;
        if !deleted {
            return Err(McpError::internal_error(
                format!("Unexpected response deleting {}", id.name),
                None,
            ));
        }
        Self::status_result(&client, "Deleted", &id)
    }
}

impl ServerHandler for GitHubServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: Default::default(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {
                    list_changed: Some(false),
                }),
                ..Default::default()
            },
            server_info: Implementation {
                name: "ghvars".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            instructions: Some(
                "GitHub Actions variables MCP Server - Read and manage repository and environment variables."
                    .to_string(),
            ),
        }
    }

    async fn list_tools(
        &self,
        _request: PaginatedRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        let tools = vec![
            Tool::new(
                "get",
                "Fetch one GitHub Actions variable by name. \
                 Set environment for environment-level variables.",
                Self::schema::<GetParams>(),
            ),
            Tool::new(
                "list",
                "List GitHub Actions variables of a repository or environment. \
                 Returns the first page unless all = true.",
                Self::schema::<ListParams>(),
            ),
            Tool::new(
                "create",
                "Create a GitHub Actions variable. GitHub upper-cases the name.",
                Self::schema::<CreateParams>(),
            ),
            Tool::new(
                "update",
                "Update a GitHub Actions variable's value and/or rename it.",
                Self::schema::<UpdateParams>(),
            ),
            Tool::new(
                "delete",
                "Delete a GitHub Actions variable.",
                Self::schema::<DeleteParams>(),
            ),
        ];

        Ok(ListToolsResult {
            tools,
            next_cursor: None,
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        let args = request
            .arguments
            .map(serde_json::Value::Object)
            .unwrap_or(serde_json::json!({}));

        self.dispatch(request.name.as_ref(), args).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn text(result: &CallToolResult) -> &str {
        match &result.content[0].raw {
            rmcp::model::RawContent::Text(t) => &t.text,
            _ => panic!("Expected text content"),
        }
    }

    #[test]
    fn schema_generates_for_every_tool() {
        assert!(!GitHubServer::schema::<GetParams>().is_empty());
        assert!(!GitHubServer::schema::<ListParams>().is_empty());
        assert!(!GitHubServer::schema::<CreateParams>().is_empty());
        assert!(!GitHubServer::schema::<UpdateParams>().is_empty());
        assert!(!GitHubServer::schema::<DeleteParams>().is_empty());
    }

    #[test]
    fn server_implements_handler() {
        fn assert_server_handler<T: ServerHandler>() {}
        assert_server_handler::<GitHubServer>();
    }

    #[test]
    fn server_info_has_correct_name() {
        let client = GitHubClient::new("test-token", "https://api.github.com").unwrap();
        let info = GitHubServer::new(client).get_info();
        assert_eq!(info.server_info.name, "ghvars");
    }

    #[tokio::test]
    async fn handle_list_returns_first_page() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/repos/octocat/hello-world/actions/variables"))
            .and(query_param("per_page", "1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header(
                        "link",
                        format!(
                            "<{}/repositories/1/actions/variables?per_page=1&page=2>; rel=\"next\"",
                            mock_server.uri()
                        )
                        .as_str(),
                    )
                    .set_body_json(serde_json::json!({
                        "total_count": 2,
                        "variables": [{ "name": "A", "value": "1" }]
                    })),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = GitHubClient::new("test-token", &mock_server.uri()).unwrap();
        let server = GitHubServer::new(client);

        let params = ListParams {
            repo: "octocat/hello-world".to_string(),
            environment: None,
            per_page: Some(1),
            all: false,
        };

        let result = server.handle_list(params).await.unwrap();
        assert!(!result.is_error.unwrap_or(false));

        let list: serde_json::Value = serde_json::from_str(text(&result)).unwrap();
        assert_eq!(list["total_count"], 2);
        assert_eq!(list["variables"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn handle_list_rejects_malformed_repo() {
        let mock_server = MockServer::start().await;
        let client = GitHubClient::new("test-token", &mock_server.uri()).unwrap();
        let server = GitHubServer::new(client);

        let params = ListParams {
            repo: "not-a-repo".to_string(),
            environment: None,
            per_page: None,
            all: false,
        };

        let err = server.handle_list(params).await.unwrap_err();
        assert!(err.message.contains("not-a-repo"));
    }

    #[tokio::test]
    async fn handle_create_targets_environment() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/repos/octocat/hello-world/environments/production/variables"))
            .and(body_json(serde_json::json!({ "name": "REGION", "value": "eu" })))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = GitHubClient::new("test-token", &mock_server.uri()).unwrap();
        let server = GitHubServer::new(client);

        let params = CreateParams {
            repo: "octocat/hello-world".to_string(),
            environment: Some("production".to_string()),
            name: "REGION".to_string(),
            value: "eu".to_string(),
        };

        let result = server.handle_create(params).await.unwrap();
        let body: serde_json::Value = serde_json::from_str(text(&result)).unwrap();
        assert_eq!(body["status"], 201);
    }

    #[tokio::test]
    async fn handle_update_requires_a_change() {
        let mock_server = MockServer::start().await;
        let client = GitHubClient::new("test-token", &mock_server.uri()).unwrap();
        let server = GitHubServer::new(client);

        let params = UpdateParams {
            repo: "octocat/hello-world".to_string(),
            environment: None,
            name: "A".to_string(),
            value: None,
            new_name: None,
        };

        let err = server.handle_update(params).await.unwrap_err();
        assert!(err.message.contains("value"));
    }

    #[tokio::test]
    async fn handle_delete_missing_variable_is_not_found() {
        let mock_server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/repos/octocat/hello-world/actions/variables/MISSING"))
            .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
                "message": "Not Found"
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = GitHubClient::new("test-token", &mock_server.uri()).unwrap();
        let server = GitHubServer::new(client);

        let params = DeleteParams {
            repo: "octocat/hello-world".to_string(),
            environment: None,
            name: "MISSING".to_string(),
        };

        let err = server.handle_delete(params).await.unwrap_err();
        assert_eq!(err.message, "Not Found");
    }
}
