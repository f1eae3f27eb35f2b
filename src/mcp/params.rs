//! MCP tool parameter types with JSON Schema support.

use schemars::JsonSchema;
use serde::Deserialize;

/// Parameters for the `get` MCP tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetParams {
    /// Repository as `owner/name` or numeric id.
    pub repo: String,
    /// Deployment environment; omit for repository-level variables.
    #[serde(default)]
    pub environment: Option<String>,
    /// Variable name.
    pub name: String,
}

/// Parameters for the `list` MCP tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListParams {
    /// Repository as `owner/name` or numeric id.
    pub repo: String,
    /// Deployment environment; omit for repository-level variables.
    #[serde(default)]
    pub environment: Option<String>,
    /// Number of variables per page (max 100).
    #[serde(default)]
    pub per_page: Option<u32>,
    /// Fetch every page instead of only the first.
    #[serde(default)]
    pub all: bool,
}

/// Parameters for the `create` MCP tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateParams {
    /// Repository as `owner/name` or numeric id.
    pub repo: String,
    /// Deployment environment; omit for repository-level variables.
    #[serde(default)]
    pub environment: Option<String>,
    /// Variable name.
    pub name: String,
    /// Variable value.
    pub value: String,
}

/// Parameters for the `update` MCP tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct UpdateParams {
    /// Repository as `owner/name` or numeric id.
    pub repo: String,
    /// Deployment environment; omit for repository-level variables.
    #[serde(default)]
    pub environment: Option<String>,
    /// Current variable name.
    pub name: String,
    /// New value.
    #[serde(default)]
    pub value: Option<String>,
    /// New name.
    #[serde(default)]
    pub new_name: Option<String>,
}

/// Parameters for the `delete` MCP tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DeleteParams {
    /// Repository as `owner/name` or numeric id.
    pub repo: String,
    /// Deployment environment; omit for repository-level variables.
    #[serde(default)]
    pub environment: Option<String>,
    /// Variable name.
    pub name: String,
}
