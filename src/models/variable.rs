//! Actions variable model and trait implementations.
//!
//! Covers both repository-level variables
//! (`/repos/{owner}/{repo}/actions/variables`) and environment-level
//! variables (`/repos/{owner}/{repo}/environments/{env}/variables`).

use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::{boolean_from_status, GitHubClient};
use crate::error::{GitHubError, Result};
use crate::pagination::Accumulate;
use crate::repository::RepositoryRef;
use crate::traits::{Create, Delete, Get, List, Update};

/// A GitHub Actions configuration variable.
///
/// GitHub stores variable names upper-cased, so a variable created as
/// `api_url` comes back as `API_URL`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    /// Variable name.
    pub name: String,

    /// Variable value, in plain text.
    pub value: String,

    /// When the variable was created.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    /// When the variable was last updated.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// One page, or several folded pages, of a variable listing.
///
/// `total_count` always reflects the first page's value: the number of
/// variables in the whole collection, regardless of how many were fetched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableList {
    /// Number of variables in the collection.
    pub total_count: u64,

    /// The variables fetched so far, in server order.
    #[serde(default)]
    pub variables: Vec<Variable>,
}

impl VariableList {
    /// Returns true if no variables were fetched.
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Number of variables fetched.
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    /// Whether the collection holds more variables than were fetched.
    pub fn is_partial(&self) -> bool {
        (self.variables.len() as u64) < self.total_count
    }

    /// Returns an iterator over the fetched variables.
    pub fn iter(&self) -> std::slice::Iter<'_, Variable> {
        self.variables.iter()
    }
}

impl Accumulate for VariableList {
    fn absorb(&mut self, page: Self) {
        self.variables.extend(page.variables);
    }
}

impl IntoIterator for VariableList {
    type Item = Variable;
    type IntoIter = std::vec::IntoIter<Variable>;

    fn into_iter(self) -> Self::IntoIter {
        self.variables.into_iter()
    }
}

impl<'a> IntoIterator for &'a VariableList {
    type Item = &'a Variable;
    type IntoIter = std::slice::Iter<'a, Variable>;

    fn into_iter(self) -> Self::IntoIter {
        self.variables.iter()
    }
}

/// Where a variable lives: on the repository or on one of its environments.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum VariableScope {
    /// Repository-level variables.
    Repository(RepositoryRef),
    /// Variables of a named deployment environment.
    Environment(RepositoryRef, String),
}

impl VariableScope {
    /// Repository-level scope.
    pub fn repository(repo: impl Into<RepositoryRef>) -> Self {
        Self::Repository(repo.into())
    }

    /// Environment-level scope.
    pub fn environment(repo: impl Into<RepositoryRef>, environment: impl Into<String>) -> Self {
        Self::Environment(repo.into(), environment.into())
    }

    /// The repository this scope belongs to.
    pub fn repo(&self) -> &RepositoryRef {
        match self {
            Self::Repository(repo) | Self::Environment(repo, _) => repo,
        }
    }

    /// The environment name, for environment scopes.
    pub fn environment_name(&self) -> Option<&str> {
        match self {
            Self::Repository(_) => None,
            Self::Environment(_, env) => Some(env),
        }
    }

    /// Collection path, e.g. `repos/octocat/hello-world/actions/variables`.
    pub fn collection_path(&self) -> String {
        match self {
            Self::Repository(repo) => format!("{}/actions/variables", repo.path()),
            Self::Environment(repo, env) => format!(
                "{}/environments/{}/variables",
                repo.path(),
                urlencoding::encode(env)
            ),
        }
    }

    /// Path of a single variable in this scope.
    pub fn variable_path(&self, name: &str) -> String {
        format!("{}/{}", self.collection_path(), urlencoding::encode(name))
    }
}

impl fmt::Display for VariableScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Repository(repo) => write!(f, "{repo}"),
            Self::Environment(repo, env) => write!(f, "{repo} (environment '{env}')"),
        }
    }
}

/// Identifies one variable: its scope plus its name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VariableId {
    /// Where the variable lives.
    pub scope: VariableScope,
    /// Variable name.
    pub name: String,
}

impl VariableId {
    /// Create an identifier.
    pub fn new(scope: VariableScope, name: impl Into<String>) -> Self {
        Self {
            scope,
            name: name.into(),
        }
    }

    /// API path of the variable.
    pub fn path(&self) -> String {
        self.scope.variable_path(&self.name)
    }
}

/// Parameters for creating a variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateVariable {
    /// Variable name.
    pub name: String,
    /// Variable value.
    pub value: String,
}

impl CreateVariable {
    /// Create parameters from a name and value.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Parameters for updating a variable.
///
/// Unset fields are left unchanged. Setting `name` renames the variable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateVariable {
    /// New variable name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// New variable value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

#[async_trait]
impl Get for Variable {
    type Id = VariableId;

    #[tracing::instrument(skip(client))]
    async fn get(client: &GitHubClient, id: VariableId) -> Result<Self> {
        let response = client.get(&id.path()).await?;
        let variable: Variable = response.json().await.map_err(GitHubError::HttpError)?;
        Ok(variable)
    }
}

#[async_trait]
impl List for Variable {
    type Parent = VariableScope;
    type Page = VariableList;

    fn list_path(scope: &VariableScope) -> String {
        scope.collection_path()
    }
}

#[async_trait]
impl Create for Variable {
    type Parent = VariableScope;
    type Params = CreateVariable;

    #[tracing::instrument(skip(client, params), fields(name = %params.name))]
    async fn create(
        client: &GitHubClient,
        scope: &VariableScope,
        params: CreateVariable,
    ) -> Result<()> {
        client.post(&scope.collection_path(), &params).await?;
        Ok(())
    }
}

#[async_trait]
impl Update for Variable {
    type Id = VariableId;
    type Params = UpdateVariable;

    #[tracing::instrument(skip(client, params))]
    async fn update(client: &GitHubClient, id: VariableId, params: UpdateVariable) -> Result<()> {
        client.patch(&id.path(), &params).await?;
        Ok(())
    }
}

#[async_trait]
impl Delete for Variable {
    type Id = VariableId;

    #[tracing::instrument(skip(client))]
    async fn delete(client: &GitHubClient, id: VariableId) -> Result<bool> {
        let response = client.delete(&id.path()).await?;
        Ok(boolean_from_status(response.status()))
    }
}

// Named wrappers, one per endpoint.

/// List repository variables.
///
/// Returns only the first page unless the client auto-paginates.
pub async fn list_actions_variables(
    client: &GitHubClient,
    repo: impl Into<RepositoryRef>,
) -> Result<VariableList> {
    Variable::list(client, &VariableScope::repository(repo)).await
}

/// Get a repository variable.
pub async fn get_actions_variable(
    client: &GitHubClient,
    repo: impl Into<RepositoryRef>,
    name: &str,
) -> Result<Variable> {
    Variable::get(client, VariableId::new(VariableScope::repository(repo), name)).await
}

/// Create a repository variable.
pub async fn create_actions_variable(
    client: &GitHubClient,
    repo: impl Into<RepositoryRef>,
    params: CreateVariable,
) -> Result<()> {
    Variable::create(client, &VariableScope::repository(repo), params).await
}

/// Update a repository variable.
pub async fn update_actions_variable(
    client: &GitHubClient,
    repo: impl Into<RepositoryRef>,
    name: &str,
    params: UpdateVariable,
) -> Result<()> {
    Variable::update(
        client,
        VariableId::new(VariableScope::repository(repo), name),
        params,
    )
    .await
}

/// Delete a repository variable.
pub async fn delete_actions_variable(
    client: &GitHubClient,
    repo: impl Into<RepositoryRef>,
    name: &str,
) -> Result<bool> {
    Variable::delete(client, VariableId::new(VariableScope::repository(repo), name)).await
}

/// List the variables of a deployment environment.
///
/// Returns only the first page unless the client auto-paginates.
pub async fn list_actions_environment_variables(
    client: &GitHubClient,
    repo: impl Into<RepositoryRef>,
    environment: &str,
) -> Result<VariableList> {
    Variable::list(client, &VariableScope::environment(repo, environment)).await
}

/// Get an environment variable.
pub async fn get_actions_environment_variable(
    client: &GitHubClient,
    repo: impl Into<RepositoryRef>,
    environment: &str,
    name: &str,
) -> Result<Variable> {
    Variable::get(
        client,
        VariableId::new(VariableScope::environment(repo, environment), name),
    )
    .await
}

/// Create an environment variable.
pub async fn create_actions_environment_variable(
    client: &GitHubClient,
    repo: impl Into<RepositoryRef>,
    environment: &str,
    params: CreateVariable,
) -> Result<()> {
    Variable::create(client, &VariableScope::environment(repo, environment), params).await
}

/// Update an environment variable.
pub async fn update_actions_environment_variable(
    client: &GitHubClient,
    repo: impl Into<RepositoryRef>,
    environment: &str,
    name: &str,
    params: UpdateVariable,
) -> Result<()> {
    Variable::update(
        client,
        VariableId::new(VariableScope::environment(repo, environment), name),
        params,
    )
    .await
}

/// Delete an environment variable.
pub async fn delete_actions_environment_variable(
    client: &GitHubClient,
    repo: impl Into<RepositoryRef>,
    environment: &str,
    name: &str,
) -> Result<bool> {
    Variable::delete(
        client,
        VariableId::new(VariableScope::environment(repo, environment), name),
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn variable(name: &str) -> Variable {
        Variable {
            name: name.to_string(),
            value: "v".to_string(),
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_variable_deserializes_github_payload() {
        let variable: Variable = serde_json::from_value(serde_json::json!({
            "name": "USERNAME",
            "value": "octocat",
            "created_at": "2021-08-10T14:59:22Z",
            "updated_at": "2022-01-10T14:59:22Z"
        }))
        .unwrap();

        assert_eq!(variable.name, "USERNAME");
        assert_eq!(variable.value, "octocat");
        assert_eq!(
            variable.created_at.unwrap().to_rfc3339(),
            "2021-08-10T14:59:22+00:00"
        );
    }

    #[test]
    fn test_variable_list_defaults_missing_variables() {
        let list: VariableList =
            serde_json::from_value(serde_json::json!({ "total_count": 0 })).unwrap();
        assert!(list.is_empty());
        assert!(!list.is_partial());
    }

    #[test]
    fn test_absorb_keeps_first_total_and_order() {
        let mut first = VariableList {
            total_count: 3,
            variables: vec![variable("A")],
        };
        first.absorb(VariableList {
            total_count: 99,
            variables: vec![variable("B"), variable("A")],
        });

        assert_eq!(first.total_count, 3);
        let names: Vec<_> = first.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, ["A", "B", "A"]);
    }

    #[test]
    fn test_scope_paths() {
        let repo = RepositoryRef::new("octocat", "hello-world");

        let scope = VariableScope::repository(repo.clone());
        assert_eq!(
            scope.collection_path(),
            "repos/octocat/hello-world/actions/variables"
        );
        assert_eq!(
            scope.variable_path("API_URL"),
            "repos/octocat/hello-world/actions/variables/API_URL"
        );
        assert_eq!(scope.environment_name(), None);

        let scope = VariableScope::environment(repo, "production eu");
        assert_eq!(
            scope.collection_path(),
            "repos/octocat/hello-world/environments/production%20eu/variables"
        );
        assert_eq!(scope.environment_name(), Some("production eu"));

        let id = VariableId::new(VariableScope::repository(42u64), "TOKEN");
        assert_eq!(id.path(), "repositories/42/actions/variables/TOKEN");
    }

    #[test]
    fn test_update_params_omit_unset_fields() {
        let params = UpdateVariable {
            value: Some("new-value".to_string()),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&params).unwrap(),
            serde_json::json!({ "value": "new-value" })
        );
    }

    #[test]
    fn test_scope_display() {
        let scope = VariableScope::environment(("o", "r"), "staging");
        assert_eq!(scope.to_string(), "o/r (environment 'staging')");
    }
}
