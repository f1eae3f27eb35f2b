//! Mock server state management.
//!
//! Provides the in-memory data store for the mock GitHub API server.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;

use crate::{CreateVariable, UpdateVariable, Variable};

/// A repository known to the mock server.
#[derive(Debug, Clone, Default)]
pub struct MockRepository {
    /// Numeric repository id, served under `/repositories/{id}`.
    pub id: u64,
    /// Repository-level variables, in creation order.
    pub variables: Vec<Variable>,
    /// Environment-level variables by environment name, in creation order.
    pub environments: HashMap<String, Vec<Variable>>,
}

/// Addresses one variable collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeKey {
    /// Repository full name (`owner/name`).
    pub repo: String,
    /// Environment name, for environment collections.
    pub environment: Option<String>,
}

/// Why a state mutation was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockError {
    /// The repository, environment or variable does not exist.
    NotFound,
    /// A variable with that name already exists.
    AlreadyExists,
}

/// Shared state for the mock server.
///
/// This struct holds all the mock data that the server will serve.
/// It's wrapped in `Arc<RwLock<_>>` for concurrent access.
#[derive(Debug, Default)]
pub struct MockState {
    /// Repositories indexed by full name (e.g., "octocat/hello-world").
    pub repositories: HashMap<String, MockRepository>,

    /// Optional authentication token. If set, requests must include this token.
    pub required_token: Option<String>,
}

impl MockState {
    /// Create a new empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create state wrapped in Arc<RwLock> for sharing.
    pub fn shared(self) -> Arc<RwLock<Self>> {
        Arc::new(RwLock::new(self))
    }

    /// Add a repository with no variables.
    pub fn with_repository(mut self, full_name: &str, id: u64) -> Self {
        self.repositories
            .entry(full_name.to_string())
            .or_default()
            .id = id;
        self
    }

    /// Add an environment to a repository, creating the repository if needed.
    pub fn with_environment(mut self, full_name: &str, environment: &str) -> Self {
        self.repositories
            .entry(full_name.to_string())
            .or_default()
            .environments
            .entry(environment.to_string())
            .or_default();
        self
    }

    /// Add a variable to a collection, creating the repository or environment if needed.
    pub fn with_variable(mut self, scope: &ScopeKey, variable: Variable) -> Self {
        let repo = self.repositories.entry(scope.repo.clone()).or_default();
        let variables = match &scope.environment {
            Some(env) => repo.environments.entry(env.clone()).or_default(),
            None => &mut repo.variables,
        };
        variables.push(variable);
        self
    }

    /// Set the required authentication token.
    pub fn with_required_token(mut self, token: &str) -> Self {
        self.required_token = Some(token.to_string());
        self
    }

    /// Full name of the repository with the given id.
    pub fn repository_name(&self, id: u64) -> Option<&str> {
        self.repositories
            .iter()
            .find(|(_, repo)| repo.id == id)
            .map(|(name, _)| name.as_str())
    }

    /// Variables of a collection, or `None` if the collection does not exist.
    pub fn list_variables(&self, scope: &ScopeKey) -> Option<&[Variable]> {
        let repo = self.repositories.get(&scope.repo)?;
        match &scope.environment {
            Some(env) => repo.environments.get(env).map(Vec::as_slice),
            None => Some(&repo.variables),
        }
    }

    /// Get a variable by name (case-insensitive, as GitHub stores names upper-cased).
    pub fn get_variable(&self, scope: &ScopeKey, name: &str) -> Option<&Variable> {
        self.list_variables(scope)?
            .iter()
            .find(|v| v.name.eq_ignore_ascii_case(name))
    }

    fn variables_mut(&mut self, scope: &ScopeKey) -> Option<&mut Vec<Variable>> {
        let repo = self.repositories.get_mut(&scope.repo)?;
        match &scope.environment {
            Some(env) => repo.environments.get_mut(env),
            None => Some(&mut repo.variables),
        }
    }

    /// Create a variable; its name is upper-cased.
    pub fn create_variable(
        &mut self,
        scope: &ScopeKey,
        params: CreateVariable,
    ) -> Result<&Variable, MockError> {
        let variables = self.variables_mut(scope).ok_or(MockError::NotFound)?;
        let name = params.name.to_ascii_uppercase();
        if variables.iter().any(|v| v.name == name) {
            return Err(MockError::AlreadyExists);
        }

        let now = Utc::now();
        variables.push(Variable {
            name,
            value: params.value,
            created_at: Some(now),
            updated_at: Some(now),
        });
        variables.last().ok_or(MockError::NotFound)
    }

    /// Update a variable's value and/or name.
    pub fn update_variable(
        &mut self,
        scope: &ScopeKey,
        name: &str,
        params: UpdateVariable,
    ) -> Result<&Variable, MockError> {
        let variables = self.variables_mut(scope).ok_or(MockError::NotFound)?;
        let new_name = params.name.map(|n| n.to_ascii_uppercase());
        if let Some(ref new_name) = new_name {
            if !new_name.eq_ignore_ascii_case(name) && variables.iter().any(|v| &v.name == new_name)
            {
                return Err(MockError::AlreadyExists);
            }
        }

        let variable = variables
            .iter_mut()
            .find(|v| v.name.eq_ignore_ascii_case(name))
            .ok_or(MockError::NotFound)?;
        if let Some(new_name) = new_name {
            variable.name = new_name;
        }
        if let Some(value) = params.value {
            variable.value = value;
        }
        variable.updated_at = Some(Utc::now());
        Ok(variable)
    }

    /// Delete a variable.
    pub fn delete_variable(&mut self, scope: &ScopeKey, name: &str) -> Result<Variable, MockError> {
        let variables = self.variables_mut(scope).ok_or(MockError::NotFound)?;
        let index = variables
            .iter()
            .position(|v| v.name.eq_ignore_ascii_case(name))
            .ok_or(MockError::NotFound)?;
        Ok(variables.remove(index))
    }
}
