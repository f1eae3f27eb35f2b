//! Test data fixtures for the mock server.
//!
//! Provides factory functions for creating realistic test data.

use chrono::{TimeZone, Utc};

use super::state::{MockState, ScopeKey};
use crate::Variable;

/// Full name of the repository in the default scenario.
pub const DEFAULT_REPO: &str = "octocat/hello-world";

/// Numeric id of the repository in the default scenario.
pub const DEFAULT_REPO_ID: u64 = 1_296_269;

/// Collection of fixture factories for test data.
pub struct Fixtures;

impl Fixtures {
    /// Create a variable with fixed timestamps.
    pub fn variable(name: &str, value: &str) -> Variable {
        let created = Utc.with_ymd_and_hms(2024, 1, 15, 9, 30, 0).single();
        Variable {
            name: name.to_string(),
            value: value.to_string(),
            created_at: created,
            updated_at: created,
        }
    }

    /// Scope key for repository-level variables.
    pub fn repo_scope(repo: &str) -> ScopeKey {
        ScopeKey {
            repo: repo.to_string(),
            environment: None,
        }
    }

    /// Scope key for environment-level variables.
    pub fn env_scope(repo: &str, environment: &str) -> ScopeKey {
        ScopeKey {
            repo: repo.to_string(),
            environment: Some(environment.to_string()),
        }
    }

    /// The default scenario:
    ///
    /// - `octocat/hello-world` (id 1296269) with `USERNAME` and `API_URL`
    /// - environment `production` with `REGION`
    /// - environment `staging` with no variables
    pub fn default_scenario() -> MockState {
        MockState::new()
            .with_repository(DEFAULT_REPO, DEFAULT_REPO_ID)
            .with_variable(
                &Self::repo_scope(DEFAULT_REPO),
                Self::variable("USERNAME", "octocat"),
            )
            .with_variable(
                &Self::repo_scope(DEFAULT_REPO),
                Self::variable("API_URL", "https://api.example.com"),
            )
            .with_variable(
                &Self::env_scope(DEFAULT_REPO, "production"),
                Self::variable("REGION", "eu-west-1"),
            )
            .with_environment(DEFAULT_REPO, "staging")
    }

    /// A repository with `count` variables named `VAR_1` to `VAR_{count}`.
    pub fn repository_with_variables(repo: &str, id: u64, count: usize) -> MockState {
        (1..=count).fold(MockState::new().with_repository(repo, id), |state, i| {
            state.with_variable(
                &Self::repo_scope(repo),
                Self::variable(&format!("VAR_{i}"), &format!("value-{i}")),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scenario_contents() {
        let state = Fixtures::default_scenario();
        let repo = Fixtures::repo_scope(DEFAULT_REPO);

        assert_eq!(state.list_variables(&repo).unwrap().len(), 2);
        assert_eq!(state.repository_name(DEFAULT_REPO_ID), Some(DEFAULT_REPO));
        assert!(state
            .list_variables(&Fixtures::env_scope(DEFAULT_REPO, "staging"))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_repository_with_variables_order() {
        let state = Fixtures::repository_with_variables("a/b", 7, 3);
        let names: Vec<_> = state
            .list_variables(&Fixtures::repo_scope("a/b"))
            .unwrap()
            .iter()
            .map(|v| v.name.clone())
            .collect();
        assert_eq!(names, ["VAR_1", "VAR_2", "VAR_3"]);
    }
}
