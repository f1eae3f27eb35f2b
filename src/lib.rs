//! GitHub Actions variables API client library.
//!
//! A Rust library for managing GitHub Actions configuration variables,
//! both repository-level and environment-level, using a trait-based
//! architecture where each operation (Get, List, Create, Update, Delete)
//! is defined as a trait that entity types implement.
//!
//! # Quick Start
//!
//! ```no_run
//! use ghvars::{CreateVariable, GitHubClient, RepositoryRef};
//!
//! #[tokio::main]
//! async fn main() -> ghvars::Result<()> {
//!     // Create client from environment variables
//!     let client = GitHubClient::from_env()?;
//!     let repo: RepositoryRef = "octocat/hello-world".parse()?;
//!
//!     // Create a variable
//!     ghvars::create_actions_variable(
//!         &client,
//!         repo.clone(),
//!         CreateVariable::new("API_URL", "https://example.com"),
//!     )
//!     .await?;
//!
//!     // List the first page of variables
//!     let list = ghvars::list_actions_variables(&client, repo.clone()).await?;
//!     println!("{} of {} variables", list.len(), list.total_count);
//!
//!     // List every variable of an environment
//!     let client = client.with_auto_paginate(true);
//!     let list = ghvars::list_actions_environment_variables(&client, repo, "production").await?;
//!     println!("Found {} variables", list.len());
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! The library is organized around five core traits:
//!
//! - [`Get`] - Fetch a single entity by ID
//! - [`List`] - Fetch paginated collections of entities
//! - [`Create`] - Add an entity to a collection
//! - [`Update`] - Modify an existing entity
//! - [`Delete`] - Remove an entity
//!
//! [`Variable`] implements all of them; the `*_actions_*` functions are
//! named shortcuts for each endpoint.
//!
//! # Pagination
//!
//! List calls return the first page only unless auto-pagination is
//! enabled, either on the client ([`GitHubClient::with_auto_paginate`]) or
//! per call ([`List::list_all`]). [`Paginator`] fetches pages one at a time.
//!
//! # Configuration
//!
//! The client reads configuration from environment variables:
//!
//! - `GITHUB_TOKEN` (required) - A GitHub token with access to the repository
//! - `GITHUB_API_URL` (optional) - Base URL (defaults to `https://api.github.com`)
//! - `GITHUB_PER_PAGE` (optional) - Page size for list calls (1-100)
//! - `GITHUB_AUTO_PAGINATE` (optional) - Follow every page on list calls

mod client;
mod error;
mod models;
mod pagination;
mod repository;
mod traits;

pub mod cli;
pub mod mcp;
pub mod output;

#[cfg(feature = "test-server")]
pub mod mock_server;

// Re-export core types
pub use client::{boolean_from_status, GitHubClient, LastResponse, MAX_PER_PAGE};
pub use error::{GitHubError, Result};
pub use pagination::{Accumulate, PaginationMode, Paginator};
pub use repository::RepositoryRef;

// Re-export traits
pub use traits::{Create, Delete, Get, List, Update};

// Re-export models
pub use models::{CreateVariable, UpdateVariable, Variable, VariableId, VariableList, VariableScope};

// Re-export convenience functions
pub use models::{
    create_actions_environment_variable, create_actions_variable,
    delete_actions_environment_variable, delete_actions_variable,
    get_actions_environment_variable, get_actions_variable, list_actions_environment_variables,
    list_actions_variables, update_actions_environment_variable, update_actions_variable,
};
