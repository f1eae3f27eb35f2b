//! Mock GitHub API server for E2E testing.
//!
//! This module provides an in-memory mock server that simulates the GitHub
//! Actions variables API for integration and end-to-end testing. Unlike
//! wiremock which mocks at the HTTP level per-test, this server maintains
//! state across requests, enabling realistic workflow testing.
//!
//! # Example
//!
//! ```ignore
//! use ghvars::mock_server::MockServer;
//! use ghvars::GitHubClient;
//!
//! #[tokio::test]
//! async fn test_workflow() {
//!     let server = MockServer::start().await;
//!     let client = GitHubClient::new("test-token", server.url()).unwrap();
//!
//!     // Server comes with default fixtures
//!     let list = ghvars::list_actions_variables(&client, ("octocat", "hello-world"))
//!         .await
//!         .unwrap();
//!     assert_eq!(list.total_count, 2);
//!
//!     server.shutdown().await;
//! }
//! ```

mod fixtures;
mod handlers;
mod server;
mod state;

pub use fixtures::{Fixtures, DEFAULT_REPO, DEFAULT_REPO_ID};
pub use server::MockServer;
pub use state::{MockError, MockRepository, MockState, ScopeKey};
