//! MCP (Model Context Protocol) server and tool types.
//!
//! This module provides an MCP server implementation for the GitHub Actions
//! variables API, allowing AI assistants to read and manage repository and
//! environment variables.
//!
//! # Example
//!
//! ```no_run
//! use ghvars::mcp::GitHubServer;
//!
//! # fn main() -> ghvars::Result<()> {
//! let server = GitHubServer::from_env()?;
//! // Server can now be used with rmcp transport
//! # Ok(())
//! # }
//! ```

mod params;
mod server;

pub use params::*;
pub use server::GitHubServer;
