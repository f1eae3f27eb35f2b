//! CLI argument parsing types.
//!
//! This module provides the command-line interface structure for the ghvars binary.

use clap::{Args, Parser, Subcommand};

use crate::{GitHubError, RepositoryRef, VariableScope};

/// GitHub Actions variables command-line interface.
#[derive(Parser, Debug)]
#[command(name = "ghvars", about = "Manage GitHub Actions variables", version)]
pub struct Cli {
    /// Output results as JSON instead of a table.
    #[arg(long, global = true, default_value = "false")]
    pub json: bool,

    /// Log HTTP requests and pagination to stderr.
    #[arg(short, long, global = true, default_value = "false")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Repository and optional environment shared by every command.
#[derive(Args, Debug, Clone)]
pub struct Target {
    /// Repository as `owner/name` or numeric id.
    pub repo: String,

    /// Deployment environment; omit for repository-level variables.
    #[arg(long, short = 'e')]
    pub env: Option<String>,
}

impl Target {
    /// Resolve into a variable scope.
    ///
    /// # Errors
    ///
    /// Returns [`GitHubError::InvalidRepository`] for malformed repositories.
    pub fn scope(&self) -> Result<VariableScope, GitHubError> {
        let repo: RepositoryRef = self.repo.parse()?;
        Ok(match &self.env {
            Some(env) => VariableScope::environment(repo, env.clone()),
            None => VariableScope::repository(repo),
        })
    }
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List variables.
    List {
        #[command(flatten)]
        target: Target,

        /// Number of variables per page (max 100).
        #[arg(long)]
        per_page: Option<u32>,

        /// Fetch every page instead of only the first.
        #[arg(long)]
        all: bool,
    },

    /// Get a single variable.
    Get {
        #[command(flatten)]
        target: Target,

        /// Variable name.
        name: String,
    },

    /// Create a variable.
    Create {
        #[command(flatten)]
        target: Target,

        /// Variable name.
        name: String,

        /// Variable value.
        value: String,
    },

    /// Update a variable's value or name.
    Update {
        #[command(flatten)]
        target: Target,

        /// Variable name.
        name: String,

        /// New value.
        #[arg(long)]
        value: Option<String>,

        /// New name.
        #[arg(long)]
        rename: Option<String>,
    },

    /// Delete a variable.
    Delete {
        #[command(flatten)]
        target: Target,

        /// Variable name.
        name: String,
    },
}
