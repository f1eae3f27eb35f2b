//! Get trait for fetching single entities.

use async_trait::async_trait;

use crate::client::GitHubClient;
use crate::error::Result;

/// Fetch a single entity by ID.
///
/// Implement this trait for entity types that can be fetched individually
/// by a unique identifier.
///
/// # Example
///
/// ```ignore
/// use ghvars::{GitHubClient, Variable, VariableId, VariableScope, Get};
///
/// let client = GitHubClient::from_env()?;
/// let id = VariableId::new(VariableScope::repository("octocat/hello-world".parse()?), "API_URL");
/// let variable = Variable::get(&client, id).await?;
/// ```
#[async_trait]
pub trait Get: Sized {
    /// The ID type for this entity.
    type Id: Send;

    /// Fetch the entity by ID.
    ///
    /// # Arguments
    ///
    /// * `client` - The GitHub API client
    /// * `id` - The entity identifier
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found or the request fails.
    async fn get(client: &GitHubClient, id: Self::Id) -> Result<Self>;
}
