//! Update trait for modifying entities.

use async_trait::async_trait;

use crate::client::GitHubClient;
use crate::error::Result;

/// Update an existing entity.
///
/// Implement this trait for entity types that can be modified
/// after creation. GitHub answers these requests with `204 No Content`,
/// so nothing is returned on success.
///
/// # Example
///
/// ```ignore
/// use ghvars::{GitHubClient, UpdateVariable, Variable, Update};
///
/// let client = GitHubClient::from_env()?;
/// Variable::update(
///     &client,
///     id,
///     UpdateVariable {
///         value: Some("new-value".to_string()),
///         ..Default::default()
///     },
/// ).await?;
/// ```
#[async_trait]
pub trait Update: Sized {
    /// The ID type for this entity.
    type Id: Send;

    /// Parameters for the update.
    type Params: Send;

    /// Update the entity.
    ///
    /// # Arguments
    ///
    /// * `client` - The GitHub API client
    /// * `id` - The entity identifier
    /// * `params` - Update parameters
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found or the request fails.
    async fn update(client: &GitHubClient, id: Self::Id, params: Self::Params) -> Result<()>;
}
