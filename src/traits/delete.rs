//! Delete trait for removing entities.

use async_trait::async_trait;

use crate::client::GitHubClient;
use crate::error::Result;

/// Delete an existing entity.
#[async_trait]
pub trait Delete: Sized {
    /// The ID type for this entity.
    type Id: Send;

    /// Delete the entity.
    ///
    /// Returns whether the server acknowledged the deletion with a
    /// success status (201, 202 or 204).
    ///
    /// # Errors
    ///
    /// Returns an error if the entity does not exist or the request fails.
    /// A missing entity is never reported as `Ok(false)`.
    async fn delete(client: &GitHubClient, id: Self::Id) -> Result<bool>;
}
