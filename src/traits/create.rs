//! Create trait for adding entities.

use async_trait::async_trait;

use crate::client::GitHubClient;
use crate::error::Result;

/// Create a new entity under a parent collection.
#[async_trait]
pub trait Create: Sized {
    /// The collection the entity is created in.
    type Parent: Send + Sync;

    /// Fields of the new entity.
    type Params: Send + Sync;

    /// Create the entity.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent does not exist, the server rejects
    /// the parameters, or the request fails.
    async fn create(client: &GitHubClient, parent: &Self::Parent, params: Self::Params)
        -> Result<()>;
}
