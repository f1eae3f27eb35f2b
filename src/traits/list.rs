//! List trait for fetching collections of entities.

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::client::GitHubClient;
use crate::error::Result;
use crate::pagination::{Accumulate, PaginationMode, Paginator};

/// List entities with cursor pagination support.
///
/// Implementors only name the collection path and the page type; fetching
/// and folding pages is shared.
///
/// # Example
///
/// ```ignore
/// use ghvars::{GitHubClient, List, Variable, VariableScope};
///
/// let client = GitHubClient::from_env()?.with_per_page(30);
/// let scope = VariableScope::repository("octocat/hello-world".parse()?);
///
/// // First page only, unless the client auto-paginates
/// let page = Variable::list(&client, &scope).await?;
///
/// // Every page
/// let all = Variable::list_all(&client, &scope).await?;
/// ```
#[async_trait]
pub trait List: Sized + Send {
    /// The collection being listed.
    type Parent: Send + Sync;

    /// Response body of one page; later pages are folded into the first.
    type Page: Accumulate + DeserializeOwned + Send;

    /// Path of the collection, relative to the API base URL.
    fn list_path(parent: &Self::Parent) -> String;

    /// List entities using the client's configured pagination mode.
    ///
    /// # Errors
    ///
    /// Returns an error if any page request fails.
    async fn list(client: &GitHubClient, parent: &Self::Parent) -> Result<Self::Page> {
        Self::list_with_mode(client, parent, client.pagination_mode()).await
    }

    /// List all entities, following every `next` cursor.
    ///
    /// # Errors
    ///
    /// Returns an error if any page request fails.
    async fn list_all(client: &GitHubClient, parent: &Self::Parent) -> Result<Self::Page> {
        Self::list_with_mode(client, parent, PaginationMode::All).await
    }

    /// List entities with an explicit pagination mode.
    ///
    /// # Errors
    ///
    /// Returns an error if any page request fails.
    async fn list_with_mode(
        client: &GitHubClient,
        parent: &Self::Parent,
        mode: PaginationMode,
    ) -> Result<Self::Page> {
        client.paginate_mode(&Self::list_path(parent), mode).await
    }

    /// Page-by-page access to the collection.
    fn pages<'a>(client: &'a GitHubClient, parent: &Self::Parent) -> Paginator<'a, Self::Page> {
        client.paginator(Self::list_path(parent))
    }
}
