//! Pagination utilities for GitHub API responses.
//!
//! GitHub list endpoints return one page per request and advertise the next
//! page through a `Link: <url>; rel="next"` header. A [`Paginator`] walks
//! those cursors one page at a time; [`GitHubClient::paginate`] folds the
//! pages into a single accumulator according to a [`PaginationMode`].

use std::marker::PhantomData;

use reqwest::header::{HeaderMap, LINK};
use reqwest::Response;
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::client::GitHubClient;
use crate::error::{GitHubError, Result};

/// Maximum pages to fetch (safety limit).
const MAX_PAGES: u32 = 1000;

/// Whether a list call stops after the first page or drains every page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PaginationMode {
    /// Return only the first page. Later pages are available through a
    /// [`Paginator`].
    #[default]
    FirstPage,
    /// Follow `next` cursors until the server stops sending them.
    All,
}

/// A list response that later pages can be appended to.
///
/// The first page becomes the accumulator; each following page is passed to
/// [`absorb`](Accumulate::absorb). Implementations must append items in the
/// order received and keep scalar fields (such as `total_count`) from the
/// first page.
pub trait Accumulate {
    /// Append the items of `page` to `self`.
    fn absorb(&mut self, page: Self);
}

impl<T> Accumulate for Vec<T> {
    fn absorb(&mut self, page: Self) {
        self.extend(page);
    }
}

/// Restartable, lazily advancing sequence of pages from one endpoint.
///
/// Each call to [`next_page`](Paginator::next_page) performs at most one
/// request and completes before the next cursor is followed.
///
/// # Example
///
/// ```no_run
/// use ghvars::{GitHubClient, Paginator, VariableList};
///
/// # async fn example() -> ghvars::Result<()> {
/// let client = GitHubClient::from_env()?.with_per_page(1);
/// let mut pages: Paginator<'_, VariableList> =
///     client.paginator("repos/octocat/hello-world/actions/variables");
///
/// while let Some(page) = pages.next_page().await? {
///     for variable in page.variables {
///         println!("{}", variable.name);
///     }
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Paginator<'a, T> {
    client: &'a GitHubClient,
    path: String,
    next: Option<Url>,
    started: bool,
    pages_fetched: u32,
    _marker: PhantomData<fn() -> T>,
}

#[derive(Serialize)]
struct PageQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    per_page: Option<u32>,
}

impl<'a, T: DeserializeOwned> Paginator<'a, T> {
    /// Create a paginator for `path`, relative to the client's base URL.
    pub fn new(client: &'a GitHubClient, path: impl Into<String>) -> Self {
        Self {
            client,
            path: path.into(),
            next: None,
            started: false,
            pages_fetched: 0,
            _marker: PhantomData,
        }
    }

    /// Whether another call to [`next_page`](Self::next_page) will issue a request.
    pub fn has_next(&self) -> bool {
        !self.started || self.next.is_some()
    }

    /// The cursor that the next call will follow, once the first page is in.
    pub fn next_cursor(&self) -> Option<&Url> {
        self.next.as_ref()
    }

    /// Number of pages fetched since creation or the last restart.
    pub fn pages_fetched(&self) -> u32 {
        self.pages_fetched
    }

    /// Forget all cursors so the next call fetches the first page again.
    pub fn restart(&mut self) {
        self.next = None;
        self.started = false;
        self.pages_fetched = 0;
    }

    /// Fetch the next page, or `None` once the server sends no further cursor.
    ///
    /// # Errors
    ///
    /// Returns any error raised by the underlying request unchanged.
    pub async fn next_page(&mut self) -> Result<Option<T>> {
        if !self.started {
            return self.first_page().await.map(Some);
        }

        let Some(url) = self.next.take() else {
            return Ok(None);
        };

        let response = self.client.get_url(url).await?;
        self.accept(response).await.map(Some)
    }

    /// Fetch pages according to `mode` and fold each later page into the
    /// first with `fold`.
    ///
    /// Always starts from the first page.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by any page request.
    pub async fn fold<F>(mut self, mode: PaginationMode, mut fold: F) -> Result<T>
    where
        F: FnMut(&mut T, T),
    {
        self.restart();
        let mut acc = self.first_page().await?;

        if mode == PaginationMode::FirstPage {
            return Ok(acc);
        }

        while let Some(page) = self.next_page().await? {
            fold(&mut acc, page);
        }

        Ok(acc)
    }

    async fn first_page(&mut self) -> Result<T> {
        self.started = true;
        let query = PageQuery {
            per_page: self.client.per_page(),
        };
        let response = self.client.get_with_query(&self.path, &query).await?;
        self.accept(response).await
    }

    async fn accept(&mut self, response: Response) -> Result<T> {
        self.next = next_link(response.headers());
        self.pages_fetched += 1;

        tracing::debug!(
            path = %self.path,
            page = self.pages_fetched,
            next = ?self.next,
            "fetched page"
        );

        if self.next.is_some() && self.pages_fetched >= MAX_PAGES {
            tracing::warn!(
                "Reached pagination limit of {} pages, stopping",
                MAX_PAGES
            );
            self.next = None;
        }

        response.json().await.map_err(GitHubError::HttpError)
    }
}

impl GitHubClient {
    /// Create a [`Paginator`] over `path`.
    pub fn paginator<T: DeserializeOwned>(&self, path: impl Into<String>) -> Paginator<'_, T> {
        Paginator::new(self, path)
    }

    /// GET a list endpoint, following cursors if auto-pagination is enabled.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by any page request.
    pub async fn paginate<T>(&self, path: &str) -> Result<T>
    where
        T: Accumulate + DeserializeOwned,
    {
        self.paginate_mode(path, self.pagination_mode()).await
    }

    /// Like [`paginate`](Self::paginate) with an explicit mode.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by any page request.
    pub async fn paginate_mode<T>(&self, path: &str, mode: PaginationMode) -> Result<T>
    where
        T: Accumulate + DeserializeOwned,
    {
        self.paginate_with(path, mode, T::absorb).await
    }

    /// Like [`paginate_mode`](Self::paginate_mode) with a caller-supplied fold.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by any page request.
    pub async fn paginate_with<T, F>(&self, path: &str, mode: PaginationMode, fold: F) -> Result<T>
    where
        T: DeserializeOwned,
        F: FnMut(&mut T, T),
    {
        self.paginator(path).fold(mode, fold).await
    }
}

/// Extract the `rel="next"` target from a response's `Link` header.
pub(crate) fn next_link(headers: &HeaderMap) -> Option<Url> {
    headers
        .get_all(LINK)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find_map(|v| find_rel(v, "next"))
        .and_then(|target| Url::parse(target).ok())
}

/// Find the target of the link whose `rel` includes `rel` in an RFC 8288
/// `Link` header value.
fn find_rel<'h>(header: &'h str, rel: &str) -> Option<&'h str> {
    header.split(',').find_map(|link| {
        let mut parts = link.split(';');
        let target = parts
            .next()?
            .trim()
            .strip_prefix('<')?
            .strip_suffix('>')?;

        let matches = parts.any(|param| {
            let Some((key, value)) = param.split_once('=') else {
                return false;
            };
            key.trim().eq_ignore_ascii_case("rel")
                && value
                    .trim()
                    .trim_matches('"')
                    .split_ascii_whitespace()
                    .any(|r| r.eq_ignore_ascii_case(rel))
        });

        matches.then_some(target)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    const GITHUB_LINK: &str = "<https://api.github.com/repositories/1/actions/variables?per_page=1&page=2>; rel=\"next\", \
         <https://api.github.com/repositories/1/actions/variables?per_page=1&page=3>; rel=\"last\"";

    #[test]
    fn test_find_rel_next_and_last() {
        assert_eq!(
            find_rel(GITHUB_LINK, "next"),
            Some("https://api.github.com/repositories/1/actions/variables?per_page=1&page=2")
        );
        assert_eq!(
            find_rel(GITHUB_LINK, "last"),
            Some("https://api.github.com/repositories/1/actions/variables?per_page=1&page=3")
        );
        assert_eq!(find_rel(GITHUB_LINK, "prev"), None);
    }

    #[test]
    fn test_find_rel_handles_unquoted_and_multi_valued_rel() {
        assert_eq!(find_rel("<https://x/a>; rel=next", "next"), Some("https://x/a"));
        assert_eq!(
            find_rel("<https://x/b>; title=\"t\"; rel=\"prev next\"", "next"),
            Some("https://x/b")
        );
    }

    #[test]
    fn test_find_rel_ignores_malformed_links() {
        assert_eq!(find_rel("https://x/a; rel=\"next\"", "next"), None);
        assert_eq!(find_rel("", "next"), None);
    }

    #[test]
    fn test_next_link_from_headers() {
        let mut headers = HeaderMap::new();
        assert!(next_link(&headers).is_none());

        headers.insert(LINK, HeaderValue::from_static(GITHUB_LINK));
        let next = next_link(&headers).unwrap();
        assert_eq!(next.query(), Some("per_page=1&page=2"));
    }

    #[test]
    fn test_vec_accumulates_in_order() {
        let mut acc = vec![1, 2];
        acc.absorb(vec![3]);
        acc.absorb(vec![4, 5]);
        assert_eq!(acc, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_pagination_mode_default() {
        assert_eq!(PaginationMode::default(), PaginationMode::FirstPage);
    }

    #[test]
    fn test_page_query_omits_missing_per_page() {
        let query = serde_qs::to_string(&PageQuery { per_page: None }).unwrap();
        assert_eq!(query, "");
        let query = serde_qs::to_string(&PageQuery { per_page: Some(1) }).unwrap();
        assert_eq!(query, "per_page=1");
    }

    #[test]
    fn test_paginator_starts_with_a_pending_first_page() {
        let client = GitHubClient::new("token", "https://api.github.com").unwrap();
        let mut pages: Paginator<'_, Vec<u32>> = client.paginator("repos/a/b/actions/variables");
        assert!(pages.has_next());
        assert!(pages.next_cursor().is_none());
        assert_eq!(pages.pages_fetched(), 0);

        pages.restart();
        assert!(pages.has_next());
    }
}
