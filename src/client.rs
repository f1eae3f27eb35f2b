//! GitHub API client.
//!
//! Low-level HTTP client that handles authentication and raw requests.
//! Higher-level operations are implemented via traits on entity types.

use std::env;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Client, Response, StatusCode};
use serde::Serialize;
use url::Url;

use crate::error::{GitHubError, Result};
use crate::pagination::{next_link, PaginationMode};

const DEFAULT_API_URL: &str = "https://api.github.com";
const USER_AGENT: &str = concat!("ghvars/", env!("CARGO_PKG_VERSION"));
const GITHUB_MEDIA_TYPE: &str = "application/vnd.github+json";
const GITHUB_API_VERSION: &str = "2022-11-28";

/// Largest page size the GitHub API accepts.
pub const MAX_PER_PAGE: u32 = 100;

/// Status and pagination metadata of the most recent response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LastResponse {
    /// HTTP status code.
    pub status: u16,
    /// The `rel="next"` cursor from the `Link` header, if any.
    pub next: Option<Url>,
}

/// Low-level GitHub API client.
///
/// Handles authentication and HTTP requests. Entity-specific operations
/// are implemented via the `Get`, `List`, `Create`, `Update` and `Delete`
/// traits on model types.
///
/// This struct is cheaply cloneable; clones reference the same underlying
/// connection pool and the same last-response record.
///
/// # Example
///
/// ```no_run
/// use ghvars::GitHubClient;
///
/// # fn example() -> ghvars::Result<()> {
/// // Create from environment variables
/// let client = GitHubClient::from_env()?;
///
/// // Or configure manually
/// let client = GitHubClient::new("ghp_token", "https://api.github.com")?
///     .with_per_page(50)
///     .with_auto_paginate(true);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct GitHubClient {
    http: Client,
    base_url: Arc<Url>,
    token: String,
    per_page: Option<u32>,
    auto_paginate: bool,
    last_response: Arc<Mutex<Option<LastResponse>>>,
}

impl std::fmt::Debug for GitHubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubClient")
            .field("base_url", &self.base_url.as_str())
            .field("per_page", &self.per_page)
            .field("auto_paginate", &self.auto_paginate)
            .finish_non_exhaustive()
    }
}

impl GitHubClient {
    /// Create a client from environment variables.
    ///
    /// Uses `GITHUB_TOKEN` for authentication and optionally `GITHUB_API_URL`
    /// for the base URL (defaults to `https://api.github.com`).
    /// `GITHUB_PER_PAGE` and `GITHUB_AUTO_PAGINATE` configure list behavior.
    ///
    /// # Errors
    ///
    /// Returns an error if `GITHUB_TOKEN` is not set or an optional variable
    /// holds an unparseable value.
    pub fn from_env() -> Result<Self> {
        let token = env::var("GITHUB_TOKEN").map_err(|_| {
            GitHubError::ConfigMissing("GITHUB_TOKEN environment variable not set".to_string())
        })?;

        let base_url = env::var("GITHUB_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        let mut client = Self::new(&token, &base_url)?;

        if let Ok(raw) = env::var("GITHUB_PER_PAGE") {
            let per_page: u32 = raw.trim().parse().map_err(|_| {
                GitHubError::ConfigMissing(format!("GITHUB_PER_PAGE must be a number, got '{raw}'"))
            })?;
            client = client.with_per_page(per_page);
        }

        if let Ok(raw) = env::var("GITHUB_AUTO_PAGINATE") {
            client = client.with_auto_paginate(parse_flag(&raw).ok_or_else(|| {
                GitHubError::ConfigMissing(format!(
                    "GITHUB_AUTO_PAGINATE must be true or false, got '{raw}'"
                ))
            })?);
        }

        Ok(client)
    }

    /// Create a new client with the provided token and base URL.
    ///
    /// # Arguments
    ///
    /// * `token` - GitHub token (classic PAT, fine-grained PAT or app token)
    /// * `base_url` - Base URL for the GitHub API (e.g., `https://api.github.com`)
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid.
    pub fn new(token: &str, base_url: &str) -> Result<Self> {
        // Ensure base URL ends with /
        let base_url_str = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };

        let base_url = Url::parse(&base_url_str)?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_MEDIA_TYPE));
        headers.insert(
            "x-github-api-version",
            HeaderValue::from_static(GITHUB_API_VERSION),
        );

        let http = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .brotli(true)
            .gzip(true)
            .deflate(true)
            .timeout(Duration::from_secs(300))
            .build()
            .map_err(GitHubError::HttpError)?;

        Ok(Self {
            http,
            base_url: Arc::new(base_url),
            token: token.to_string(),
            per_page: None,
            auto_paginate: false,
            last_response: Arc::new(Mutex::new(None)),
        })
    }

    /// Set the page size sent with list requests (clamped to 1..=100).
    #[must_use]
    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = Some(per_page.clamp(1, MAX_PER_PAGE));
        self
    }

    /// Follow every `next` cursor on list requests instead of stopping
    /// after the first page.
    #[must_use]
    pub fn with_auto_paginate(mut self, auto_paginate: bool) -> Self {
        self.auto_paginate = auto_paginate;
        self
    }

    /// A copy sharing the connection pool and settings, with its own
    /// last-response record.
    ///
    /// Concurrent callers of one client overwrite each other's
    /// [`last_response`](Self::last_response); each should work on a
    /// detached copy instead.
    #[must_use]
    pub fn detached(&self) -> Self {
        Self {
            last_response: Arc::new(Mutex::new(None)),
            ..self.clone()
        }
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Configured page size, if any.
    pub fn per_page(&self) -> Option<u32> {
        self.per_page
    }

    /// Pagination mode used by list operations that don't override it.
    pub fn pagination_mode(&self) -> PaginationMode {
        if self.auto_paginate {
            PaginationMode::All
        } else {
            PaginationMode::FirstPage
        }
    }

    /// Status and `next` cursor of the most recent response, successful or not.
    pub fn last_response(&self) -> Option<LastResponse> {
        self.last_response
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Make a GET request.
    #[tracing::instrument(skip(self))]
    pub async fn get(&self, path: &str) -> Result<Response> {
        let url = self.base_url.join(path)?;
        self.get_url(url).await
    }

    /// Make a GET request with query parameters.
    #[tracing::instrument(skip(self, query))]
    pub async fn get_with_query<Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
    ) -> Result<Response> {
        let url = self.base_url.join(path)?;

        let response = self
            .http
            .get(url)
            .bearer_auth(&self.token)
            .query(query)
            .send()
            .await
            .map_err(GitHubError::HttpError)?;

        self.finish(response).await
    }

    /// Make a GET request to an absolute URL, such as a pagination cursor.
    #[tracing::instrument(skip(self))]
    pub async fn get_url(&self, url: Url) -> Result<Response> {
        let response = self
            .http
            .get(url)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(GitHubError::HttpError)?;

        self.finish(response).await
    }

    /// Make a POST request with JSON body.
    #[tracing::instrument(skip(self, body))]
    pub async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Response> {
        let url = self.base_url.join(path)?;

        let response = self
            .http
            .post(url)
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .await
            .map_err(GitHubError::HttpError)?;

        self.finish(response).await
    }

    /// Make a PATCH request with JSON body.
    #[tracing::instrument(skip(self, body))]
    pub async fn patch<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Response> {
        let url = self.base_url.join(path)?;

        let response = self
            .http
            .patch(url)
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .await
            .map_err(GitHubError::HttpError)?;

        self.finish(response).await
    }

    /// Make a DELETE request.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, path: &str) -> Result<Response> {
        let url = self.base_url.join(path)?;

        let response = self
            .http
            .delete(url)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(GitHubError::HttpError)?;

        self.finish(response).await
    }

    /// Record the response metadata, then check its status.
    async fn finish(&self, response: Response) -> Result<Response> {
        let record = LastResponse {
            status: response.status().as_u16(),
            next: next_link(response.headers()),
        };
        tracing::debug!(status = record.status, next = ?record.next, "GitHub response");
        *self
            .last_response
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(record);

        Self::check_response(response).await
    }

    /// Check response status and convert errors.
    async fn check_response(response: Response) -> Result<Response> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        // Handle rate limiting
        let rate_limited =
            status == StatusCode::TOO_MANY_REQUESTS || Self::quota_exhausted(&response);
        let retry_after_secs = rate_limited
            .then(|| Self::retry_after(response.headers()))
            .flatten();

        let message = Self::extract_error_message(response, status).await;
        if rate_limited {
            return Err(GitHubError::RateLimited {
                message,
                status_code: status.as_u16(),
                retry_after_secs,
            });
        }

        Err(match status {
            StatusCode::NOT_FOUND => GitHubError::NotFound { message },
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => GitHubError::Unauthorized {
                message,
                status_code: status.as_u16(),
            },
            StatusCode::UNPROCESSABLE_ENTITY => GitHubError::Validation { message },
            _ => GitHubError::ApiError {
                message,
                status_code: Some(status.as_u16()),
            },
        })
    }

    /// A 403 with no remaining quota is a primary rate limit, not a permission error.
    fn quota_exhausted(response: &Response) -> bool {
        response.status() == StatusCode::FORBIDDEN
            && response
                .headers()
                .get("x-ratelimit-remaining")
                .and_then(|v| v.to_str().ok())
                == Some("0")
    }

    fn retry_after(headers: &HeaderMap) -> Option<u64> {
        let header = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());

        if let Some(secs) = header("retry-after").and_then(|v| v.parse().ok()) {
            return Some(secs);
        }

        let reset: i64 = header("x-ratelimit-reset")?.parse().ok()?;
        let now = chrono::Utc::now().timestamp();
        Some(reset.saturating_sub(now).max(0) as u64)
    }

    /// Extract error message from a failed response.
    async fn extract_error_message(response: Response, status: StatusCode) -> String {
        let body = match response.text().await {
            Ok(b) => b,
            Err(_) => return format!("HTTP {status}"),
        };

        // Try to parse as JSON and extract message field
        if let Ok(json) = serde_json::from_str::<serde_json::Value>(&body) {
            if let Some(msg) = json.get("message").and_then(|m| m.as_str()) {
                return msg.to_string();
            }
        }

        if body.is_empty() {
            format!("HTTP {status}")
        } else {
            body
        }
    }
}

/// Whether a status code counts as success for boolean-returning operations.
pub fn boolean_from_status(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::CREATED | StatusCode::ACCEPTED | StatusCode::NO_CONTENT
    )
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
