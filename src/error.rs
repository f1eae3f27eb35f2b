//! Error types for GitHub API operations.

use thiserror::Error;

/// Errors that can occur during GitHub API operations.
#[derive(Debug, Error)]
pub enum GitHubError {
    /// Configuration is missing or incomplete.
    #[error("GitHub configuration required: {0}")]
    ConfigMissing(String),

    /// Invalid repository identifier.
    #[error("Invalid repository '{0}': expected 'owner/name' or a numeric id")]
    InvalidRepository(String),

    /// Resource not found (HTTP 404).
    #[error("Not found: {message}")]
    NotFound { message: String },

    /// Credentials rejected or insufficient (HTTP 401/403).
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String, status_code: u16 },

    /// Request body rejected by the server (HTTP 422).
    #[error("Validation failed: {message}")]
    Validation { message: String },

    /// API request failed.
    #[error("GitHub API error: {message}")]
    ApiError {
        message: String,
        status_code: Option<u16>,
    },

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("Failed to parse response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    /// Rate limited (HTTP 429, or 403 with no remaining quota).
    #[error("Rate limited ({status_code}): {message}")]
    RateLimited {
        message: String,
        status_code: u16,
        retry_after_secs: Option<u64>,
    },
}

impl GitHubError {
    /// HTTP status code carried by this error, if it came from a response.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::NotFound { .. } => Some(404),
            Self::Unauthorized { status_code, .. } => Some(*status_code),
            Self::Validation { .. } => Some(422),
            Self::ApiError { status_code, .. } => *status_code,
            Self::RateLimited { status_code, .. } => Some(*status_code),
            Self::HttpError(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns true for HTTP 404 errors.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Result type alias for GitHub operations.
pub type Result<T> = core::result::Result<T, GitHubError>;
