//! Repository identifiers and their canonical API path segments.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{GitHubError, Result};

/// A GitHub repository, addressed either by numeric id or by owner and name.
///
/// Every variable endpoint is rooted at the repository's path segment:
/// `repositories/{id}` for numeric ids and `repos/{owner}/{name}` otherwise.
///
/// # Example
///
/// ```
/// use ghvars::RepositoryRef;
///
/// let repo: RepositoryRef = "octocat/hello-world".parse().unwrap();
/// assert_eq!(repo.path(), "repos/octocat/hello-world");
///
/// let repo: RepositoryRef = "1296269".parse().unwrap();
/// assert_eq!(repo.path(), "repositories/1296269");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RepositoryRef {
    /// Numeric repository id.
    Id(u64),
    /// Owner login and repository name.
    Name { owner: String, name: String },
}

impl RepositoryRef {
    /// Build a reference from an owner and a repository name.
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self::Name {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Canonical path segment, without leading or trailing slash.
    pub fn path(&self) -> String {
        match self {
            Self::Id(id) => format!("repositories/{id}"),
            Self::Name { owner, name } => format!(
                "repos/{}/{}",
                urlencoding::encode(owner),
                urlencoding::encode(name)
            ),
        }
    }

    /// The `owner/name` form, if this reference carries one.
    pub fn full_name(&self) -> Option<String> {
        match self {
            Self::Id(_) => None,
            Self::Name { owner, name } => Some(format!("{owner}/{name}")),
        }
    }
}

impl FromStr for RepositoryRef {
    type Err = GitHubError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
            return s
                .parse()
                .map(Self::Id)
                .map_err(|_| GitHubError::InvalidRepository(s.to_string()));
        }

        match s.split_once('/') {
            Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
                Ok(Self::new(owner, name))
            }
            _ => Err(GitHubError::InvalidRepository(s.to_string())),
        }
    }
}

impl TryFrom<&str> for RepositoryRef {
    type Error = GitHubError;

    fn try_from(s: &str) -> Result<Self> {
        s.parse()
    }
}

impl From<u64> for RepositoryRef {
    fn from(id: u64) -> Self {
        Self::Id(id)
    }
}

impl<O: Into<String>, N: Into<String>> From<(O, N)> for RepositoryRef {
    fn from((owner, name): (O, N)) -> Self {
        Self::new(owner, name)
    }
}

impl fmt::Display for RepositoryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{id}"),
            Self::Name { owner, name } => write!(f, "{owner}/{name}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_owner_name() {
        let repo: RepositoryRef = "octocat/hello-world".parse().unwrap();
        assert_eq!(repo, RepositoryRef::new("octocat", "hello-world"));
        assert_eq!(repo.path(), "repos/octocat/hello-world");
        assert_eq!(repo.full_name().as_deref(), Some("octocat/hello-world"));
    }

    #[test]
    fn test_parse_numeric_id() {
        let repo: RepositoryRef = "42".parse().unwrap();
        assert_eq!(repo, RepositoryRef::Id(42));
        assert_eq!(repo.path(), "repositories/42");
        assert!(repo.full_name().is_none());
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in ["", "octocat", "/repo", "owner/", "a/b/c"] {
            let result: Result<RepositoryRef> = bad.parse();
            assert!(
                matches!(result, Err(GitHubError::InvalidRepository(_))),
                "expected {bad:?} to be rejected"
            );
        }
    }

    #[test]
    fn test_path_encodes_segments() {
        let repo = RepositoryRef::new("my org", "repo#1");
        assert_eq!(repo.path(), "repos/my%20org/repo%231");
    }

    #[test]
    fn test_conversions_and_display() {
        assert_eq!(RepositoryRef::from(7u64).to_string(), "7");
        assert_eq!(RepositoryRef::from(("a", "b")).to_string(), "a/b");
        assert!(RepositoryRef::try_from("a/b").is_ok());
    }
}
