//! Repository Catalog: resolves a GitHub username to a bounded, ordered list
//! of repository snapshots.
//!
//! `AppState` holds an `Arc<dyn RepositoryCatalog>`; the GitHub-backed client is
//! the production implementation.

pub mod cache;
pub mod github;
pub mod handlers;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::repository::RepositorySnapshot;
use crate::models::user::GitHubProfile;

pub use github::GitHubCatalogClient;

/// Upper bound accepted for any catalog request.
pub const MAX_CATALOG_LIMIT: usize = 20;
/// Default catalog size for an import session.
pub const DEFAULT_CATALOG_LIMIT: usize = 10;

const MAX_USERNAME_LEN: usize = 39;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("{0}")]
    Validation(String),

    #[error("GitHub user '{0}' not found")]
    NotFound(String),

    #[error("GitHub API error (status {status:?}): {message}")]
    Upstream { status: Option<u16>, message: String },
}

#[async_trait]
pub trait RepositoryCatalog: Send + Sync {
    /// Returns at most `limit` snapshots, in a stable order for unchanged upstream data.
    async fn list_repositories(
        &self,
        username: &str,
        limit: usize,
    ) -> Result<Vec<RepositorySnapshot>, CatalogError>;

    /// Public account details for `username`.
    async fn user_profile(&self, username: &str) -> Result<GitHubProfile, CatalogError>;

    /// Drops any cached catalog and profile for `username`.
    async fn invalidate(&self, _username: &str) {}
}

/// Checks a username before any network round-trip. Returns the trimmed name.
pub fn validate_username(username: &str) -> Result<&str, CatalogError> {
    let username = username.trim();
    if username.is_empty() {
        return Err(CatalogError::Validation(
            "username cannot be empty".to_string(),
        ));
    }
    if username.len() > MAX_USERNAME_LEN {
        return Err(CatalogError::Validation(format!(
            "username cannot exceed {MAX_USERNAME_LEN} characters"
        )));
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-')
    {
        return Err(CatalogError::Validation(format!(
            "'{username}' is not a valid GitHub username"
        )));
    }
    Ok(username)
}

pub fn validate_limit(limit: usize) -> Result<usize, CatalogError> {
    if (1..=MAX_CATALOG_LIMIT).contains(&limit) {
        Ok(limit)
    } else {
        Err(CatalogError::Validation(format!(
            "limit must be between 1 and {MAX_CATALOG_LIMIT}"
        )))
    }
}
