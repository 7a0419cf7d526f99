//! Axum route handlers for stateless catalog lookups.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::catalog::{validate_limit, validate_username, DEFAULT_CATALOG_LIMIT};
use crate::errors::AppError;
use crate::models::repository::RepositorySnapshot;
use crate::models::user::GitHubProfile;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CatalogQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    pub username: String,
    pub repos: Vec<RepositorySnapshot>,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub username: String,
}

/// GET /api/v1/github/users/:username/repos?limit=
pub async fn handle_list_repositories(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Query(query): Query<CatalogQuery>,
) -> Result<Json<CatalogResponse>, AppError> {
    let username = validate_username(&username)?.to_string();
    let limit = validate_limit(query.limit.unwrap_or(DEFAULT_CATALOG_LIMIT))?;

    let repos = state.catalog.list_repositories(&username, limit).await?;

    Ok(Json(CatalogResponse { username, repos }))
}

/// GET /api/v1/github/users/:username/profile
pub async fn handle_user_profile(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<GitHubProfile>, AppError> {
    let username = validate_username(&username)?;
    Ok(Json(state.catalog.user_profile(username).await?))
}

/// POST /api/v1/github/cache/refresh
///
/// Drops the cached catalog so the next lookup goes upstream.
pub async fn handle_refresh_cache(
    State(state): State<AppState>,
    Json(request): Json<RefreshRequest>,
) -> Result<StatusCode, AppError> {
    let username = validate_username(&request.username)?;
    state.catalog.invalidate(username).await;
    info!("Catalog cache refreshed for {username}");
    Ok(StatusCode::NO_CONTENT)
}
