//! Axum route handlers for the session-scoped import flow.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::catalog::validate_username;
use crate::errors::AppError;
use crate::import::session::ImportStatus;
use crate::models::analysis::ImportResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoadCatalogRequest {
    pub username: String,
}

#[derive(Debug, Deserialize)]
pub struct ToggleRequest {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct ToggleResponse {
    pub name: String,
    pub selected: bool,
    pub selection: Vec<String>,
}

/// POST /api/v1/sessions/:id/import/catalog
///
/// Fetches the catalog outside the session lock, then installs it. Any previous
/// selection or result is discarded.
pub async fn handle_load_catalog(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<LoadCatalogRequest>,
) -> Result<Json<ImportStatus>, AppError> {
    let username = validate_username(&request.username)?.to_string();

    // fail fast for unknown sessions before touching the upstream
    state.sessions.with_session(id, |_| Ok(())).await?;

    let repos = state
        .catalog
        .list_repositories(&username, state.catalog_limit)
        .await?;

    state
        .sessions
        .with_session(id, |session| {
            session.import.load_catalog(&username, repos)?;
            Ok(session.import.status())
        })
        .await
        .map(Json)
}

/// POST /api/v1/sessions/:id/import/selection
pub async fn handle_toggle_selection(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<ToggleRequest>,
) -> Result<Json<ToggleResponse>, AppError> {
    state
        .sessions
        .with_session(id, |session| {
            let selected = session.import.toggle(&request.name)?;
            Ok(ToggleResponse {
                selection: session.import.status().selected,
                name: request.name,
                selected,
            })
        })
        .await
        .map(Json)
}

/// GET /api/v1/sessions/:id/import
pub async fn handle_import_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ImportStatus>, AppError> {
    state
        .sessions
        .with_session(id, |session| Ok(session.import.status()))
        .await
        .map(Json)
}

/// POST /api/v1/sessions/:id/import/analyze
///
/// Takes the analysis ticket under the session lock, runs both calls with the
/// lock released, then records the outcome. The run and the recording happen in
/// a detached task, so the session leaves `Analyzing` even if the client goes
/// away before the response is ready.
pub async fn handle_analyze(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ImportResult>, AppError> {
    let ticket = state
        .sessions
        .with_session(id, |session| session.import.begin_analysis())
        .await?;

    let settle = tokio::spawn(async move {
        let outcome = state.orchestrator.analyze(ticket).await;
        state
            .sessions
            .with_session(id, |session| session.import.finish_analysis(outcome))
            .await
    });

    let result = settle
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("analysis task failed: {e}")))??;

    info!(
        "Session {id} imported {} repositories for {}",
        result.repos.len(),
        result.username
    );
    Ok(Json(result))
}
