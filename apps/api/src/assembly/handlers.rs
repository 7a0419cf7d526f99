//! Axum route handlers that assemble documents from the session's import.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::assembly::portfolio::assemble_portfolio;
use crate::assembly::resume::{assemble_resume, group_bullets_by_project};
use crate::errors::AppError;
use crate::models::documents::{PortfolioModel, ResumeModel};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct BulletView {
    pub text: String,
    pub truncated: bool,
    pub tags: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct BulletGroupView {
    pub project: String,
    pub bullets: Vec<BulletView>,
}

/// GET /api/v1/sessions/:id/resume
pub async fn handle_get_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ResumeModel>, AppError> {
    state
        .sessions
        .with_session(id, |session| {
            Ok(assemble_resume(
                &session.identity,
                session.import.import_result(),
            ))
        })
        .await
        .map(Json)
}

/// GET /api/v1/sessions/:id/resume/groups
///
/// Bullets grouped by project, with display-length text.
pub async fn handle_get_resume_groups(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<BulletGroupView>>, AppError> {
    state
        .sessions
        .with_session(id, |session| {
            let bullets = session
                .import
                .import_result()
                .map(|result| result.bullets.as_slice())
                .unwrap_or_default();
            let groups: Vec<BulletGroupView> = group_bullets_by_project(bullets)
                .into_iter()
                .map(|group| BulletGroupView {
                    project: group.project.to_string(),
                    bullets: group
                        .bullets
                        .into_iter()
                        .map(|bullet| BulletView {
                            text: bullet.display_text().to_string(),
                            truncated: bullet.exceeds_display_limit(),
                            tags: bullet.tags.clone(),
                        })
                        .collect(),
                })
                .collect();
            Ok(groups)
        })
        .await
        .map(Json)
}

/// GET /api/v1/sessions/:id/portfolio
pub async fn handle_get_portfolio(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PortfolioModel>, AppError> {
    state
        .sessions
        .with_session(id, |session| {
            Ok(assemble_portfolio(
                &session.identity,
                session.import.import_result(),
            ))
        })
        .await
        .map(Json)
}
