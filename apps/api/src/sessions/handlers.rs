//! Axum route handlers for sign-in and sign-out.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::user::Identity;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session_id: Uuid,
    pub identity: Identity,
    pub created_at: DateTime<Utc>,
}

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
    Json(identity): Json<Identity>,
) -> Result<(StatusCode, Json<SessionResponse>), AppError> {
    let session_id = state.sessions.create(identity).await?;
    let session = describe(&state, session_id).await?;
    Ok((StatusCode::CREATED, Json(session)))
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, AppError> {
    Ok(Json(describe(&state, id).await?))
}

/// DELETE /api/v1/sessions/:id
pub async fn handle_clear_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.sessions.clear(id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Unauthorized)
    }
}

async fn describe(state: &AppState, id: Uuid) -> Result<SessionResponse, AppError> {
    state
        .sessions
        .with_session(id, |session| {
            Ok(SessionResponse {
                session_id: id,
                identity: session.identity.clone(),
                created_at: session.created_at,
            })
        })
        .await
}
