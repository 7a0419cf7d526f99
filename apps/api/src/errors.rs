use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::catalog::CatalogError;
use crate::import::selection::SelectionError;
use crate::import::AnalysisFailure;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Analysis failed: {0}")]
    Analysis(AnalysisFailure),

    #[error("Select at least one repository before analyzing")]
    EmptySelection,

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Render error: {0}")]
    Render(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::Validation(msg) => AppError::Validation(msg),
            CatalogError::NotFound(username) => {
                AppError::NotFound(format!("GitHub user '{username}' not found"))
            }
            other => AppError::Upstream(other.to_string()),
        }
    }
}

impl From<SelectionError> for AppError {
    fn from(err: SelectionError) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<AnalysisFailure> for AppError {
    fn from(failure: AnalysisFailure) -> Self {
        AppError::Analysis(failure)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Upstream(msg) => {
                tracing::error!("Upstream error: {msg}");
                (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR", msg.clone())
            }
            AppError::Analysis(failure) => {
                tracing::error!("Analysis error: {failure}");
                (StatusCode::BAD_GATEWAY, "ANALYSIS_ERROR", failure.to_string())
            }
            AppError::EmptySelection => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "EMPTY_SELECTION",
                self.to_string(),
            ),
            AppError::InvalidState(msg) => (StatusCode::CONFLICT, "INVALID_STATE", msg.clone()),
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "No signed-in user for this session".to_string(),
            ),
            AppError::Render(msg) => {
                tracing::error!("Render error: {msg}");
                (StatusCode::BAD_GATEWAY, "RENDER_ERROR", msg.clone())
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let mut error = json!({
            "code": code,
            "message": message
        });
        if let AppError::Analysis(failure) = &self {
            error["side"] = json!(failure.side);
        }

        (status, Json(json!({ "error": error }))).into_response()
    }
}
