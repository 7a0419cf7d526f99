//! Axum route handlers for document export. Models arrive from the client
//! (possibly edited) and are passed to the renderers unchanged.

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use serde_json::Value;

use crate::errors::AppError;
use crate::models::documents::{PortfolioModel, ResumeModel};
use crate::render::{download_filename, ShareLink};
use crate::state::AppState;

/// POST /api/v1/export/resume/pdf
pub async fn handle_export_resume_pdf(
    State(state): State<AppState>,
    Json(resume): Json<ResumeModel>,
) -> Result<Response, AppError> {
    let pdf = state.renderer.resume_pdf(&resume).await?;
    Ok(attachment(
        pdf,
        "application/pdf",
        &download_filename(&resume.profile.name, "resume.pdf"),
    ))
}

/// POST /api/v1/export/resume/json
pub async fn handle_export_resume_json(
    State(state): State<AppState>,
    Json(resume): Json<ResumeModel>,
) -> Result<Response, AppError> {
    let document: Value = state.renderer.resume_json(&resume).await?;
    let filename = download_filename(&resume.profile.name, "resume.json");
    Ok((
        [(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{filename}\""),
        )],
        Json(document),
    )
        .into_response())
}

/// POST /api/v1/export/resume/share
pub async fn handle_share_resume(
    State(state): State<AppState>,
    Json(resume): Json<ResumeModel>,
) -> Result<Json<ShareLink>, AppError> {
    Ok(Json(state.renderer.share_resume(&resume).await?))
}

/// POST /api/v1/export/portfolio
pub async fn handle_export_portfolio(
    State(state): State<AppState>,
    Json(portfolio): Json<PortfolioModel>,
) -> Result<Response, AppError> {
    let bundle = state.renderer.portfolio_bundle(&portfolio).await?;
    Ok(attachment(
        bundle,
        "application/zip",
        &download_filename(&portfolio.name, "portfolio.zip"),
    ))
}

fn attachment(body: Bytes, content_type: &'static str, filename: &str) -> Response {
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        body,
    )
        .into_response()
}
