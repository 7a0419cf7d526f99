//! Render hand-off: passes assembled models verbatim to the external PDF, JSON,
//! share-link and site-bundle services. What those services do is their business.

pub mod handlers;

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::errors::AppError;
use crate::import::services::detail_message;
use crate::models::documents::{PortfolioModel, ResumeModel};

const RESUME_PDF_PATH: &str = "/api/resume/pdf";
const RESUME_JSON_PATH: &str = "/api/resume/json";
const RESUME_SHARE_PATH: &str = "/api/resume/share";
const PORTFOLIO_PATH: &str = "/api/portfolio/generate";

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("renderer returned {status}: {message}")]
    Api { status: u16, message: String },
}

impl From<RenderError> for AppError {
    fn from(err: RenderError) -> Self {
        AppError::Render(err.to_string())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShareLink {
    pub url: String,
}

#[async_trait]
pub trait DocumentRenderer: Send + Sync {
    async fn resume_pdf(&self, resume: &ResumeModel) -> Result<Bytes, RenderError>;
    async fn resume_json(&self, resume: &ResumeModel) -> Result<serde_json::Value, RenderError>;
    async fn share_resume(&self, resume: &ResumeModel) -> Result<ShareLink, RenderError>;
    async fn portfolio_bundle(&self, portfolio: &PortfolioModel) -> Result<Bytes, RenderError>;
}

#[derive(Serialize)]
struct PortfolioRequest<'a> {
    profile: &'a PortfolioModel,
}

#[derive(Clone)]
pub struct RenderClient {
    client: Client,
    base_url: String,
}

impl RenderClient {
    pub fn new(base_url: impl Into<String>) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .context("Failed to build render HTTP client")?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    async fn post<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<Response, RenderError> {
        let response = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .json(body)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RenderError::Api {
                status: status.as_u16(),
                message: detail_message(body),
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl DocumentRenderer for RenderClient {
    async fn resume_pdf(&self, resume: &ResumeModel) -> Result<Bytes, RenderError> {
        let pdf = self.post(RESUME_PDF_PATH, resume).await?.bytes().await?;
        info!("Rendered resume PDF ({} bytes)", pdf.len());
        Ok(pdf)
    }

    async fn resume_json(&self, resume: &ResumeModel) -> Result<serde_json::Value, RenderError> {
        Ok(self.post(RESUME_JSON_PATH, resume).await?.json().await?)
    }

    async fn share_resume(&self, resume: &ResumeModel) -> Result<ShareLink, RenderError> {
        let link: ShareLink = self.post(RESUME_SHARE_PATH, resume).await?.json().await?;
        info!("Created share link {}", link.url);
        Ok(link)
    }

    async fn portfolio_bundle(&self, portfolio: &PortfolioModel) -> Result<Bytes, RenderError> {
        let bundle = self
            .post(PORTFOLIO_PATH, &PortfolioRequest { profile: portfolio })
            .await?
            .bytes()
            .await?;
        info!("Generated portfolio bundle ({} bytes)", bundle.len());
        Ok(bundle)
    }
}

/// `"Mona Lisa"` + `"resume.pdf"` → `"Mona_Lisa_resume.pdf"`.
pub fn download_filename(name: &str, suffix: &str) -> String {
    let stem = name
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_");
    if stem.is_empty() {
        suffix.to_string()
    } else {
        format!("{stem}_{suffix}")
    }
}
