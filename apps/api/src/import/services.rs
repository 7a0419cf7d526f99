//! Clients for the two external analysis services.
//!
//! Both services are black boxes reached over HTTP. The orchestrator only sees
//! the `SkillExtractor` and `BulletGenerator` traits, so tests swap in fakes.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::models::analysis::{Bullet, SkillRecord};
use crate::models::repository::RepositorySnapshot;

const EXTRACT_SKILLS_PATH: &str = "/api/ai/extract-skills";
const GENERATE_BULLETS_PATH: &str = "/api/ai/generate-bullets";

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("service error (status {status}): {message}")]
    Api { status: u16, message: String },
}

impl ServiceError {
    /// The message to surface to the user: the upstream detail if there was one.
    pub fn upstream_message(&self) -> String {
        match self {
            ServiceError::Api { message, .. } if !message.is_empty() => message.clone(),
            other => other.to_string(),
        }
    }
}

/// Context sent alongside the projects to bullet generation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BulletContext {
    pub username: String,
}

#[async_trait]
pub trait SkillExtractor: Send + Sync {
    /// One record per input repository, same order.
    async fn extract_skills(
        &self,
        repos: &[RepositorySnapshot],
    ) -> Result<Vec<SkillRecord>, ServiceError>;
}

#[async_trait]
pub trait BulletGenerator: Send + Sync {
    /// Any number of bullets, in no particular relation to the input order.
    async fn generate_bullets(
        &self,
        projects: &[RepositorySnapshot],
        context: &BulletContext,
    ) -> Result<Vec<Bullet>, ServiceError>;
}

#[derive(Serialize)]
struct ExtractSkillsRequest<'a> {
    repos: &'a [RepositorySnapshot],
}

#[derive(Serialize)]
struct GenerateBulletsRequest<'a> {
    projects: &'a [RepositorySnapshot],
    context: &'a BulletContext,
}

#[derive(Deserialize)]
struct GenerateBulletsResponse {
    #[serde(default)]
    bullets: Vec<Bullet>,
}

#[derive(Deserialize)]
struct ErrorDetail {
    detail: String,
}

/// HTTP client for the skill-extraction and bullet-generation endpoints.
#[derive(Clone)]
pub struct AnalysisClient {
    client: Client,
    base_url: String,
}

impl AnalysisClient {
    pub fn new(base_url: impl Into<String>) -> anyhow::Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .context("Failed to build analysis HTTP client")?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    async fn post<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<Response, ServiceError> {
        let response = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ServiceError::Api {
                status: status.as_u16(),
                message: detail_message(body),
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl SkillExtractor for AnalysisClient {
    async fn extract_skills(
        &self,
        repos: &[RepositorySnapshot],
    ) -> Result<Vec<SkillRecord>, ServiceError> {
        let records: Vec<SkillRecord> = self
            .post(EXTRACT_SKILLS_PATH, &ExtractSkillsRequest { repos })
            .await?
            .json()
            .await?;
        debug!("Skill extraction returned {} records", records.len());
        Ok(records)
    }
}

#[async_trait]
impl BulletGenerator for AnalysisClient {
    async fn generate_bullets(
        &self,
        projects: &[RepositorySnapshot],
        context: &BulletContext,
    ) -> Result<Vec<Bullet>, ServiceError> {
        let response: GenerateBulletsResponse = self
            .post(
                GENERATE_BULLETS_PATH,
                &GenerateBulletsRequest { projects, context },
            )
            .await?
            .json()
            .await?;
        debug!("Bullet generation returned {} bullets", response.bullets.len());
        Ok(response.bullets)
    }
}

/// Pulls `detail` out of a FastAPI-style error body, falling back to the raw body.
pub(crate) fn detail_message(body: String) -> String {
    serde_json::from_str::<ErrorDetail>(&body)
        .map(|e| e.detail)
        .unwrap_or(body)
}
