//! Analysis Orchestrator: runs skill extraction and bullet generation as one
//! joined unit and merges their outputs into an `ImportResult`.
//!
//! Both calls get the same selected-snapshot payload, run concurrently, and are
//! individually bounded by a timeout. The first failure wins and cancels the
//! other call; no partial result ever leaves this module.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::import::services::{BulletContext, BulletGenerator, ServiceError, SkillExtractor};
use crate::import::session::AnalysisTicket;
use crate::import::{AnalysisFailure, AnalysisSide};
use crate::models::analysis::ImportResult;

/// Default bound for each analysis call.
pub const DEFAULT_ANALYSIS_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Clone)]
pub struct ImportOrchestrator {
    skills: Arc<dyn SkillExtractor>,
    bullets: Arc<dyn BulletGenerator>,
    timeout: Duration,
}

impl ImportOrchestrator {
    pub fn new(
        skills: Arc<dyn SkillExtractor>,
        bullets: Arc<dyn BulletGenerator>,
        timeout: Duration,
    ) -> Self {
        Self {
            skills,
            bullets,
            timeout,
        }
    }

    /// Runs both analysis calls for the ticket's selection and merges them.
    pub async fn analyze(&self, ticket: AnalysisTicket) -> Result<ImportResult, AnalysisFailure> {
        let AnalysisTicket { username, selected } = ticket;
        let context = BulletContext {
            username: username.clone(),
        };

        let (skills, bullets) = tokio::try_join!(
            bounded(
                AnalysisSide::SkillExtraction,
                self.timeout,
                self.skills.extract_skills(&selected),
            ),
            bounded(
                AnalysisSide::BulletGeneration,
                self.timeout,
                self.bullets.generate_bullets(&selected, &context),
            ),
        )?;

        if skills.len() != selected.len() {
            return Err(AnalysisFailure::new(
                Some(AnalysisSide::SkillExtraction),
                format!(
                    "expected {} skill records, got {}",
                    selected.len(),
                    skills.len()
                ),
            ));
        }

        info!(
            "Analysis merged for {username}: {} skill records, {} bullets",
            skills.len(),
            bullets.len()
        );

        Ok(ImportResult {
            repos: selected,
            skills,
            bullets,
            username,
        })
    }
}

/// Applies the per-call timeout and tags any failure with its side.
async fn bounded<T>(
    side: AnalysisSide,
    timeout: Duration,
    call: impl Future<Output = Result<T, ServiceError>>,
) -> Result<T, AnalysisFailure> {
    match tokio::time::timeout(timeout, call).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err)) => Err(AnalysisFailure::new(Some(side), err.upstream_message())),
        Err(_) => Err(AnalysisFailure::new(
            Some(side),
            format!("timed out after {}s", timeout.as_secs()),
        )),
    }
}
