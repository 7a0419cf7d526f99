//! Import pipeline: catalog selection, joined skill/bullet analysis, and the
//! session state machine that ties them together.
//!
//! Flow: load catalog → toggle selection → begin analysis (ticket) →
//!       skill extraction ∥ bullet generation → merge → ImportResult.

pub mod handlers;
pub mod orchestrator;
pub mod selection;
pub mod services;
pub mod session;

use std::fmt;

use serde::Serialize;

pub use orchestrator::ImportOrchestrator;

/// Which of the two joined analysis calls failed.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisSide {
    SkillExtraction,
    BulletGeneration,
}

impl fmt::Display for AnalysisSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisSide::SkillExtraction => write!(f, "skill extraction"),
            AnalysisSide::BulletGeneration => write!(f, "bullet generation"),
        }
    }
}

/// Failure of the joined analysis step. Carries the upstream message when one was given.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisFailure {
    pub side: Option<AnalysisSide>,
    pub message: String,
}

impl AnalysisFailure {
    pub fn new(side: Option<AnalysisSide>, message: impl Into<String>) -> Self {
        Self {
            side,
            message: message.into(),
        }
    }
}

impl fmt::Display for AnalysisFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.side {
            Some(side) => write!(f, "{side} failed: {}", self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for AnalysisFailure {}
