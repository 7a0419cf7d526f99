//! Import session state machine.
//!
//! Idle → AwaitingSelection → Analyzing → Complete
//!                 ↑________________|  (on failure)
//!
//! `Analyzing` is only entered through `begin_analysis`, which hands out the one
//! `AnalysisTicket` for the attempt; `finish_analysis` consumes the outcome and
//! leaves the session in a stable state again.

use serde::Serialize;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::import::selection::SelectionSet;
use crate::import::AnalysisFailure;
use crate::models::analysis::ImportResult;
use crate::models::repository::RepositorySnapshot;

/// Catalog loaded for a username, plus the selection made against it.
#[derive(Debug, Clone)]
struct CatalogStage {
    username: String,
    repos: Vec<RepositorySnapshot>,
    selection: SelectionSet,
}

#[derive(Debug, Clone, Default)]
enum ImportState {
    #[default]
    Idle,
    AwaitingSelection(CatalogStage),
    Analyzing(CatalogStage),
    Complete(ImportResult),
}

/// Everything the joined analysis needs. Only `begin_analysis` creates one.
#[derive(Debug)]
pub struct AnalysisTicket {
    pub(crate) username: String,
    pub(crate) selected: Vec<RepositorySnapshot>,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ImportStage {
    Idle,
    AwaitingSelection,
    Analyzing,
    Complete,
}

/// Serializable view of the session for clients.
#[derive(Debug, Clone, Serialize)]
pub struct ImportStatus {
    pub stage: ImportStage,
    pub username: Option<String>,
    pub repos: Vec<RepositorySnapshot>,
    pub selected: Vec<String>,
    pub result: Option<ImportResult>,
}

#[derive(Debug, Default)]
pub struct ImportSession {
    state: ImportState,
}

impl ImportSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(&self) -> ImportStage {
        match self.state {
            ImportState::Idle => ImportStage::Idle,
            ImportState::AwaitingSelection(_) => ImportStage::AwaitingSelection,
            ImportState::Analyzing(_) => ImportStage::Analyzing,
            ImportState::Complete(_) => ImportStage::Complete,
        }
    }

    /// The finished import, if the last analysis succeeded.
    pub fn import_result(&self) -> Option<&ImportResult> {
        match &self.state {
            ImportState::Complete(result) => Some(result),
            _ => None,
        }
    }

    /// Installs a freshly fetched catalog. Starts a new import from any stable
    /// state; the selection always starts empty.
    pub fn load_catalog(
        &mut self,
        username: &str,
        repos: Vec<RepositorySnapshot>,
    ) -> Result<(), AppError> {
        if matches!(self.state, ImportState::Analyzing(_)) {
            return Err(AppError::InvalidState(
                "cannot replace the catalog while analysis is running".to_string(),
            ));
        }
        info!("Catalog loaded for {username}: {} repositories", repos.len());
        self.state = ImportState::AwaitingSelection(CatalogStage {
            username: username.to_string(),
            selection: SelectionSet::for_catalog(&repos),
            repos,
        });
        Ok(())
    }

    /// Flips one repository in the selection. Returns whether it is now selected.
    pub fn toggle(&mut self, name: &str) -> Result<bool, AppError> {
        match &mut self.state {
            ImportState::AwaitingSelection(stage) => Ok(stage.selection.toggle(name)?),
            _ => Err(AppError::InvalidState(
                "repositories can only be selected after a catalog is loaded".to_string(),
            )),
        }
    }

    /// Moves AwaitingSelection → Analyzing and returns the ticket for this attempt.
    /// An empty selection fails with `EmptySelection` and leaves the state alone.
    pub fn begin_analysis(&mut self) -> Result<AnalysisTicket, AppError> {
        let stage = match std::mem::take(&mut self.state) {
            ImportState::AwaitingSelection(stage) => stage,
            other => {
                let message = if matches!(other, ImportState::Analyzing(_)) {
                    "analysis is already running"
                } else {
                    "load a catalog and select repositories before analyzing"
                };
                self.state = other;
                return Err(AppError::InvalidState(message.to_string()));
            }
        };

        if stage.selection.is_empty() {
            self.state = ImportState::AwaitingSelection(stage);
            return Err(AppError::EmptySelection);
        }

        let ticket = AnalysisTicket {
            username: stage.username.clone(),
            selected: stage.selection.pick(&stage.repos),
        };
        info!(
            "Analysis started for {} ({} repositories)",
            ticket.username,
            ticket.selected.len()
        );
        self.state = ImportState::Analyzing(stage);
        Ok(ticket)
    }

    /// Leaves Analyzing: Complete on success, back to AwaitingSelection (selection
    /// intact) on failure.
    pub fn finish_analysis(
        &mut self,
        outcome: Result<ImportResult, AnalysisFailure>,
    ) -> Result<ImportResult, AppError> {
        let stage = match std::mem::take(&mut self.state) {
            ImportState::Analyzing(stage) => stage,
            other => {
                self.state = other;
                return Err(AppError::InvalidState(
                    "no analysis is running".to_string(),
                ));
            }
        };

        match outcome {
            Ok(result) => {
                info!(
                    "Import complete for {}: {} repositories, {} bullets",
                    result.username,
                    result.repos.len(),
                    result.bullets.len()
                );
                self.state = ImportState::Complete(result.clone());
                Ok(result)
            }
            Err(failure) => {
                warn!("Import for {} failed: {failure}", stage.username);
                self.state = ImportState::AwaitingSelection(stage);
                Err(AppError::Analysis(failure))
            }
        }
    }

    pub fn status(&self) -> ImportStatus {
        let (username, repos, selected, result) = match &self.state {
            ImportState::Idle => (None, Vec::new(), Vec::new(), None),
            ImportState::AwaitingSelection(stage) | ImportState::Analyzing(stage) => (
                Some(stage.username.clone()),
                stage.repos.clone(),
                stage.selection.names_in(&stage.repos),
                None,
            ),
            ImportState::Complete(result) => (
                Some(result.username.clone()),
                result.repos.clone(),
                result.repos.iter().map(|r| r.name.clone()).collect(),
                Some(result.clone()),
            ),
        };
        ImportStatus {
            stage: self.stage(),
            username,
            repos,
            selected,
            result,
        }
    }
}
