use std::sync::Arc;

use crate::catalog::RepositoryCatalog;
use crate::import::ImportOrchestrator;
use crate::render::DocumentRenderer;
use crate::sessions::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Repository catalog. Default: GitHubCatalogClient with a per-user cache.
    pub catalog: Arc<dyn RepositoryCatalog>,
    pub orchestrator: ImportOrchestrator,
    /// Downstream PDF/JSON/share/site services.
    pub renderer: Arc<dyn DocumentRenderer>,
    pub sessions: SessionStore,
    /// Catalog cap for import sessions (CATALOG_LIMIT).
    pub catalog_limit: usize,
}
