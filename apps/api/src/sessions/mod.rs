//! Session store: explicit per-user context instead of an ambient "current user".
//!
//! A session is created when a user signs in and cleared on logout. It owns the
//! user's identity and their single import session. Callers only ever learn
//! whether a user is present; no credentials are kept here.

pub mod handlers;

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::import::session::ImportSession;
use crate::models::user::Identity;

#[derive(Debug)]
pub struct UserSession {
    pub identity: Identity,
    pub import: ImportSession,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<Mutex<HashMap<Uuid, UserSession>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a session for `identity`. At least a username or a name is required.
    pub async fn create(&self, identity: Identity) -> Result<Uuid, AppError> {
        if identity.display_name().is_none() {
            return Err(AppError::Validation(
                "a username or name is required to start a session".to_string(),
            ));
        }
        let id = Uuid::new_v4();
        self.sessions.lock().await.insert(
            id,
            UserSession {
                identity,
                import: ImportSession::new(),
                created_at: Utc::now(),
            },
        );
        info!("Session {id} started");
        Ok(id)
    }

    /// Ends the session. Returns whether one existed.
    pub async fn clear(&self, id: Uuid) -> bool {
        let removed = self.sessions.lock().await.remove(&id).is_some();
        if removed {
            info!("Session {id} cleared");
        }
        removed
    }

    /// Runs `f` against the session under the store lock. Unknown ids mean no
    /// user is present. `f` is synchronous so the lock never spans an await.
    pub async fn with_session<R>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut UserSession) -> Result<R, AppError>,
    ) -> Result<R, AppError> {
        let mut sessions = self.sessions.lock().await;
        let session = sessions.get_mut(&id).ok_or(AppError::Unauthorized)?;
        f(session)
    }
}
