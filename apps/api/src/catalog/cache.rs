use std::collections::HashMap;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

use crate::models::repository::RepositorySnapshot;
use crate::models::user::GitHubProfile;

struct CachedCatalog {
    fetched_at: Instant,
    repos: Vec<RepositorySnapshot>,
}

struct CachedProfile {
    fetched_at: Instant,
    profile: GitHubProfile,
}

/// In-memory catalog cache keyed by (lower-cased username, limit), plus one
/// profile per lower-cased username.
pub struct CatalogCache {
    ttl: Duration,
    entries: RwLock<HashMap<(String, usize), CachedCatalog>>,
    profiles: RwLock<HashMap<String, CachedProfile>>,
}

impl CatalogCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
            profiles: RwLock::new(HashMap::new()),
        }
    }

    pub async fn get(&self, username: &str, limit: usize) -> Option<Vec<RepositorySnapshot>> {
        let entries = self.entries.read().await;
        entries
            .get(&(username.to_lowercase(), limit))
            .filter(|cached| cached.fetched_at.elapsed() < self.ttl)
            .map(|cached| cached.repos.clone())
    }

    pub async fn put(&self, username: &str, limit: usize, repos: Vec<RepositorySnapshot>) {
        if self.ttl.is_zero() {
            return;
        }
        let mut entries = self.entries.write().await;
        entries.retain(|_, cached| cached.fetched_at.elapsed() < self.ttl);
        entries.insert(
            (username.to_lowercase(), limit),
            CachedCatalog {
                fetched_at: Instant::now(),
                repos,
            },
        );
    }

    pub async fn get_profile(&self, username: &str) -> Option<GitHubProfile> {
        let profiles = self.profiles.read().await;
        profiles
            .get(&username.to_lowercase())
            .filter(|cached| cached.fetched_at.elapsed() < self.ttl)
            .map(|cached| cached.profile.clone())
    }

    pub async fn put_profile(&self, username: &str, profile: GitHubProfile) {
        if self.ttl.is_zero() {
            return;
        }
        let mut profiles = self.profiles.write().await;
        profiles.retain(|_, cached| cached.fetched_at.elapsed() < self.ttl);
        profiles.insert(
            username.to_lowercase(),
            CachedProfile {
                fetched_at: Instant::now(),
                profile,
            },
        );
    }

    pub async fn invalidate(&self, username: &str) {
        let username = username.to_lowercase();
        self.entries
            .write()
            .await
            .retain(|(user, _), _| *user != username);
        self.profiles.write().await.remove(&username);
    }
}
