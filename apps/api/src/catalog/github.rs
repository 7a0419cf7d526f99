use std::collections::HashMap;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::{header, Client, RequestBuilder, Response};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::catalog::cache::CatalogCache;
use crate::catalog::{validate_username, CatalogError, RepositoryCatalog, MAX_CATALOG_LIMIT};
use crate::models::repository::RepositorySnapshot;
use crate::models::user::GitHubProfile;

const USER_AGENT: &str = concat!("devprofile-api/", env!("CARGO_PKG_VERSION"));
const JSON_MEDIA_TYPE: &str = "application/vnd.github+json";
const RAW_MEDIA_TYPE: &str = "application/vnd.github.raw+json";
/// Page size requested upstream; ranking by stars happens locally.
const PAGE_SIZE: usize = 100;
const MAX_ATTEMPTS: u32 = 3;
/// README text attached to a snapshot is cut to this many characters.
pub const README_MAX_CHARS: usize = 2000;

#[derive(Debug, Deserialize)]
struct GitHubRepo {
    name: String,
    full_name: String,
    description: Option<String>,
    #[serde(default)]
    stargazers_count: u64,
    #[serde(default)]
    forks_count: u64,
    html_url: String,
    owner: GitHubOwner,
}

#[derive(Debug, Deserialize)]
struct GitHubOwner {
    login: String,
}

#[derive(Debug, Deserialize)]
struct GitHubErrorBody {
    message: String,
}

/// GitHub REST client for the repository catalog.
/// Retries 429 and 5xx with exponential backoff; caches results per user.
pub struct GitHubCatalogClient {
    client: Client,
    base_url: String,
    token: Option<String>,
    retry_base_delay: Duration,
    cache: CatalogCache,
}

impl GitHubCatalogClient {
    pub fn new(
        base_url: impl Into<String>,
        token: Option<String>,
        cache_ttl: Duration,
    ) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to build GitHub HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
            retry_base_delay: Duration::from_secs(1),
            cache: CatalogCache::new(cache_ttl),
        })
    }

    #[cfg(test)]
    pub fn with_retry_base_delay(mut self, delay: Duration) -> Self {
        self.retry_base_delay = delay;
        self
    }

    fn get(&self, url: &str, accept: &str) -> RequestBuilder {
        let request = self
            .client
            .get(url)
            .header(header::ACCEPT, accept)
            .header("X-GitHub-Api-Version", "2022-11-28");
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Sends a GET, retrying transport errors, 429 and 5xx. Any other status is
    /// returned to the caller as-is.
    async fn send_with_retry(&self, url: &str, accept: &str) -> Result<Response, CatalogError> {
        let mut last_error: Option<CatalogError> = None;

        for attempt in 0..MAX_ATTEMPTS {
            if attempt > 0 {
                let delay = self.retry_base_delay * (1 << (attempt - 1));
                warn!(
                    "GitHub request attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = match self.get(url, accept).send().await {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(CatalogError::Upstream {
                        status: None,
                        message: e.to_string(),
                    });
                    continue;
                }
            };

            let status = response.status();
            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("GitHub API returned {}: {}", status, body);
                last_error = Some(CatalogError::Upstream {
                    status: Some(status.as_u16()),
                    message: upstream_message(body),
                });
                continue;
            }

            return Ok(response);
        }

        Err(last_error.unwrap_or(CatalogError::Upstream {
            status: None,
            message: format!("gave up after {MAX_ATTEMPTS} attempts"),
        }))
    }

    async fn fetch_repos(&self, username: &str) -> Result<Vec<GitHubRepo>, CatalogError> {
        let url = format!(
            "{}/users/{}/repos?per_page={}&sort=full_name",
            self.base_url, username, PAGE_SIZE
        );
        let response = self.send_with_retry(&url, JSON_MEDIA_TYPE).await?;
        let status = response.status();

        if status.as_u16() == 404 {
            return Err(CatalogError::NotFound(username.to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::Upstream {
                status: Some(status.as_u16()),
                message: upstream_message(body),
            });
        }

        response.json().await.map_err(|e| CatalogError::Upstream {
            status: Some(status.as_u16()),
            message: format!("invalid repository listing: {e}"),
        })
    }

    async fn fetch_profile(&self, username: &str) -> Result<GitHubProfile, CatalogError> {
        let url = format!("{}/users/{}", self.base_url, username);
        let response = self.send_with_retry(&url, JSON_MEDIA_TYPE).await?;
        let status = response.status();

        if status.as_u16() == 404 {
            return Err(CatalogError::NotFound(username.to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::Upstream {
                status: Some(status.as_u16()),
                message: upstream_message(body),
            });
        }

        response.json().await.map_err(|e| CatalogError::Upstream {
            status: Some(status.as_u16()),
            message: format!("invalid user profile: {e}"),
        })
    }

    /// Language tags ordered by byte count. Best-effort: failures yield no tags.
    async fn fetch_languages(&self, owner: &str, repo: &str) -> Vec<String> {
        let url = format!("{}/repos/{}/{}/languages", self.base_url, owner, repo);
        let result = async {
            let response = self.send_with_retry(&url, JSON_MEDIA_TYPE).await.ok()?;
            if !response.status().is_success() {
                return None;
            }
            response.json::<HashMap<String, u64>>().await.ok()
        }
        .await;

        match result {
            Some(bytes_by_language) => rank_languages(bytes_by_language),
            None => {
                warn!("Could not fetch languages for {owner}/{repo}");
                Vec::new()
            }
        }
    }

    /// Raw README text, truncated. Best-effort: absent READMEs and failures yield `None`.
    async fn fetch_readme(&self, owner: &str, repo: &str) -> Option<String> {
        let url = format!("{}/repos/{}/{}/readme", self.base_url, owner, repo);
        let response = match self.send_with_retry(&url, RAW_MEDIA_TYPE).await {
            Ok(response) => response,
            Err(e) => {
                warn!("Could not fetch README for {owner}/{repo}: {e}");
                return None;
            }
        };
        match response.status().as_u16() {
            200 => {}
            404 => return None,
            other => {
                warn!("README fetch for {owner}/{repo} returned {other}");
                return None;
            }
        }
        let text = response.text().await.ok()?;
        Some(truncate_chars(&text, README_MAX_CHARS).to_string())
    }
}

#[async_trait]
impl RepositoryCatalog for GitHubCatalogClient {
    async fn list_repositories(
        &self,
        username: &str,
        limit: usize,
    ) -> Result<Vec<RepositorySnapshot>, CatalogError> {
        let username = validate_username(username)?;
        let limit = limit.clamp(1, MAX_CATALOG_LIMIT);

        if let Some(cached) = self.cache.get(username, limit).await {
            debug!("Catalog cache hit for {username} (limit {limit})");
            return Ok(cached);
        }

        let repos = rank_by_stars(self.fetch_repos(username).await?, limit);

        let mut snapshots = Vec::with_capacity(repos.len());
        for repo in repos {
            let languages = self.fetch_languages(&repo.owner.login, &repo.name).await;
            let readme = self.fetch_readme(&repo.owner.login, &repo.name).await;
            snapshots.push(RepositorySnapshot {
                name: repo.name,
                full_name: repo.full_name,
                description: repo.description,
                languages,
                stars: repo.stargazers_count,
                forks: repo.forks_count,
                html_url: repo.html_url,
                readme,
            });
        }

        info!("Fetched {} repositories for {}", snapshots.len(), username);
        self.cache.put(username, limit, snapshots.clone()).await;
        Ok(snapshots)
    }

    async fn user_profile(&self, username: &str) -> Result<GitHubProfile, CatalogError> {
        let username = validate_username(username)?;

        if let Some(cached) = self.cache.get_profile(username).await {
            debug!("Profile cache hit for {username}");
            return Ok(cached);
        }

        let profile = self.fetch_profile(username).await?;
        info!("Fetched GitHub profile for {username}");
        self.cache.put_profile(username, profile.clone()).await;
        Ok(profile)
    }

    async fn invalidate(&self, username: &str) {
        self.cache.invalidate(username.trim()).await;
    }
}

/// Most-starred first. The sort is stable so ties keep upstream order.
fn rank_by_stars(mut repos: Vec<GitHubRepo>, limit: usize) -> Vec<GitHubRepo> {
    repos.sort_by(|a, b| b.stargazers_count.cmp(&a.stargazers_count));
    repos.truncate(limit);
    repos
}

fn rank_languages(bytes_by_language: HashMap<String, u64>) -> Vec<String> {
    let mut ranked: Vec<_> = bytes_by_language.into_iter().collect();
    ranked.sort_by(|(a_name, a_bytes), (b_name, b_bytes)| {
        b_bytes.cmp(a_bytes).then_with(|| a_name.cmp(b_name))
    });
    ranked.into_iter().map(|(name, _)| name).collect()
}

fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

fn upstream_message(body: String) -> String {
    serde_json::from_str::<GitHubErrorBody>(&body)
        .map(|e| e.message)
        .unwrap_or(body)
}
