use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::catalog::{DEFAULT_CATALOG_LIMIT, MAX_CATALOG_LIMIT};
use crate::import::orchestrator::DEFAULT_ANALYSIS_TIMEOUT;

const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub analysis_service_url: String,
    pub render_service_url: String,
    pub github_api_url: String,
    pub github_token: Option<String>,
    pub catalog_limit: usize,
    pub catalog_cache_ttl: Duration,
    pub analysis_timeout: Duration,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let analysis_service_url = require_env("ANALYSIS_SERVICE_URL")?;
        let catalog_limit = parse_env("CATALOG_LIMIT", DEFAULT_CATALOG_LIMIT)?;
        if !(1..=MAX_CATALOG_LIMIT).contains(&catalog_limit) {
            bail!("CATALOG_LIMIT must be between 1 and {MAX_CATALOG_LIMIT}");
        }

        Ok(Config {
            render_service_url: optional_env("RENDER_SERVICE_URL")
                .unwrap_or_else(|| analysis_service_url.clone()),
            analysis_service_url,
            github_api_url: optional_env("GITHUB_API_URL")
                .unwrap_or_else(|| DEFAULT_GITHUB_API_URL.to_string()),
            github_token: optional_env("GITHUB_TOKEN"),
            catalog_limit,
            catalog_cache_ttl: Duration::from_secs(parse_env("CATALOG_CACHE_TTL_SECS", 3600)?),
            analysis_timeout: Duration::from_secs(parse_env(
                "ANALYSIS_TIMEOUT_SECS",
                DEFAULT_ANALYSIS_TIMEOUT.as_secs(),
            )?),
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    optional_env(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid {}", std::any::type_name::<T>())),
        None => Ok(default),
    }
}
