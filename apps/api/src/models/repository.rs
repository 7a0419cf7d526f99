use serde::{Deserialize, Serialize};

/// Point-in-time summary of a repository as returned by the catalog.
/// Immutable once built; lives for one import session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RepositorySnapshot {
    /// Unique per owner.
    pub name: String,
    pub full_name: String,
    pub description: Option<String>,
    /// Ordered by byte count upstream. Tags may repeat across snapshots.
    pub languages: Vec<String>,
    pub stars: u64,
    pub forks: u64,
    pub html_url: String,
    /// Truncated README text, fed to skill extraction. Absent if the repo has none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub readme: Option<String>,
}

#[cfg(test)]
pub fn snapshot(name: &str, languages: &[&str]) -> RepositorySnapshot {
    RepositorySnapshot {
        name: name.to_string(),
        full_name: format!("octocat/{name}"),
        description: Some(format!("{name} description")),
        languages: languages.iter().map(|l| l.to_string()).collect(),
        stars: 0,
        forks: 0,
        html_url: format!("https://github.com/octocat/{name}"),
        readme: None,
    }
}
