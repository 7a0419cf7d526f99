use crate::assembly::expertise_sentence;
use crate::assembly::skills::aggregate_skills;
use crate::models::analysis::ImportResult;
use crate::models::documents::{PortfolioModel, Project};
use crate::models::repository::RepositorySnapshot;
use crate::models::user::Identity;

const DEFAULT_NAME: &str = "Developer";
const DEFAULT_SUMMARY: &str = "Passionate developer building modern web applications.";

/// Builds the portfolio model. Projects come one-to-one from the selected
/// repositories and are not filtered by skills or bullets.
pub fn assemble_portfolio(identity: &Identity, import: Option<&ImportResult>) -> PortfolioModel {
    let skills = import
        .map(|result| aggregate_skills(&result.skills))
        .unwrap_or_default();

    let summary = expertise_sentence(&skills).unwrap_or_else(|| DEFAULT_SUMMARY.to_string());

    let github_url = identity
        .github_url()
        .or_else(|| import.map(|result| format!("https://github.com/{}", result.username)))
        .unwrap_or_default();

    let (projects, bullets) = match import {
        Some(result) => (
            result.repos.iter().map(project_card).collect(),
            result.bullets.clone(),
        ),
        None => (Vec::new(), Vec::new()),
    };

    PortfolioModel {
        name: identity.display_name().unwrap_or(DEFAULT_NAME).to_string(),
        email: identity.email().to_string(),
        github_url,
        linkedin_url: String::new(),
        summary,
        skills,
        projects,
        bullets,
    }
}

fn project_card(repo: &RepositorySnapshot) -> Project {
    Project {
        name: repo.name.clone(),
        description: repo.description.clone(),
        technologies: repo.languages.clone(),
        github_url: repo.html_url.clone(),
        stars: repo.stars,
        forks: repo.forks,
    }
}
