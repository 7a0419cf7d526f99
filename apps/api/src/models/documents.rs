use serde::{Deserialize, Serialize};

use crate::models::analysis::Bullet;

/// Editable profile header shared by the resume. Every field is free-form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Profile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub github_url: String,
    #[serde(default)]
    pub linkedin_url: String,
    #[serde(default)]
    pub summary: String,
}

/// Renderer-ready resume document. Handed to the PDF/JSON/share services verbatim.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ResumeModel {
    pub profile: Profile,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub bullets: Vec<Bullet>,
}

/// Portfolio project card, one per selected repository.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Project {
    pub name: String,
    pub description: Option<String>,
    pub technologies: Vec<String>,
    pub github_url: String,
    pub stars: u64,
    pub forks: u64,
}

/// Renderer-ready portfolio site document. Handed to the site generator verbatim.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct PortfolioModel {
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub github_url: String,
    #[serde(default)]
    pub linkedin_url: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub bullets: Vec<Bullet>,
}
