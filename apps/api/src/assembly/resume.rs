use std::collections::HashMap;

use crate::assembly::expertise_sentence;
use crate::assembly::skills::aggregate_skills;
use crate::models::analysis::{Bullet, ImportResult};
use crate::models::documents::{Profile, ResumeModel};
use crate::models::user::Identity;

/// Bucket for bullets that carry no project name.
pub const OTHER_PROJECT: &str = "Other";

const RESUME_SUMMARY_TAIL: &str =
    "Passionate about building scalable applications and contributing to open-source projects.";

/// Builds the resume model. With no import the profile is identity-only and the
/// skill and bullet lists are empty.
pub fn assemble_resume(identity: &Identity, import: Option<&ImportResult>) -> ResumeModel {
    let skills = import
        .map(|result| aggregate_skills(&result.skills))
        .unwrap_or_default();

    let summary = expertise_sentence(&skills)
        .map(|sentence| format!("{sentence} {RESUME_SUMMARY_TAIL}"))
        .unwrap_or_default();

    let github_url = identity
        .github_url()
        .or_else(|| import.map(|result| format!("https://github.com/{}", result.username)))
        .unwrap_or_default();

    ResumeModel {
        profile: Profile {
            name: identity.display_name().unwrap_or_default().to_string(),
            email: identity.email().to_string(),
            github_url,
            summary,
            ..Default::default()
        },
        skills,
        bullets: import
            .map(|result| result.bullets.clone())
            .unwrap_or_default(),
    }
}

/// Bullets that share a project name, in the order they were first seen.
#[derive(Debug, PartialEq)]
pub struct BulletGroup<'a> {
    pub project: &'a str,
    pub bullets: Vec<&'a Bullet>,
}

/// Stable grouping by project name for rendering: one bucket per distinct name in
/// bullet order, items kept in input order. Blank names land in `OTHER_PROJECT`.
pub fn group_bullets_by_project(bullets: &[Bullet]) -> Vec<BulletGroup<'_>> {
    let mut groups: Vec<BulletGroup<'_>> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for bullet in bullets {
        let project = match bullet.project.trim() {
            "" => OTHER_PROJECT,
            name => name,
        };
        let slot = *index.entry(project).or_insert_with(|| {
            groups.push(BulletGroup {
                project,
                bullets: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].bullets.push(bullet);
    }

    groups
}
