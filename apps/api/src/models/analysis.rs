use serde::{Deserialize, Serialize};

use crate::models::repository::RepositorySnapshot;

/// Display limit for a bullet's achievement text. The model keeps the full text;
/// renderers cut it here.
pub const BULLET_DISPLAY_CHARS: usize = 200;

/// Per-repository skill extraction output. Matched to its repository by position.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct SkillRecord {
    #[serde(default)]
    pub repo: String,
    /// Languages and concepts.
    #[serde(default)]
    pub skills: Vec<String>,
    /// Frameworks and platforms.
    #[serde(default)]
    pub tools: Vec<String>,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub methods: Vec<String>,
    #[serde(default)]
    pub outcomes: Vec<String>,
    #[serde(default)]
    pub evidence: Vec<String>,
}

/// A STAR-format resume bullet produced by the bullet generation service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Bullet {
    #[serde(default)]
    pub project: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub tool: String,
    #[serde(default)]
    pub result: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Bullet {
    /// Text cut to `BULLET_DISPLAY_CHARS` characters.
    pub fn display_text(&self) -> &str {
        match self.text.char_indices().nth(BULLET_DISPLAY_CHARS) {
            Some((idx, _)) => &self.text[..idx],
            None => &self.text,
        }
    }

    pub fn exceeds_display_limit(&self) -> bool {
        self.text.chars().count() > BULLET_DISPLAY_CHARS
    }
}

/// Merged output of one import session. Only ever built from a fully
/// successful analysis; the sole input to the document assemblers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImportResult {
    pub repos: Vec<RepositorySnapshot>,
    /// One per entry in `repos`, same order.
    pub skills: Vec<SkillRecord>,
    pub bullets: Vec<Bullet>,
    pub username: String,
}
