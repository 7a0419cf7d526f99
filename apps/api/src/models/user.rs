use serde::{Deserialize, Serialize};

/// The signed-in user, passed explicitly into the import session and the
/// document assemblers. Token contents never reach this type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Identity {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl Identity {
    pub fn username(&self) -> Option<&str> {
        non_blank(self.username.as_deref())
    }

    /// Display name, falling back to the username.
    pub fn display_name(&self) -> Option<&str> {
        non_blank(self.name.as_deref()).or_else(|| self.username())
    }

    pub fn email(&self) -> &str {
        non_blank(self.email.as_deref()).unwrap_or_default()
    }

    pub fn github_url(&self) -> Option<String> {
        self.username().map(|u| format!("https://github.com/{u}"))
    }
}

/// Public GitHub account details, as returned by the catalog upstream.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GitHubProfile {
    pub login: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub blog: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    pub html_url: String,
    #[serde(default)]
    pub public_repos: u64,
    #[serde(default)]
    pub followers: u64,
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
