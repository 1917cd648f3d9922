// Profile card view model.
// Maps a profile lookup result onto the text a card displays, including placeholders and the rate-limit notice.

use std::fmt;

use crate::config::Config;
use crate::error::ProfileError;
use crate::github::ProfileBundle;

pub const RATE_LIMIT_NOTICE: &str =
    "GitHub API rate limit exceeded. Try again in a few minutes or open the profile directly.";
pub const NO_REPOS: &str = "No public repositories.";
pub const REPOS_FAILED: &str = "Failed to load repos.";
pub const NO_README: &str = "No README found.";

/// Outcome a card is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardStatus {
    Loading,
    Loaded,
    RateLimited,
    Failed,
}

/// One repository row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoLine {
    pub name: String,
    pub url: Option<String>,
    pub stars: u64,
}

impl fmt::Display for RepoLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ⭐ {}", self.name, self.stars)
    }
}

/// Everything a renderer needs to draw one profile card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileView {
    pub username: String,
    pub status: CardStatus,
    pub title: String,
    pub avatar_url: Option<String>,
    pub follow_line: String,
    pub repos: Vec<RepoLine>,
    /// Shown instead of `repos` when there are none.
    pub repos_placeholder: Option<String>,
    pub readme: String,
    /// Direct link offered when the API cannot be used.
    pub profile_url: Option<String>,
}

impl ProfileView {
    pub fn loading(username: &str) -> Self {
        Self {
            username: username.to_string(),
            status: CardStatus::Loading,
            title: "Loading...".to_string(),
            avatar_url: None,
            follow_line: "Loading...".to_string(),
            repos: Vec::new(),
            repos_placeholder: None,
            readme: "Loading README...".to_string(),
            profile_url: None,
        }
    }

    pub fn from_result(username: &str, result: &Result<ProfileBundle, ProfileError>) -> Self {
        match result {
            Ok(bundle) => Self::from_bundle(username, bundle),
            Err(err) => Self::from_error(username, err),
        }
    }

    pub fn from_bundle(username: &str, bundle: &ProfileBundle) -> Self {
        let user = bundle.user.as_ref();

        let repos: Vec<RepoLine> = bundle
            .repos
            .iter()
            .map(|repo| RepoLine {
                name: repo.name.clone(),
                url: repo.html_url.clone(),
                stars: repo.stargazers_count,
            })
            .collect();
        let repos_placeholder = repos.is_empty().then(|| NO_REPOS.to_string());

        Self {
            username: username.to_string(),
            status: CardStatus::Loaded,
            title: user
                .map(|u| u.display_name().to_string())
                .unwrap_or_else(|| "Failed to load".to_string()),
            avatar_url: user.and_then(|u| u.avatar_url.clone()),
            follow_line: user
                .map(|u| format!("{} followers · {} following", u.followers, u.following))
                .unwrap_or_default(),
            repos,
            repos_placeholder,
            readme: bundle
                .readme
                .clone()
                .unwrap_or_else(|| NO_README.to_string()),
            profile_url: None,
        }
    }

    pub fn from_error(username: &str, err: &ProfileError) -> Self {
        let rate_limited = err.is_rate_limited();

        Self {
            username: username.to_string(),
            status: if rate_limited {
                CardStatus::RateLimited
            } else {
                CardStatus::Failed
            },
            title: if rate_limited {
                "GitHub API limit".to_string()
            } else {
                "Failed to load".to_string()
            },
            avatar_url: None,
            follow_line: String::new(),
            repos: Vec::new(),
            repos_placeholder: Some(if rate_limited {
                RATE_LIMIT_NOTICE.to_string()
            } else {
                REPOS_FAILED.to_string()
            }),
            readme: if rate_limited {
                RATE_LIMIT_NOTICE.to_string()
            } else {
                NO_README.to_string()
            },
            profile_url: rate_limited.then(|| Config::profile_url(username)),
        }
    }
}

impl fmt::Display for ProfileView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} (@{})", self.title, self.username)?;
        if !self.follow_line.is_empty() {
            writeln!(f, "{}", self.follow_line)?;
        }
        if let Some(avatar) = &self.avatar_url {
            writeln!(f, "Avatar: {}", avatar)?;
        }

        writeln!(f)?;
        writeln!(f, "Popular repositories")?;
        match &self.repos_placeholder {
            Some(placeholder) => writeln!(f, "  {}", placeholder)?,
            None => {
                for repo in &self.repos {
                    writeln!(f, "  {}", repo)?;
                }
            }
        }
        if let Some(url) = &self.profile_url {
            writeln!(f, "  Open profile {}: {}", self.username, url)?;
        }

        writeln!(f)?;
        write!(f, "{}", self.readme.trim_end())
    }
}
