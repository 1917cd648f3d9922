// GitHub profile types.
// The subset of user and repository fields a profile card renders, plus the combined bundle.

use serde::{Deserialize, Serialize};

/// GitHub user, trimmed to the fields a profile card shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub login: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub followers: u64,
    #[serde(default)]
    pub following: u64,
}

impl UserRecord {
    /// Display name, falling back to the login when the profile has none.
    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => &self.login,
        }
    }
}

/// GitHub repository, trimmed to the fields a profile card shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoRecord {
    pub name: String,
    #[serde(default)]
    pub html_url: Option<String>,
    #[serde(default)]
    pub stargazers_count: u64,
}

/// Everything known about one username.
///
/// `repos` and `readme` may be degraded to empty/`None` when their fetches
/// failed for reasons other than rate limiting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileBundle {
    pub user: Option<UserRecord>,
    #[serde(default)]
    pub repos: Vec<RepoRecord>,
    #[serde(default)]
    pub readme: Option<String>,
}

/// Error body returned by the GitHub API.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiMessage {
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_defaults_missing_fields() {
        let user: UserRecord =
            serde_json::from_str(r#"{"login":"octocat","followers":10,"following":2}"#).unwrap();
        assert_eq!(user.login, "octocat");
        assert_eq!(user.followers, 10);
        assert_eq!(user.following, 2);
        assert!(user.avatar_url.is_none());
        assert_eq!(user.display_name(), "octocat");
    }

    #[test]
    fn test_display_name_prefers_name() {
        let user = UserRecord {
            login: "octocat".to_string(),
            name: Some("The Octocat".to_string()),
            avatar_url: None,
            followers: 0,
            following: 0,
        };
        assert_eq!(user.display_name(), "The Octocat");

        let unnamed = UserRecord {
            name: Some(String::new()),
            ..user
        };
        assert_eq!(unnamed.display_name(), "octocat");
    }

    #[test]
    fn test_repo_ignores_unused_fields() {
        let repos: Vec<RepoRecord> = serde_json::from_str(
            r#"[{"id":1296269,"name":"Hello-World","full_name":"octocat/Hello-World",
                "html_url":"https://github.com/octocat/Hello-World","stargazers_count":100}]"#,
        )
        .unwrap();
        assert_eq!(repos.len(), 1);
        assert_eq!(repos[0].name, "Hello-World");
        assert_eq!(repos[0].stargazers_count, 100);
        assert_eq!(
            repos[0].html_url.as_deref(),
            Some("https://github.com/octocat/Hello-World")
        );
    }

    #[test]
    fn test_bundle_accepts_null_user() {
        let bundle: ProfileBundle =
            serde_json::from_str(r#"{"user":null,"repos":[],"readme":null}"#).unwrap();
        assert!(bundle.user.is_none());
        assert!(bundle.repos.is_empty());
        assert!(bundle.readme.is_none());
    }
}
