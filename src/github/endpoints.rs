// GitHub endpoint functions.
// Typed fetches for a user, their recent repositories, and their profile README.

use log::debug;
use serde_json::Value;
use urlencoding::encode;

use crate::error::{ProfileError, Result};

use super::client::{GitHubClient, Host};
use super::types::{RepoRecord, UserRecord};

impl GitHubClient {
    /// Get a user by login.
    pub async fn get_user(&self, username: &str) -> Result<UserRecord> {
        let url = self.api_url(&format!("/users/{}", encode(username)));
        let response = self.get(Host::Api, &url).await?;
        let user: UserRecord = serde_json::from_str(&response.body)?;
        Ok(user)
    }

    /// Get a user's most recently updated public repositories.
    pub async fn get_recent_repos(&self, username: &str, limit: u32) -> Result<Vec<RepoRecord>> {
        let url = self.api_url(&format!(
            "/users/{}/repos?sort=updated&per_page={}",
            encode(username),
            limit
        ));
        let response = self.get(Host::Api, &url).await?;

        let value: Value = serde_json::from_str(&response.body)?;
        if !value.is_array() {
            return Err(ProfileError::unavailable("Invalid repos response"));
        }
        let repos: Vec<RepoRecord> = serde_json::from_value(value)?;
        Ok(repos)
    }

    /// Candidate URLs for a user's profile README, in lookup order.
    pub fn readme_candidates(&self, username: &str) -> Vec<String> {
        let login = encode(username);
        vec![
            self.raw_url(&format!("/{}/{}/main/README.md", login, login)),
            self.raw_url(&format!("/{}/{}/master/README.md", login, login)),
            self.raw_url(&format!("/{}/profile/main/README.md", login)),
        ]
    }

    /// Get the first README found among the candidates.
    ///
    /// Returns `Ok(None)` once every candidate has failed. A rate limit on any
    /// candidate stops the search and is returned as an error.
    pub async fn get_profile_readme(&self, username: &str) -> Result<Option<String>> {
        for url in self.readme_candidates(username) {
            match self.get(Host::Raw, &url).await {
                Ok(response) => return Ok(Some(response.body)),
                Err(err @ ProfileError::RateLimited { .. }) => return Err(err),
                Err(err) => debug!("README candidate {} failed: {}", url, err),
            }
        }
        Ok(None)
    }
}
