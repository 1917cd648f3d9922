// Service configuration.
// Hosts, cache policy, and request limits with defaults matching the public GitHub endpoints.

use std::path::PathBuf;
use std::time::Duration;

pub const GITHUB_API_BASE: &str = "https://api.github.com";
pub const GITHUB_RAW_BASE: &str = "https://raw.githubusercontent.com";
pub const GITHUB_WEB_BASE: &str = "https://github.com";
pub const GITHUB_API_VERSION: &str = "2022-11-28";

/// Cached bundles older than this are refetched: 30 minutes.
pub const DEFAULT_TTL: Duration = Duration::from_secs(30 * 60);

/// Key prefix for persisted profile bundles.
pub const CACHE_PREFIX: &str = "github-profile-cache:";

/// Profiles shown when no usernames are given on the command line.
pub const DEFAULT_PROFILES: [&str; 2] = ["swid-yera", "Antawq"];

/// Runtime configuration for [`crate::service::ProfileService`].
#[derive(Debug, Clone)]
pub struct Config {
    pub api_base: String,
    pub raw_base: String,
    pub api_version: String,
    pub user_agent: String,
    /// Maximum age of a persisted bundle before it is ignored.
    pub ttl: Duration,
    pub cache_prefix: String,
    /// Where the file-backed cache lives. `None` uses the platform cache dir.
    pub cache_dir: Option<PathBuf>,
    /// Disable the persistent cache entirely.
    pub cache_disabled: bool,
    /// Number of recently updated repositories requested per profile.
    pub repo_limit: u32,
    /// Delay before the background refresh after serving a cached bundle.
    pub refresh_delay: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: GITHUB_API_BASE.to_string(),
            raw_base: GITHUB_RAW_BASE.to_string(),
            api_version: GITHUB_API_VERSION.to_string(),
            user_agent: concat!("ghcard/", env!("CARGO_PKG_VERSION")).to_string(),
            ttl: DEFAULT_TTL,
            cache_prefix: CACHE_PREFIX.to_string(),
            cache_dir: None,
            cache_disabled: false,
            repo_limit: 5,
            refresh_delay: Duration::from_millis(100),
        }
    }
}

impl Config {
    /// Public profile page, used as the fallback link when the API is rate limited.
    pub fn profile_url(username: &str) -> String {
        format!("{}/{}", GITHUB_WEB_BASE, username)
    }
}
