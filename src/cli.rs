// Command-line interface parsing.
// Maps flags onto the service configuration.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::config::{Config, DEFAULT_PROFILES};

/// ghcard - GitHub profile cards in the terminal
#[derive(Parser, Debug)]
#[command(name = "ghcard")]
#[command(about = "GitHub profile cards: user, recent repositories, and profile README")]
#[command(version)]
pub struct Cli {
    /// GitHub usernames to show (defaults to the built-in profiles)
    #[arg(value_name = "USERNAME")]
    pub usernames: Vec<String>,

    /// Print the cards to stdout instead of starting the TUI
    #[arg(long)]
    pub plain: bool,

    /// Minutes a cached profile stays fresh
    #[arg(long, value_name = "MINUTES", default_value_t = 30)]
    pub ttl_minutes: u64,

    /// Do not read or write the on-disk profile cache
    #[arg(long)]
    pub no_cache: bool,

    /// Directory for the on-disk profile cache
    #[arg(long, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Base URL of the GitHub REST API
    #[arg(long, value_name = "URL")]
    pub api_base: Option<String>,

    /// Base URL of the raw content host
    #[arg(long, value_name = "URL")]
    pub raw_base: Option<String>,

    /// Log debug messages
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Usernames to show, falling back to the built-in profiles.
    pub fn profiles(&self) -> Vec<String> {
        if self.usernames.is_empty() {
            DEFAULT_PROFILES.iter().map(|u| u.to_string()).collect()
        } else {
            self.usernames.clone()
        }
    }

    pub fn config(&self) -> Config {
        let defaults = Config::default();
        Config {
            api_base: self.api_base.clone().unwrap_or(defaults.api_base),
            raw_base: self.raw_base.clone().unwrap_or(defaults.raw_base),
            ttl: Duration::from_secs(self.ttl_minutes.saturating_mul(60)),
            cache_dir: self.cache_dir.clone(),
            cache_disabled: self.no_cache,
            ..Config::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_no_args() {
        let cli = Cli::parse_from(["ghcard"]);
        assert!(cli.usernames.is_empty());
        assert!(!cli.plain);
        assert_eq!(cli.profiles(), vec!["swid-yera", "Antawq"]);
    }

    #[test]
    fn test_cli_parse_usernames() {
        let cli = Cli::parse_from(["ghcard", "octocat", "torvalds", "--plain"]);
        assert_eq!(cli.profiles(), vec!["octocat", "torvalds"]);
        assert!(cli.plain);
    }

    #[test]
    fn test_config_defaults() {
        let config = Cli::parse_from(["ghcard"]).config();
        assert_eq!(config.ttl, Duration::from_secs(30 * 60));
        assert_eq!(config.api_base, "https://api.github.com");
        assert!(!config.cache_disabled);
        assert!(config.cache_dir.is_none());
    }

    #[test]
    fn test_config_overrides() {
        let cli = Cli::parse_from([
            "ghcard",
            "--ttl-minutes",
            "5",
            "--no-cache",
            "--cache-dir",
            "/tmp/ghcard",
            "--api-base",
            "http://localhost:8080",
        ]);
        let config = cli.config();
        assert_eq!(config.ttl, Duration::from_secs(300));
        assert!(config.cache_disabled);
        assert_eq!(config.cache_dir, Some(PathBuf::from("/tmp/ghcard")));
        assert_eq!(config.api_base, "http://localhost:8080");
        assert_eq!(config.raw_base, "https://raw.githubusercontent.com");
    }

    #[test]
    fn test_huge_ttl_saturates() {
        let config = Cli::parse_from(["ghcard", "--ttl-minutes", "18446744073709551615"]).config();
        assert_eq!(config.ttl, Duration::from_secs(u64::MAX));
    }

    #[test]
    fn test_rejects_bad_ttl() {
        assert!(Cli::try_parse_from(["ghcard", "--ttl-minutes", "soon"]).is_err());
    }
}
