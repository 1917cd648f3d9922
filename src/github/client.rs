// GitHub HTTP client.
// Builds URLs and headers for the API and raw-content hosts and converts responses into profile errors.

use std::sync::Arc;

use reqwest::{
    StatusCode,
    header::{ACCEPT, HeaderMap, HeaderValue},
};

use crate::config::Config;
use crate::error::{ProfileError, Result};

use super::transport::{HttpResponse, ReqwestTransport, Transport};
use super::types::ApiMessage;

/// Which GitHub origin a request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Host {
    /// REST API: JSON, versioned.
    Api,
    /// Raw file content: plain text, no API headers.
    Raw,
}

impl Host {
    fn rate_limit_message(&self) -> &'static str {
        match self {
            Host::Api => "GitHub API rate limit exceeded",
            Host::Raw => "GitHub raw rate limit",
        }
    }
}

/// Unauthenticated GitHub client over a pluggable transport.
#[derive(Clone)]
pub struct GitHubClient {
    transport: Arc<dyn Transport>,
    api_base: String,
    raw_base: String,
    api_headers: HeaderMap,
    raw_headers: HeaderMap,
}

impl GitHubClient {
    /// Create a client that sends requests through `transport`.
    pub fn new(config: &Config, transport: Arc<dyn Transport>) -> Result<Self> {
        let mut api_headers = HeaderMap::new();
        api_headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        api_headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_str(&config.api_version)
                .map_err(|e| ProfileError::unavailable(e.to_string()))?,
        );

        Ok(Self {
            transport,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            raw_base: config.raw_base.trim_end_matches('/').to_string(),
            api_headers,
            raw_headers: HeaderMap::new(),
        })
    }

    /// Create a client backed by reqwest.
    pub fn from_config(config: &Config) -> Result<Self> {
        let transport = ReqwestTransport::new(&config.user_agent)?;
        Self::new(config, Arc::new(transport))
    }

    /// Absolute URL for an API endpoint such as `/users/octocat`.
    pub fn api_url(&self, endpoint: &str) -> String {
        format!("{}{}", self.api_base, endpoint)
    }

    /// Absolute URL for a raw-content path such as `/octocat/octocat/main/README.md`.
    pub fn raw_url(&self, path: &str) -> String {
        format!("{}{}", self.raw_base, path)
    }

    /// GET `url` from `host`, failing on any non-2xx status.
    pub async fn get(&self, host: Host, url: &str) -> Result<HttpResponse> {
        let headers = match host {
            Host::Api => &self.api_headers,
            Host::Raw => &self.raw_headers,
        };
        let response = self.transport.get(url, headers).await?;
        check_response(host, response)
    }
}

/// Check response status and convert errors.
fn check_response(host: Host, response: HttpResponse) -> Result<HttpResponse> {
    if response.is_success() {
        return Ok(response);
    }

    if response.status == StatusCode::FORBIDDEN.as_u16() {
        // Only the API host answers with a JSON message
        let message = match host {
            Host::Api => serde_json::from_str::<ApiMessage>(&response.body)
                .ok()
                .and_then(|body| body.message)
                .filter(|m| !m.is_empty()),
            Host::Raw => None,
        }
        .unwrap_or_else(|| host.rate_limit_message().to_string());
        return Err(ProfileError::RateLimited { message });
    }

    let message = if response.body.trim().is_empty() {
        StatusCode::from_u16(response.status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or("request failed")
            .to_string()
    } else {
        response.body
    };

    Err(ProfileError::Unavailable {
        status: Some(response.status),
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::fake::FakeTransport;

    fn client(fake: &Arc<FakeTransport>) -> GitHubClient {
        GitHubClient::new(&Config::default(), fake.clone()).unwrap()
    }

    #[test]
    fn test_forbidden_uses_body_message() {
        let err = check_response(
            Host::Api,
            HttpResponse::new(403, r#"{"message":"API rate limit exceeded"}"#),
        )
        .unwrap_err();
        assert_eq!(
            err,
            ProfileError::RateLimited {
                message: "API rate limit exceeded".to_string()
            }
        );
    }

    #[test]
    fn test_forbidden_without_json_uses_default() {
        let err = check_response(Host::Api, HttpResponse::new(403, "<html>")).unwrap_err();
        assert_eq!(err.to_string(), "GitHub API rate limit exceeded");

        let err = check_response(Host::Raw, HttpResponse::new(403, "")).unwrap_err();
        assert_eq!(err.to_string(), "GitHub raw rate limit");
    }

    #[test]
    fn test_raw_forbidden_ignores_body_message() {
        let err = check_response(
            Host::Raw,
            HttpResponse::new(403, r#"{"message":"Secondary limit"}"#),
        )
        .unwrap_err();
        assert_eq!(
            err,
            ProfileError::RateLimited {
                message: "GitHub raw rate limit".to_string()
            }
        );
    }

    #[test]
    fn test_other_status_is_unavailable() {
        let err = check_response(Host::Api, HttpResponse::new(404, "")).unwrap_err();
        assert_eq!(
            err,
            ProfileError::Unavailable {
                status: Some(404),
                message: "Not Found".to_string()
            }
        );

        let err = check_response(Host::Raw, HttpResponse::new(500, "boom")).unwrap_err();
        assert_eq!(err.to_string(), "HTTP 500: boom");
    }

    #[test]
    fn test_urls_trim_trailing_slash() {
        let config = Config {
            api_base: "http://localhost:9000/".to_string(),
            ..Config::default()
        };
        let client = GitHubClient::new(&config, Arc::new(FakeTransport::new())).unwrap();
        assert_eq!(
            client.api_url("/users/octocat"),
            "http://localhost:9000/users/octocat"
        );
        assert_eq!(
            client.raw_url("/octocat/octocat/main/README.md"),
            "https://raw.githubusercontent.com/octocat/octocat/main/README.md"
        );
    }

    #[tokio::test]
    async fn test_api_requests_carry_version_headers() {
        let fake = Arc::new(FakeTransport::new());
        let url = "https://api.github.com/users/octocat";
        fake.route(url, 200, "{}");

        client(&fake).get(Host::Api, url).await.unwrap();

        let headers = fake.last_headers(url).unwrap();
        assert_eq!(headers[ACCEPT], "application/vnd.github+json");
        assert_eq!(headers["X-GitHub-Api-Version"], "2022-11-28");
    }

    #[tokio::test]
    async fn test_raw_requests_carry_no_api_headers() {
        let fake = Arc::new(FakeTransport::new());
        let url = "https://raw.githubusercontent.com/octocat/octocat/main/README.md";
        fake.route(url, 200, "# Hi");

        let response = client(&fake).get(Host::Raw, url).await.unwrap();
        assert_eq!(response.body, "# Hi");
        assert!(fake.last_headers(url).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_transport_failure_is_unavailable() {
        let fake = Arc::new(FakeTransport::new());
        let url = "https://api.github.com/users/octocat";
        fake.fail(url, "connection reset");

        let err = client(&fake).get(Host::Api, url).await.unwrap_err();
        assert_eq!(err, ProfileError::unavailable("connection reset"));
    }
}
