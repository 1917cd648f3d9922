// Error types for ghcard.
// Separates the profile failures shown to users from best-effort storage failures.

use thiserror::Error;

/// Failure of a profile lookup.
///
/// Cloneable so one failed fetch chain can be handed to every caller that
/// was waiting on it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProfileError {
    /// The origin answered 403. The message comes from the response body when
    /// it carried one.
    #[error("{message}")]
    RateLimited { message: String },

    /// Any other non-success response, transport failure, or undecodable payload.
    #[error("{}", unavailable_text(*status, message))]
    Unavailable { status: Option<u16>, message: String },
}

fn unavailable_text(status: Option<u16>, message: &str) -> String {
    match status {
        Some(code) => format!("HTTP {}: {}", code, message),
        None => message.to_string(),
    }
}

impl ProfileError {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, ProfileError::RateLimited { .. })
    }

    pub(crate) fn unavailable(message: impl Into<String>) -> Self {
        ProfileError::Unavailable {
            status: None,
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for ProfileError {
    fn from(err: reqwest::Error) -> Self {
        ProfileError::Unavailable {
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for ProfileError {
    fn from(err: serde_json::Error) -> Self {
        ProfileError::unavailable(format!("invalid JSON payload: {}", err))
    }
}

/// Failure of the persistent storage backend.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

pub type Result<T> = std::result::Result<T, ProfileError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limited_displays_message_only() {
        let err = ProfileError::RateLimited {
            message: "API rate limit exceeded".to_string(),
        };
        assert_eq!(err.to_string(), "API rate limit exceeded");
        assert!(err.is_rate_limited());
    }

    #[test]
    fn test_unavailable_display_includes_status() {
        let err = ProfileError::Unavailable {
            status: Some(404),
            message: "Not Found".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 404: Not Found");
        assert!(!err.is_rate_limited());

        let err = ProfileError::unavailable("connection refused");
        assert_eq!(err.to_string(), "connection refused");
    }
}
