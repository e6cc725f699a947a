//! Error types for the API client.

use thiserror::Error;

/// Errors that can occur while talking to the backend.
#[derive(Debug, Error)]
pub enum Error {
    /// Transport-level failure (connect, timeout, TLS, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body did not match the expected shape.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid URL.
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// Server answered with a non-success status.
    #[error("Server returned {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Server-provided detail, or the raw body.
        message: String,
    },

    /// The request was rejected as unauthenticated even after a refresh.
    #[error("Not authenticated")]
    Unauthorized,

    /// Token refresh failed; the session has been cleared.
    #[error("Session expired, please log in again")]
    SessionExpired,

    /// OAuth callback handling failed.
    #[error("Auth error: {0}")]
    Auth(#[from] zenwatch_auth::Error),

    /// Invalid client configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// HTTP status associated with this error, if any.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Unauthorized | Self::SessionExpired => Some(401),
            _ => None,
        }
    }

    /// Returns true for 404 responses.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status: 404, .. })
    }

    /// Returns true when the user has to (re-)authenticate.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized | Self::SessionExpired)
    }

    /// Returns true for failures that never reached a server response.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Http(e) if e.is_connect() || e.is_timeout() || e.is_request())
    }
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_helpers() {
        let not_found = Error::Status {
            status: 404,
            message: "Task not found".into(),
        };
        assert!(not_found.is_not_found());
        assert_eq!(not_found.status(), Some(404));
        assert!(!not_found.is_unauthorized());

        assert!(Error::SessionExpired.is_unauthorized());
        assert_eq!(Error::Unauthorized.status(), Some(401));
        assert_eq!(Error::Config("x".into()).status(), None);
    }
}
