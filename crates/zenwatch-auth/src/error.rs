//! Error types for session and OAuth operations.

/// Result type alias for auth operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Auth error types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// JSON parsing error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Token could not be decoded.
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// The provider reported an error on the redirect.
    #[error("OAuth error: {error} - {description}")]
    OAuth {
        /// Error code (e.g., `access_denied`).
        error: String,
        /// Human-readable description.
        description: String,
    },

    /// User denied authorization.
    #[error("User denied authorization")]
    AccessDenied,

    /// A required callback parameter is missing.
    #[error("Missing callback parameter: {0}")]
    MissingParameter(&'static str),

    /// Callback `state` does not match the one issued for this flow.
    #[error("OAuth state mismatch")]
    StateMismatch,

    /// URL parsing error.
    #[error("URL error: {0}")]
    UrlError(#[from] url::ParseError),
}

impl Error {
    /// Creates an OAuth error from error code and description.
    #[must_use]
    pub fn oauth_error(error: impl Into<String>, description: impl Into<String>) -> Self {
        Self::OAuth {
            error: error.into(),
            description: description.into(),
        }
    }
}
