//! Error types for the core library.

use thiserror::Error;

use crate::cache::QueryError;
use crate::validation::ValidationError;

/// Errors that can occur in core operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Backend request failed.
    #[error("API error: {0}")]
    Api(#[from] zenwatch_api::Error),

    /// Cached query failed.
    #[error("Query error: {0}")]
    Query(#[from] QueryError),

    /// Form input rejected before reaching the backend.
    #[error("Invalid input: {}", join_messages(.0))]
    Validation(Vec<ValidationError>),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<Vec<ValidationError>> for Error {
    fn from(errors: Vec<ValidationError>) -> Self {
        Self::Validation(errors)
    }
}

impl Error {
    /// Returns true when the user has to log in (again).
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        match self {
            Self::Api(e) => e.is_unauthorized(),
            Self::Query(QueryError::Fetch { status, .. }) => *status == Some(401),
            _ => false,
        }
    }
}

fn join_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ValidationError::message)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
