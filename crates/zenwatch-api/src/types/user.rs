//! Users and authentication payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use zenwatch_auth::TokenResponse;

/// The signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Identifier.
    pub id: i64,
    /// Email address.
    pub email: String,
    /// Public handle.
    pub username: String,
    /// Access to the admin console.
    #[serde(default)]
    pub is_admin: bool,
    /// Avatar image.
    #[serde(default)]
    pub avatar_url: Option<String>,
    /// Profile text.
    #[serde(default)]
    pub bio: Option<String>,
    /// Registration time.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Another user's public profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicProfile {
    /// Public handle.
    pub username: String,
    /// Avatar image.
    #[serde(default)]
    pub avatar_url: Option<String>,
    /// Profile text.
    #[serde(default)]
    pub bio: Option<String>,
    /// Registration time.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Comments written.
    #[serde(default)]
    pub comment_count: u64,
}

/// Email/password login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Email address.
    pub email: String,
    /// Password.
    pub password: String,
}

impl LoginRequest {
    /// Creates a login request.
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Account registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRequest {
    /// Email address.
    pub email: String,
    /// Public handle.
    pub username: String,
    /// Password.
    pub password: String,
}

/// Successful login, registration, or OAuth callback.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    /// The authenticated user.
    pub user: User,
    /// Issued access token.
    #[serde(flatten)]
    pub token: TokenResponse,
}

/// Partial profile update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    /// New handle.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// New profile text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    /// New avatar image.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}
