//! Access token types.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Bearer access token issued by the `ZenWatch` backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
    /// Raw token string.
    pub value: String,
    /// Token type (usually "Bearer").
    pub token_type: String,
    /// Expiration time, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl AccessToken {
    /// Creates a bearer token, reading the expiry from the JWT payload when present.
    #[must_use]
    pub fn bearer(value: impl Into<String>) -> Self {
        let value = value.into();
        let expires_at = jwt_expiry(&value).ok().flatten();
        Self {
            value,
            token_type: "bearer".to_string(),
            expires_at,
        }
    }

    /// Creates a token from an auth response.
    ///
    /// An explicit `expires_in` wins over the JWT `exp` claim.
    #[must_use]
    pub fn from_response(response: TokenResponse) -> Self {
        let mut token = Self::bearer(response.access_token);
        token.token_type = response.token_type;
        if let Some(secs) = response.expires_in {
            token.expires_at = Some(Utc::now() + Duration::seconds(i64::from(secs)));
        }
        token
    }

    /// Sets the expiration time.
    #[must_use]
    pub const fn with_expires_at(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    /// Checks if the token is expired (with 60 second buffer).
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expires_at
            .is_some_and(|exp| Utc::now() + Duration::seconds(60) >= exp)
    }

    /// Value for the `Authorization` header.
    #[must_use]
    pub fn authorization_value(&self) -> String {
        format!("Bearer {}", self.value)
    }
}

/// Token part of an auth response.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TokenResponse {
    /// Access token.
    pub access_token: String,
    /// Token type.
    #[serde(default = "default_token_type")]
    pub token_type: String,
    /// Expires in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<u32>,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

#[derive(Deserialize)]
struct Claims {
    exp: Option<i64>,
}

/// Reads the `exp` claim of a JWT without verifying it.
///
/// Returns `Ok(None)` for tokens without an `exp` claim.
///
/// # Errors
///
/// Returns an error if the token is not a three-part JWT or its payload
/// is not valid base64url JSON.
pub fn jwt_expiry(token: &str) -> Result<Option<DateTime<Utc>>> {
    let mut parts = token.split('.');
    let payload = match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(_), Some(payload), Some(_), None) => payload,
        _ => return Err(Error::InvalidToken("expected three JWT segments".into())),
    };

    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|e| Error::InvalidToken(e.to_string()))?;
    let claims: Claims = serde_json::from_slice(&bytes)?;

    Ok(claims
        .exp
        .and_then(|exp| Utc.timestamp_opt(exp, 0).single()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::redundant_clone, clippy::unreadable_literal)]
mod tests {
    use super::*;

    fn jwt(payload: &str) -> String {
        format!(
            "{}.{}.sig",
            URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256"}"#),
            URL_SAFE_NO_PAD.encode(payload)
        )
    }

    #[test]
    fn test_bearer_reads_exp_claim() {
        let token = AccessToken::bearer(jwt(r#"{"sub":"1","exp":4102444800}"#));
        assert_eq!(
            token.expires_at,
            Some(Utc.timestamp_opt(4102444800, 0).unwrap())
        );
        assert!(!token.is_expired());
    }

    #[test]
    fn test_opaque_token_has_no_expiry() {
        let token = AccessToken::bearer("opaque-token");
        assert!(token.expires_at.is_none());
        assert!(!token.is_expired());
        assert_eq!(token.authorization_value(), "Bearer opaque-token");
    }

    #[test]
    fn test_token_expiration() {
        let expired =
            AccessToken::bearer("abc").with_expires_at(Utc::now() - Duration::seconds(120));
        assert!(expired.is_expired());

        // Inside the 60 second buffer counts as expired
        let almost = AccessToken::bearer("abc").with_expires_at(Utc::now() + Duration::seconds(30));
        assert!(almost.is_expired());
    }

    #[test]
    fn test_from_response_prefers_expires_in() {
        let response = TokenResponse {
            access_token: jwt(r#"{"exp":1}"#),
            token_type: "bearer".to_string(),
            expires_in: Some(3600),
        };
        let token = AccessToken::from_response(response);
        assert!(!token.is_expired());
    }

    #[test]
    fn test_jwt_expiry_rejects_garbage() {
        assert!(jwt_expiry("not-a-jwt").is_err());
        assert!(jwt_expiry("a.!!!.c").is_err());
        assert_eq!(jwt_expiry(&jwt(r#"{"sub":"x"}"#)).unwrap(), None);
    }
}
