//! OAuth login via the backend.
//!
//! The backend owns the provider credentials. The client only picks a
//! provider, sends the user to the backend's authorize URL with a random
//! `state`, and, once the browser is redirected back, checks that `state`
//! before forwarding `code`/`state` to the backend callback endpoint.

use rand::Rng;
use rand::distributions::Alphanumeric;
use url::Url;

use crate::error::{Error, Result};

/// Length of the generated `state` value.
const STATE_LEN: usize = 32;

/// OAuth providers supported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OAuthProvider {
    /// GitHub login.
    Github,
    /// Google login.
    Google,
}

impl OAuthProvider {
    /// Path segment used by the backend for this provider.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Github => "github",
            Self::Google => "google",
        }
    }

    /// Parse from a path segment or user input.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "github" => Some(Self::Github),
            "google" => Some(Self::Google),
            _ => None,
        }
    }
}

/// Parameters delivered on the OAuth redirect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackParams {
    /// Authorization code.
    pub code: String,
    /// State echoed back by the provider.
    pub state: String,
}

impl CallbackParams {
    /// Extracts `code` and `state` from a redirect URL.
    ///
    /// # Errors
    ///
    /// Returns `AccessDenied` or an OAuth error if the provider reported one,
    /// and `MissingParameter` if `code` or `state` is absent.
    pub fn from_url(url: &Url) -> Result<Self> {
        let mut code = None;
        let mut state = None;
        let mut error = None;
        let mut description = String::new();

        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "code" => code = Some(value.into_owned()),
                "state" => state = Some(value.into_owned()),
                "error" => error = Some(value.into_owned()),
                "error_description" => description = value.into_owned(),
                _ => {}
            }
        }

        if let Some(error) = error {
            return Err(if error == "access_denied" {
                Error::AccessDenied
            } else {
                Error::oauth_error(error, description)
            });
        }

        Ok(Self {
            code: code
                .filter(|c| !c.is_empty())
                .ok_or(Error::MissingParameter("code"))?,
            state: state
                .filter(|s| !s.is_empty())
                .ok_or(Error::MissingParameter("state"))?,
        })
    }
}

/// A single OAuth login attempt.
#[derive(Debug, Clone)]
pub struct OAuthFlow {
    provider: OAuthProvider,
    state: String,
}

impl OAuthFlow {
    /// Starts a flow with a fresh random `state`.
    #[must_use]
    pub fn new(provider: OAuthProvider) -> Self {
        let state = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(STATE_LEN)
            .map(char::from)
            .collect();
        Self { provider, state }
    }

    /// Resumes a flow whose `state` was persisted elsewhere.
    #[must_use]
    pub fn resume(provider: OAuthProvider, state: impl Into<String>) -> Self {
        Self {
            provider,
            state: state.into(),
        }
    }

    /// Provider of this flow.
    #[must_use]
    pub const fn provider(&self) -> OAuthProvider {
        self.provider
    }

    /// Expected `state` value.
    #[must_use]
    pub fn state(&self) -> &str {
        &self.state
    }

    /// Builds the backend authorize URL the user should open.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be constructed.
    pub fn authorization_url(&self, api_base: &Url, redirect_uri: &str) -> Result<Url> {
        let mut url = api_base.join(&format!(
            "api/auth/oauth/{}/authorize",
            self.provider.as_str()
        ))?;
        url.query_pairs_mut()
            .append_pair("state", &self.state)
            .append_pair("redirect_uri", redirect_uri);
        Ok(url)
    }

    /// Parses the redirect URL and verifies its `state`.
    ///
    /// # Errors
    ///
    /// Returns `StateMismatch` if the echoed state differs from ours, or any
    /// error from [`CallbackParams::from_url`].
    pub fn accept_callback(&self, redirect: &Url) -> Result<CallbackParams> {
        let params = CallbackParams::from_url(redirect)?;
        if params.state != self.state {
            return Err(Error::StateMismatch);
        }
        Ok(params)
    }
}
