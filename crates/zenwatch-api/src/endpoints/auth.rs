//! Authentication and profiles.

use tracing::{info, warn};
use url::Url;
use zenwatch_auth::{AccessToken, CallbackParams, OAuthFlow};

use crate::client::{ApiClient, ApiRequest};
use crate::error::Result;
use crate::types::{
    AuthResponse, LoginRequest, ProfileUpdate, PublicProfile, RegisterRequest, User,
};

impl ApiClient {
    /// Logs in with email and password and stores the issued token.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` for bad credentials.
    pub async fn login(&self, request: &LoginRequest) -> Result<AuthResponse> {
        let response: AuthResponse = self
            .send(ApiRequest::post("api/auth/login").json(request)?.without_refresh())
            .await?;
        self.store_session(&response);
        Ok(response)
    }

    /// Creates an account and stores the issued token.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails (409 when the email or username is taken).
    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse> {
        let response: AuthResponse = self
            .send(ApiRequest::post("api/auth/register").json(request)?.without_refresh())
            .await?;
        self.store_session(&response);
        Ok(response)
    }

    /// Ends the session on the server and clears the local token.
    ///
    /// The local token is cleared even if the server call fails.
    ///
    /// # Errors
    ///
    /// Returns the server error after clearing the token.
    pub async fn logout(&self) -> Result<()> {
        let result = self
            .send_unit(ApiRequest::post("api/auth/logout").without_refresh())
            .await;
        if let Err(e) = &result {
            warn!(error = %e, "Server logout failed, clearing local session anyway");
        }
        self.tokens().sign_out();
        result
    }

    /// The signed-in user.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` or `SessionExpired` without a valid session.
    pub async fn me(&self) -> Result<User> {
        self.send(ApiRequest::get("api/auth/me")).await
    }

    /// Forwards OAuth `code`/`state` to the backend and stores the issued token.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the callback.
    pub async fn oauth_callback(
        &self,
        flow: &OAuthFlow,
        params: &CallbackParams,
    ) -> Result<AuthResponse> {
        let request = ApiRequest::get(format!(
            "api/auth/oauth/{}/callback",
            flow.provider().as_str()
        ))
        .query(vec![
            ("code".to_string(), params.code.clone()),
            ("state".to_string(), params.state.clone()),
        ])
        .without_refresh();

        let response: AuthResponse = self.send(request).await?;
        self.store_session(&response);
        Ok(response)
    }

    /// Verifies the redirect URL against `flow` and completes the login.
    ///
    /// # Errors
    ///
    /// Returns an auth error for a bad redirect, or the backend error.
    pub async fn complete_oauth(&self, flow: &OAuthFlow, redirect: &Url) -> Result<AuthResponse> {
        let params = flow.accept_callback(redirect)?;
        self.oauth_callback(flow, &params).await
    }

    /// Updates the signed-in user's profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<User> {
        self.send(ApiRequest::patch("api/users/me").json(update)?)
            .await
    }

    /// Public profile of any user.
    ///
    /// # Errors
    ///
    /// Returns `Status { status: 404, .. }` for unknown usernames.
    pub async fn public_profile(&self, username: &str) -> Result<PublicProfile> {
        self.send(ApiRequest::get(format!("api/users/{username}")))
            .await
    }

    fn store_session(&self, response: &AuthResponse) {
        info!(user = %response.user.username, "Signed in");
        self.tokens()
            .set(AccessToken::from_response(response.token.clone()));
    }
}
