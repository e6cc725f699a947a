//! Login, registration, OAuth and profile.

use tracing::warn;
use url::Url;
use zenwatch_api::types::{AuthResponse, LoginRequest, ProfileUpdate, RegisterRequest, User};
use zenwatch_auth::OAuthFlow;

use crate::cache::keys;
use crate::error::Result;
use crate::mutation::{MutationPlan, run_optimistic};
use crate::validation::{validate_login, validate_profile, validate_registration};
use crate::zenwatch::ZenWatch;

impl ZenWatch {
    /// Logs in with email and password.
    ///
    /// # Errors
    ///
    /// Returns a validation error, or `Unauthorized` for bad credentials.
    pub async fn login(&self, email: &str, password: &str) -> Result<User> {
        let request = LoginRequest::new(email.trim(), password);
        validate_login(&request)?;
        let response = self.api.login(&request).await?;
        Ok(self.start_session(response))
    }

    /// Creates an account and logs in.
    ///
    /// # Errors
    ///
    /// Returns a validation error or the request error.
    pub async fn register(
        &self,
        request: &RegisterRequest,
        confirm_password: &str,
    ) -> Result<User> {
        validate_registration(request, confirm_password)?;
        let response = self.api.register(request).await?;
        Ok(self.start_session(response))
    }

    /// Finishes an OAuth login from the provider's redirect URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the redirect carries an error, the state does
    /// not match, or the backend rejects the code.
    pub async fn complete_oauth(&self, flow: &OAuthFlow, redirect: &Url) -> Result<User> {
        let response = self.api.complete_oauth(flow, redirect).await?;
        Ok(self.start_session(response))
    }

    /// Logs out and drops every cached query.
    ///
    /// The local session ends even if the server call fails.
    pub async fn logout(&self) {
        if let Err(e) = self.api.logout().await {
            warn!(error = %e, "Logout request failed");
        }
        self.cache.clear();
        self.notifier.info("Signed out");
    }

    /// Updates the signed-in user's profile.
    ///
    /// # Errors
    ///
    /// Returns a validation error, or the request error after rolling back.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<User> {
        validate_profile(update)?;
        let plan = MutationPlan::new("update_profile")
            .affects(keys::me())
            .on_success("Profile updated")
            .on_error("Could not update profile");

        let user = run_optimistic(
            &self.cache,
            &self.notifier,
            plan,
            |cache| {
                cache.update::<User>(&keys::me(), |user| {
                    if let Some(username) = &update.username {
                        user.username.clone_from(username);
                    }
                    if update.bio.is_some() {
                        user.bio.clone_from(&update.bio);
                    }
                    if update.avatar_url.is_some() {
                        user.avatar_url.clone_from(&update.avatar_url);
                    }
                });
            },
            self.api.update_profile(update),
        )
        .await?;
        self.cache.set(keys::me(), user.clone());
        Ok(user)
    }

    fn start_session(&self, response: AuthResponse) -> User {
        self.cache.clear();
        self.cache.set(keys::me(), response.user.clone());
        self.notifier
            .success(format!("Welcome, {}", response.user.username));
        response.user
    }
}
