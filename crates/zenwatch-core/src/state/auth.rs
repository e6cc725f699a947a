//! Authentication state.

use zenwatch_api::types::User;

/// Who is signed in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthState {
    user: Option<User>,
}

impl AuthState {
    /// Records a successful login.
    pub fn set_auth(&mut self, user: User) {
        self.user = Some(user);
    }

    /// Forgets the current user.
    pub fn logout(&mut self) {
        self.user = None;
    }

    /// The signed-in user.
    #[must_use]
    pub const fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// Returns true if someone is signed in.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// Returns true if the signed-in user may use the admin console.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(|u| u.is_admin)
    }
}
