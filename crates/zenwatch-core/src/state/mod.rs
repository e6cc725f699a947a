//! Application state containers.
//!
//! Three independent parts, each changed only through its setters:
//! - [`AuthState`] - who is signed in
//! - [`UiState`] - theme, layout, filters, current route
//! - [`ModalState`] - which dialog is open

mod auth;
mod modals;
mod ui;

pub use auth::AuthState;
pub use modals::{Modal, ModalState};
pub use ui::{Route, ThemeMode, UiState, ViewMode};

use tracing::info;
use zenwatch_auth::SessionEvent;

use crate::settings::AppSettings;

/// Everything the front end renders from.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    /// Authentication.
    pub auth: AuthState,
    /// Presentation.
    pub ui: UiState,
    /// Dialogs.
    pub modals: ModalState,
}

impl AppState {
    /// Creates state from persisted settings.
    #[must_use]
    pub fn from_settings(settings: &AppSettings) -> Self {
        let mut state = Self::default();
        state.apply_settings(settings);
        state
    }

    /// Applies persisted preferences.
    pub fn apply_settings(&mut self, settings: &AppSettings) {
        self.ui.set_theme(settings.theme);
        self.ui.set_view_mode(settings.view_mode);
        self.ui.set_filters(settings.default_filters.clone());
    }

    /// Copies the current preferences into `settings`.
    pub fn store_settings(&self, settings: &mut AppSettings) {
        settings.theme = self.ui.theme();
        settings.view_mode = self.ui.view_mode();
        settings.default_filters = self.ui.filters().clone();
    }

    /// Reacts to a token store event.
    pub fn handle_session_event(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::Expired => self.handle_session_expired(),
            SessionEvent::SignedOut => {
                self.auth.logout();
                self.modals.close();
            }
            SessionEvent::SignedIn | SessionEvent::Refreshed => {}
        }
    }

    /// Logs out, closes dialogs and shows the login screen.
    pub fn handle_session_expired(&mut self) {
        info!("Session expired, returning to login");
        self.auth.logout();
        self.modals.close();
        let auth = self.auth.clone();
        self.ui.navigate(Route::Login, &auth);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use zenwatch_api::types::User;

    use super::*;

    fn user(is_admin: bool) -> User {
        User {
            id: 1,
            email: "ada@example.com".into(),
            username: "ada".into(),
            is_admin,
            avatar_url: None,
            bio: None,
            created_at: None,
        }
    }

    #[test]
    fn test_navigation_guards() {
        let mut state = AppState::default();

        assert_eq!(state.ui.navigate(Route::Library, &state.auth.clone()), &Route::Login);
        assert_eq!(state.ui.navigate(Route::Videos, &state.auth.clone()), &Route::Videos);

        state.auth.set_auth(user(false));
        assert_eq!(state.ui.navigate(Route::Library, &state.auth.clone()), &Route::Library);
        assert_eq!(state.ui.navigate(Route::Admin, &state.auth.clone()), &Route::Feed);

        state.auth.set_auth(user(true));
        assert_eq!(state.ui.navigate(Route::Admin, &state.auth.clone()), &Route::Admin);
    }

    #[test]
    fn test_session_expiry_logs_out() {
        let mut state = AppState::default();
        state.auth.set_auth(user(false));
        state.modals.open(Modal::AddKeyword);
        let auth = state.auth.clone();
        state.ui.navigate(Route::Triage, &auth);

        state.handle_session_event(SessionEvent::Expired);

        assert!(!state.auth.is_authenticated());
        assert!(state.modals.current().is_none());
        assert_eq!(state.ui.route(), &Route::Login);
    }

    #[test]
    fn test_filter_setters_reset_page() {
        let mut ui = UiState::default();
        ui.set_page(4);
        ui.set_category(Some("ai".into()));
        assert_eq!(ui.filters().page, 1);
        assert_eq!(ui.filters().category.as_deref(), Some("ai"));

        ui.set_page(0);
        assert_eq!(ui.filters().page, 1);

        ui.set_search(Some("  ".into()));
        assert!(ui.filters().search.is_none());

        ui.reset_filters();
        assert!(ui.filters().category.is_none());
    }

    #[test]
    fn test_modals() {
        let mut modals = ModalState::default();
        modals.open(Modal::Login);
        assert!(modals.is_open(&Modal::Login));
        modals.open(Modal::Register);
        assert!(!modals.is_open(&Modal::Login));
        modals.close();
        assert!(modals.current().is_none());
    }

    #[test]
    fn test_settings_round_trip_through_state() {
        let settings = AppSettings {
            theme: ThemeMode::Dark,
            view_mode: ViewMode::List,
            ..AppSettings::default()
        };
        let mut state = AppState::from_settings(&settings);
        state.ui.toggle_sidebar();
        assert!(!state.ui.sidebar_open());

        let mut stored = AppSettings::default();
        state.store_settings(&mut stored);
        assert_eq!(stored.theme, ThemeMode::Dark);
        assert_eq!(stored.view_mode, ViewMode::List);
    }
}
