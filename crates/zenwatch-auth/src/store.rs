//! Shared access-token storage.
//!
//! The store is the single place the current bearer token lives. The API
//! client reads it on every request and replaces it after a refresh; the
//! application state subscribes to [`SessionEvent`]s to follow logins,
//! refreshes and forced logouts.

use std::sync::{Arc, PoisonError, RwLock};

use tokio::sync::broadcast;
use tracing::debug;

use crate::token::AccessToken;

/// Lifecycle events of the current session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// A token was stored after login, registration or OAuth callback.
    SignedIn,
    /// The token was replaced by a refresh.
    Refreshed,
    /// The user logged out.
    SignedOut,
    /// Refresh failed; the session is gone and the user must log in again.
    Expired,
}

/// Cloneable handle to the current access token.
#[derive(Debug, Clone)]
pub struct TokenStore {
    token: Arc<RwLock<Option<AccessToken>>>,
    events: broadcast::Sender<SessionEvent>,
}

impl Default for TokenStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            token: Arc::new(RwLock::new(None)),
            events,
        }
    }

    /// Creates a store holding `token` without emitting an event.
    #[must_use]
    pub fn with_token(token: AccessToken) -> Self {
        let store = Self::new();
        *store.token.write().unwrap_or_else(PoisonError::into_inner) = Some(token);
        store
    }

    /// Returns a copy of the current token.
    #[must_use]
    pub fn get(&self) -> Option<AccessToken> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns true if a token is present.
    #[must_use]
    pub fn is_signed_in(&self) -> bool {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Stores a freshly issued token.
    pub fn set(&self, token: AccessToken) {
        self.replace(Some(token), SessionEvent::SignedIn);
    }

    /// Replaces the token after a refresh.
    pub fn refreshed(&self, token: AccessToken) {
        self.replace(Some(token), SessionEvent::Refreshed);
    }

    /// Clears the token after an explicit logout.
    pub fn sign_out(&self) {
        self.replace(None, SessionEvent::SignedOut);
    }

    /// Clears the token after a failed refresh.
    pub fn expire(&self) {
        self.replace(None, SessionEvent::Expired);
    }

    /// Subscribes to session events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    fn replace(&self, token: Option<AccessToken>, event: SessionEvent) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = token;
        debug!(?event, "Session changed");
        // No subscribers is fine
        let _ = self.events.send(event);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_store_roundtrip() {
        let store = TokenStore::new();
        assert!(!store.is_signed_in());

        store.set(AccessToken::bearer("abc"));
        assert_eq!(store.get().unwrap().value, "abc");

        store.sign_out();
        assert!(store.get().is_none());
    }

    #[test]
    fn test_clones_share_state() {
        let store = TokenStore::new();
        let other = store.clone();
        store.set(AccessToken::bearer("shared"));
        assert_eq!(other.get().unwrap().value, "shared");
    }

    #[test]
    fn test_events_are_published() {
        let store = TokenStore::new();
        let mut events = store.subscribe();

        store.set(AccessToken::bearer("a"));
        store.refreshed(AccessToken::bearer("b"));
        store.expire();

        tokio_test::block_on(async {
            assert_eq!(events.recv().await.unwrap(), SessionEvent::SignedIn);
            assert_eq!(events.recv().await.unwrap(), SessionEvent::Refreshed);
            assert_eq!(events.recv().await.unwrap(), SessionEvent::Expired);
        });
        assert!(!store.is_signed_in());
    }
}
