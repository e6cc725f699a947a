//! Toast notifications.
//!
//! Mutations report their outcome here; whatever front end is running
//! subscribes and renders the toasts. Every toast is also logged.

use tokio::sync::broadcast;
use tracing::{info, warn};

/// Severity of a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    /// Action succeeded.
    Success,
    /// Neutral information.
    Info,
    /// Partial success or something worth attention.
    Warning,
    /// Action failed.
    Error,
}

/// A user-facing notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    /// Severity.
    pub level: ToastLevel,
    /// Message text.
    pub message: String,
}

/// Broadcasts toasts to subscribers.
#[derive(Debug, Clone)]
pub struct Notifier {
    tx: broadcast::Sender<Toast>,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier {
    /// Creates a notifier with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(64);
        Self { tx }
    }

    /// Subscribes to future toasts.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Toast> {
        self.tx.subscribe()
    }

    /// Publishes a toast.
    pub fn notify(&self, level: ToastLevel, message: impl Into<String>) {
        let message = message.into();
        match level {
            ToastLevel::Success | ToastLevel::Info => info!(?level, "{message}"),
            ToastLevel::Warning | ToastLevel::Error => warn!(?level, "{message}"),
        }
        let _ = self.tx.send(Toast { level, message });
    }

    /// Publishes a success toast.
    pub fn success(&self, message: impl Into<String>) {
        self.notify(ToastLevel::Success, message);
    }

    /// Publishes an info toast.
    pub fn info(&self, message: impl Into<String>) {
        self.notify(ToastLevel::Info, message);
    }

    /// Publishes a warning toast.
    pub fn warning(&self, message: impl Into<String>) {
        self.notify(ToastLevel::Warning, message);
    }

    /// Publishes an error toast.
    pub fn error(&self, message: impl Into<String>) {
        self.notify(ToastLevel::Error, message);
    }
}
