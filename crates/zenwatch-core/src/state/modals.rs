//! Modal dialogs.

use zenwatch_api::types::ContentKind;

/// A dialog that can be shown over the current screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Modal {
    /// Email/password login.
    Login,
    /// Account creation.
    Register,
    /// Comment thread of one article or video.
    Comments {
        /// Content kind.
        kind: ContentKind,
        /// Content identifier.
        content_id: String,
    },
    /// Add a personalization keyword.
    AddKeyword,
    /// Create (`None`) or edit a scraping source.
    EditSource(Option<i64>),
    /// Confirm a destructive action.
    Confirm(String),
}

/// At most one open modal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModalState {
    current: Option<Modal>,
}

impl ModalState {
    /// Opens `modal`, replacing any open one.
    pub fn open(&mut self, modal: Modal) {
        self.current = Some(modal);
    }

    /// Closes the open modal.
    pub fn close(&mut self) {
        self.current = None;
    }

    /// Returns true if `modal` is the one open.
    #[must_use]
    pub fn is_open(&self, modal: &Modal) -> bool {
        self.current.as_ref() == Some(modal)
    }

    /// The open modal.
    #[must_use]
    pub const fn current(&self) -> Option<&Modal> {
        self.current.as_ref()
    }
}
