//! # zenwatch-core
//!
//! Client logic for the `ZenWatch` news aggregator.
//!
//! This crate provides:
//! - **Query cache** - keyed query results, one in-flight fetch per key, invalidation
//! - **Optimistic mutations** - apply locally, dispatch, roll back snapshots on failure
//! - **Actions** - favorites, bookmarks, reactions, library, triage, keywords, comments, admin
//! - **Comment trees** - nested replies from flat comment lists
//! - **Scrape polling** - watch a background scrape until it finishes
//! - **App state** - auth, UI and modal state with explicit setters
//! - **Notifications** - toast messages for mutation results
//! - **Validation** - field-level checks for forms
//! - **Settings** - persisted preferences

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod actions;
pub mod cache;
pub mod comments;
mod error;
pub mod mutation;
pub mod notify;
mod queries;
pub mod scrape;
pub mod settings;
pub mod state;
pub mod validation;
mod zenwatch;

pub use cache::{QueryCache, QueryError, QueryKey, Snapshot, keys};
pub use comments::{CommentNode, build_tree};
pub use error::{Error, Result};
pub use mutation::{MutationPlan, run_optimistic};
pub use notify::{Notifier, Toast, ToastLevel};
pub use scrape::{PollConfig, PollOutcome, poll_task};
pub use settings::AppSettings;
pub use state::{AppState, AuthState, Modal, ModalState, Route, ThemeMode, UiState, ViewMode};
pub use validation::{ValidationError, ValidationResult};
pub use zenwatch::ZenWatch;
