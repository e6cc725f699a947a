//! Pagination envelope.

use serde::{Deserialize, Serialize};

/// One page of a paginated listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paginated<T> {
    /// Items on this page.
    pub items: Vec<T>,
    /// Total number of items across all pages.
    pub total: u64,
    /// 1-based page number.
    #[serde(default = "first_page")]
    pub page: u32,
    /// Page size.
    #[serde(default)]
    pub per_page: u32,
    /// Number of pages.
    #[serde(default)]
    pub pages: u32,
}

const fn first_page() -> u32 {
    1
}

impl<T> Paginated<T> {
    /// Returns true if another page follows this one.
    #[must_use]
    pub const fn has_more(&self) -> bool {
        self.page < self.pages
    }

    /// Removes every item matching `pred`, decrementing `total` once per removal.
    ///
    /// Returns the number of removed items.
    pub fn remove_where(&mut self, mut pred: impl FnMut(&T) -> bool) -> usize {
        let before = self.items.len();
        self.items.retain(|item| !pred(item));
        let removed = before - self.items.len();
        self.total = self.total.saturating_sub(removed as u64);
        removed
    }
}
