//! Triage queue.

use serde::{Deserialize, Serialize};

use super::Article;

/// A batch of unseen articles to accept or reject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriageBatch {
    /// Articles in this batch, front first.
    pub articles: Vec<Article>,
    /// Unseen articles left, including this batch.
    pub remaining_count: u64,
}

impl TriageBatch {
    /// Removes an article from the batch and counts it as handled.
    ///
    /// Returns false if the article was not in the batch.
    pub fn take(&mut self, article_id: &str) -> bool {
        let before = self.articles.len();
        self.articles.retain(|a| a.id != article_id);
        if self.articles.len() == before {
            return false;
        }
        self.remaining_count = self.remaining_count.saturating_sub(1);
        true
    }
}
