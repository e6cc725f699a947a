//! Triage queue decisions.

use zenwatch_api::types::{ContentKind, TriageBatch};

use super::{content_plan, patch_engagement, remove_from_feeds};
use crate::cache::keys;
use crate::error::Result;
use crate::mutation::run_optimistic;
use crate::zenwatch::ZenWatch;

impl ZenWatch {
    /// Rejects an article in triage.
    ///
    /// The article leaves the batch (and the feeds) and `remaining_count`
    /// drops by one.
    ///
    /// # Errors
    ///
    /// Returns the request error after rolling back.
    pub async fn triage_dismiss(&self, article_id: &str) -> Result<()> {
        let plan = content_plan("triage_dismiss", ContentKind::Article, article_id)
            .on_error("Could not dismiss article");
        run_optimistic(
            &self.cache,
            &self.notifier,
            plan,
            |cache| {
                remove_from_feeds(cache, ContentKind::Article, article_id);
                patch_engagement(cache, ContentKind::Article, article_id, |e| {
                    e.is_dismissed = true;
                });
            },
            self.api.triage_dismiss(article_id),
        )
        .await
    }

    /// Keeps an article from triage: it leaves the batch and is saved to the library.
    ///
    /// # Errors
    ///
    /// Returns the request error after rolling back.
    pub async fn triage_bookmark(&self, article_id: &str) -> Result<()> {
        let plan = content_plan("triage_bookmark", ContentKind::Article, article_id)
            .on_success("Saved to library")
            .on_error("Could not save article");
        run_optimistic(
            &self.cache,
            &self.notifier,
            plan,
            |cache| {
                patch_engagement(cache, ContentKind::Article, article_id, |e| {
                    e.is_bookmarked = true;
                });
                cache.update::<TriageBatch>(&keys::triage(), |batch| {
                    batch.take(article_id);
                });
            },
            self.api.triage_bookmark(article_id),
        )
        .await
    }
}
