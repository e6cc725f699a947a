//! Manual scrape runs.

use zenwatch_api::types::{ContentKind, ScrapeRequest, TaskState};

use crate::cache::keys;
use crate::error::Result;
use crate::scrape::{PollConfig, PollOutcome, poll_task, report_outcome};
use crate::zenwatch::ZenWatch;

impl ZenWatch {
    /// Starts a scrape and follows it until it finishes or polling gives up.
    ///
    /// When new content was saved the feeds and scraping views are refreshed.
    ///
    /// # Errors
    ///
    /// Returns an error if the scrape cannot be started or a status request
    /// fails with anything but 404.
    pub async fn trigger_and_watch(
        &self,
        request: &ScrapeRequest,
        config: &PollConfig,
    ) -> Result<PollOutcome> {
        let task = match self.api.trigger_scrape(request).await {
            Ok(task) => task,
            Err(e) => {
                self.notifier.error(format!("Could not start scrape: {e}"));
                return Err(e.into());
            }
        };
        self.notifier.info("Scrape started");

        let outcome = poll_task(&self.api, &task.task_id, config).await?;
        report_outcome(&self.notifier, &outcome);

        if let PollOutcome::Finished { status, .. } = &outcome
            && matches!(status.status, TaskState::Success | TaskState::PartialSuccess)
        {
            self.cache.invalidate(&keys::feed(ContentKind::Article));
            self.cache.invalidate(&keys::feed(ContentKind::Video));
            self.cache.invalidate(&keys::triage());
            self.cache.invalidate(&keys::scraping());
        }
        Ok(outcome)
    }
}
