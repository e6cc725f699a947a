//! Scraping jobs.

use std::future::Future;

use crate::client::{ApiClient, ApiRequest};
use crate::error::Result;
use crate::types::{ScrapeRequest, ScrapeRun, ScrapeStats, ScrapeTask, TaskStatus};

/// Anything that can report the status of a scrape task.
///
/// Implemented by [`ApiClient`]; pollers take this trait so they can be
/// driven by scripted statuses.
pub trait TaskStatusSource {
    /// Looks up the current status of `task_id`.
    fn task_status(&self, task_id: &str) -> impl Future<Output = Result<TaskStatus>> + Send;
}

impl TaskStatusSource for ApiClient {
    fn task_status(&self, task_id: &str) -> impl Future<Output = Result<TaskStatus>> + Send {
        self.scrape_status(task_id)
    }
}

impl ApiClient {
    /// Starts a scrape in the background.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails (403 for non-admins).
    pub async fn trigger_scrape(&self, request: &ScrapeRequest) -> Result<ScrapeTask> {
        self.send(ApiRequest::post("api/scraping/trigger").json(request)?)
            .await
    }

    /// Current status of a scrape task.
    ///
    /// # Errors
    ///
    /// Returns `Status { status: 404, .. }` while the task is not yet known.
    pub async fn scrape_status(&self, task_id: &str) -> Result<TaskStatus> {
        self.send(ApiRequest::get(format!("api/scraping/status/{task_id}")))
            .await
    }

    /// Recent scrape runs, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn scrape_history(&self, limit: u32) -> Result<Vec<ScrapeRun>> {
        self.send(
            ApiRequest::get("api/scraping/history")
                .query(vec![("limit".to_string(), limit.to_string())]),
        )
        .await
    }

    /// Aggregate scraping statistics.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn scrape_stats(&self) -> Result<ScrapeStats> {
        self.send(ApiRequest::get("api/scraping/stats")).await
    }
}
