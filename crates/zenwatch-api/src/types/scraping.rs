//! Scraping jobs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Body of a manual scrape trigger.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapeRequest {
    /// Source names to scrape; empty means all active sources.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<String>,
}

/// State of a scrape task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskState {
    /// Queued, not started.
    Pending,
    /// In progress.
    Running,
    /// Finished without errors.
    Success,
    /// Finished, some sources failed.
    PartialSuccess,
    /// Finished, nothing saved.
    Failed,
}

impl TaskState {
    /// Returns true once the task will not change any more.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Success | Self::PartialSuccess | Self::Failed)
    }
}

/// Acknowledgement of a scrape trigger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapeTask {
    /// Task to poll.
    pub task_id: String,
    /// Initial state.
    pub status: TaskState,
    /// Server message.
    #[serde(default)]
    pub message: Option<String>,
}

/// Current status of a scrape task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskStatus {
    /// Task identifier.
    pub task_id: String,
    /// Current state.
    pub status: TaskState,
    /// Articles saved so far.
    #[serde(default)]
    pub articles_saved: Option<u32>,
    /// Videos saved so far.
    #[serde(default)]
    pub videos_saved: Option<u32>,
    /// Per-source error messages.
    #[serde(default)]
    pub errors: Vec<String>,
    /// Start time.
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    /// End time.
    #[serde(default)]
    pub finished_at: Option<DateTime<Utc>>,
}

/// A past scrape run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapeRun {
    /// Identifier.
    pub id: i64,
    /// Final or current state.
    pub status: TaskState,
    /// Articles saved.
    #[serde(default)]
    pub articles_saved: u32,
    /// What started it ("manual", "schedule").
    #[serde(default)]
    pub trigger: Option<String>,
    /// Start time.
    pub started_at: DateTime<Utc>,
    /// End time.
    #[serde(default)]
    pub finished_at: Option<DateTime<Utc>>,
}

/// Aggregate scraping statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapeStats {
    /// Articles stored.
    #[serde(default)]
    pub total_articles: u64,
    /// Videos stored.
    #[serde(default)]
    pub total_videos: u64,
    /// Articles saved today.
    #[serde(default)]
    pub articles_today: u64,
    /// Runs recorded.
    #[serde(default)]
    pub total_runs: u64,
    /// Last finished run.
    #[serde(default)]
    pub last_run_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_task_state_wire_names() {
        let status: TaskStatus = serde_json::from_str(
            r#"{"task_id":"t1","status":"partial_success","articles_saved":5}"#,
        )
        .unwrap();
        assert_eq!(status.status, TaskState::PartialSuccess);
        assert!(status.status.is_terminal());
        assert_eq!(status.articles_saved, Some(5));
        assert!(!TaskState::Running.is_terminal());
    }
}
