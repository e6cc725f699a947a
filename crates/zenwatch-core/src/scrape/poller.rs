//! Task status poller.

use std::time::Duration;

use tracing::{debug, info};
use zenwatch_api::TaskStatusSource;
use zenwatch_api::types::{TaskState, TaskStatus};

use crate::error::Result;
use crate::notify::Notifier;

/// Delay before each status request.
pub const POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Number of status requests before giving up.
pub const MAX_POLL_ATTEMPTS: u32 = 60;

/// Polling schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    /// Delay before each attempt.
    pub interval: Duration,
    /// Maximum number of attempts.
    pub max_attempts: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: POLL_INTERVAL,
            max_attempts: MAX_POLL_ATTEMPTS,
        }
    }
}

/// How polling ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// The task reached `success`, `partial_success` or `failed`.
    Finished {
        /// Final status.
        status: TaskStatus,
        /// Number of status requests made.
        attempts: u32,
    },
    /// The task was still running after the last attempt.
    ///
    /// Not an error: the scrape keeps going on the server.
    TimedOut {
        /// Number of status requests made.
        attempts: u32,
    },
}

/// Polls `task_id` until it finishes or the attempt budget is spent.
///
/// `pending` and `running` reschedule. A 404 means the task is not
/// registered yet and is retried within the same budget.
///
/// # Errors
///
/// Returns any other request failure; polling stops at the first one.
pub async fn poll_task<S>(source: &S, task_id: &str, config: &PollConfig) -> Result<PollOutcome>
where
    S: TaskStatusSource + Sync,
{
    for attempt in 1..=config.max_attempts {
        tokio::time::sleep(config.interval).await;

        match source.task_status(task_id).await {
            Ok(status) if status.status.is_terminal() => {
                info!(task_id, attempt, state = ?status.status, "Scrape task finished");
                return Ok(PollOutcome::Finished {
                    status,
                    attempts: attempt,
                });
            }
            Ok(status) => {
                debug!(task_id, attempt, state = ?status.status, "Scrape task still running");
            }
            Err(e) if e.is_not_found() => {
                debug!(task_id, attempt, "Scrape task not registered yet");
            }
            Err(e) => return Err(e.into()),
        }
    }

    info!(task_id, attempts = config.max_attempts, "Stopped polling scrape task");
    Ok(PollOutcome::TimedOut {
        attempts: config.max_attempts,
    })
}

/// Tells the user how a scrape ended.
pub fn report_outcome(notifier: &Notifier, outcome: &PollOutcome) {
    match outcome {
        PollOutcome::Finished { status, .. } => {
            let saved = saved_summary(status);
            match status.status {
                TaskState::Success => notifier.success(format!("Scrape finished: {saved}")),
                TaskState::PartialSuccess => notifier.warning(format!(
                    "Scrape partially succeeded: {saved}, {} errors",
                    status.errors.len()
                )),
                _ => notifier.error(format!(
                    "Scrape failed: {}",
                    status.errors.first().map_or("unknown error", String::as_str)
                )),
            }
        }
        PollOutcome::TimedOut { .. } => {
            notifier.info("Scrape is still running in the background, check back later");
        }
    }
}

fn saved_summary(status: &TaskStatus) -> String {
    match (status.articles_saved, status.videos_saved) {
        (Some(a), Some(v)) => format!("{a} articles and {v} videos saved"),
        (Some(a), None) => format!("{a} articles saved"),
        (None, Some(v)) => format!("{v} videos saved"),
        (None, None) => "nothing new saved".to_string(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::VecDeque;
    use std::future::{Future, ready};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;
    use crate::error::Error;
    use crate::notify::ToastLevel;

    struct Scripted {
        responses: Mutex<VecDeque<zenwatch_api::Result<TaskStatus>>>,
        calls: AtomicU32,
    }

    impl Scripted {
        fn new(responses: Vec<zenwatch_api::Result<TaskStatus>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                calls: AtomicU32::new(0),
            }
        }
    }

    impl TaskStatusSource for Scripted {
        fn task_status(
            &self,
            _task_id: &str,
        ) -> impl Future<Output = zenwatch_api::Result<TaskStatus>> + Send {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let next = self
                .responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(status(TaskState::Running, None)));
            ready(next)
        }
    }

    fn status(state: TaskState, saved: Option<u32>) -> TaskStatus {
        TaskStatus {
            task_id: "t1".into(),
            status: state,
            articles_saved: saved,
            videos_saved: None,
            errors: Vec::new(),
            started_at: None,
            finished_at: None,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_finishes_after_running_polls() {
        let source = Scripted::new(vec![
            Ok(status(TaskState::Running, None)),
            Ok(status(TaskState::Running, None)),
            Ok(status(TaskState::Success, Some(5))),
        ]);
        let started = tokio::time::Instant::now();

        let outcome = poll_task(&source, "t1", &PollConfig::default()).await.unwrap();

        let PollOutcome::Finished { status, attempts } = outcome else {
            panic!("expected finished, got {outcome:?}");
        };
        assert_eq!(attempts, 3);
        assert_eq!(status.articles_saved, Some(5));
        assert_eq!(source.calls.load(Ordering::SeqCst), 3);
        assert_eq!(started.elapsed(), POLL_INTERVAL * 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_times_out_without_error() {
        let source = Scripted::new(Vec::new());
        let notifier = Notifier::new();
        let mut toasts = notifier.subscribe();

        let outcome = poll_task(&source, "t1", &PollConfig::default()).await.unwrap();
        report_outcome(&notifier, &outcome);

        assert_eq!(outcome, PollOutcome::TimedOut { attempts: MAX_POLL_ATTEMPTS });
        assert_eq!(source.calls.load(Ordering::SeqCst), MAX_POLL_ATTEMPTS);
        assert_eq!(toasts.recv().await.unwrap().level, ToastLevel::Info);
    }

    #[tokio::test(start_paused = true)]
    async fn test_not_found_is_retried() {
        let source = Scripted::new(vec![
            Err(zenwatch_api::Error::Status {
                status: 404,
                message: "Task not found".into(),
            }),
            Ok(status(TaskState::PartialSuccess, Some(2))),
        ]);

        let outcome = poll_task(&source, "t1", &PollConfig::default()).await.unwrap();
        assert!(matches!(outcome, PollOutcome::Finished { attempts: 2, .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_other_errors_abort() {
        let source = Scripted::new(vec![Err(zenwatch_api::Error::Status {
            status: 500,
            message: "boom".into(),
        })]);

        let err = poll_task(&source, "t1", &PollConfig::default()).await.unwrap_err();
        assert!(matches!(err, Error::Api(_)));
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_report_levels() {
        let notifier = Notifier::new();
        let mut toasts = notifier.subscribe();

        let mut failed = status(TaskState::Failed, None);
        failed.errors.push("source unreachable".into());
        for (state, expected) in [
            (status(TaskState::Success, Some(5)), ToastLevel::Success),
            (status(TaskState::PartialSuccess, Some(1)), ToastLevel::Warning),
            (failed, ToastLevel::Error),
        ] {
            report_outcome(&notifier, &PollOutcome::Finished { status: state, attempts: 1 });
            let toast = toasts.recv().await.unwrap();
            assert_eq!(toast.level, expected);
        }
    }
}
