//! Background scrape tasks.
//!
//! Triggering a scrape returns a task id immediately; the client then polls
//! the task status at a fixed interval until it reaches a terminal state or
//! the attempt budget runs out.

mod poller;

pub use poller::{
    MAX_POLL_ATTEMPTS, POLL_INTERVAL, PollConfig, PollOutcome, poll_task, report_outcome,
};
