//! Polling an asynchronous merge task until it settles.

use std::time::Duration;

use tracing::{debug, info, warn};

use super::client::ApiClient;
use super::types::StatusResponse;
use crate::config::{DEFAULT_MAX_POLLS, DEFAULT_POLL_INTERVAL};
use crate::error::{MergerError, Result};

/// Repeatedly checks a task's status at a fixed interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusPoller {
    interval: Duration,
    max_attempts: u32,
}

impl Default for StatusPoller {
    fn default() -> Self {
        Self::new(DEFAULT_POLL_INTERVAL, DEFAULT_MAX_POLLS)
    }
}

impl StatusPoller {
    /// Create a poller. `max_attempts` is raised to at least one.
    pub fn new(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts: max_attempts.max(1),
        }
    }

    /// Delay between two status checks.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Maximum number of status checks.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Poll `task_id` until it completes, fails, or the attempts run out.
    ///
    /// `on_update` sees every status response, including the final one.
    /// Errors from the status endpoint end polling immediately.
    pub async fn wait_for_completion<F>(
        &self,
        client: &ApiClient,
        task_id: &str,
        mut on_update: F,
    ) -> Result<StatusResponse>
    where
        F: FnMut(&StatusResponse),
    {
        for attempt in 1..=self.max_attempts {
            if attempt > 1 {
                tokio::time::sleep(self.interval).await;
            }

            let status = client.check_status(task_id).await?;
            debug!(task_id, attempt, status = %status.status, progress = ?status.progress, "Task status");
            on_update(&status);

            if status.is_complete() {
                info!(task_id, attempts = attempt, "Task completed");
                return Ok(status);
            }
            if status.is_failed() {
                let message = status
                    .message
                    .clone()
                    .unwrap_or_else(|| format!("task {task_id} {}", status.status));
                warn!(task_id, %message, "Task failed");
                return Err(MergerError::api(message));
            }
        }

        Err(MergerError::PollExhausted {
            task_id: task_id.to_string(),
            attempts: self.max_attempts,
        })
    }
}
