//! Waiting for submissions to finish.

use log::{debug, error, info, warn};
use std::time::Duration;
use tokio::time::Instant;

use crate::error::{Judge0Error, Result};

use super::client::ExecutionApi;
use super::types::{Execution, SubmissionRequest, SubmissionResult};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Polls `token` until its status leaves "In Queue"/"Processing".
///
/// Every poll, successful or not, is followed by a `poll_interval` sleep that
/// counts against `max_wait`, and the loop also stops once `max_wait` of wall
/// clock time has passed since the first poll. A failed fetch is logged and
/// polling goes on; the wait only ends on a terminal status or a
/// [`Timeout`](crate::error::ErrorKind::Timeout) error.
#[tracing::instrument(skip(api))]
pub async fn wait_for_completion<A: ExecutionApi + ?Sized>(
    api: &A,
    token: &str,
    max_wait: Duration,
    poll_interval: Duration,
) -> Result<SubmissionResult> {
    if poll_interval.is_zero() {
        return Err(Judge0Error::configuration("Poll interval must be greater than zero")
            .with_config_key("poll_interval"));
    }
    if max_wait.is_zero() {
        return Err(Judge0Error::configuration("Max wait must be greater than zero")
            .with_config_key("max_wait"));
    }

    info!(
        "Waiting for submission {} (max_wait={}s, poll_interval={}s)",
        token,
        max_wait.as_secs_f64(),
        poll_interval.as_secs_f64()
    );

    let start = Instant::now();
    // No wall-clock bound when `max_wait` runs past the clock's range.
    let deadline = start.checked_add(max_wait);
    let mut waited = Duration::ZERO;
    let mut polls: u32 = 0;
    let mut last_status: Option<String> = None;
    let mut last_status_id: Option<i64> = None;

    while waited < max_wait && deadline.is_none_or(|deadline| Instant::now() < deadline) {
        polls += 1;

        match api.fetch(token, &[]).await {
            Ok(result) => {
                let status_id = result.status_id();
                let description = result.status_description().unwrap_or("Unknown");

                if polls == 1 || last_status.as_deref() != Some(description) {
                    debug!(
                        "Poll {}: status={} (id={:?}), waited={:.1}s",
                        polls,
                        description,
                        status_id,
                        waited.as_secs_f64()
                    );
                }
                last_status = Some(description.to_string());
                last_status_id = status_id;

                if result.is_terminal() {
                    info!(
                        "Submission {} completed (final_status={}, polls={}, total_time_sec={:.2})",
                        token,
                        description,
                        polls,
                        start.elapsed().as_secs_f64()
                    );
                    return Ok(result);
                }
            }
            Err(e) => {
                warn!("Error during poll {}: {}. Continuing...", polls, e);
            }
        }

        tokio::time::sleep(poll_interval).await;
        waited = waited.saturating_add(poll_interval);
    }

    error!(
        "Submission {} timed out (max_wait={}s, polls={}, last_status={:?}, last_status_id={:?})",
        token,
        max_wait.as_secs_f64(),
        polls,
        last_status,
        last_status_id
    );

    Err(Judge0Error::timeout(format!(
        "Submission {} did not complete within {}s. Last status: {} (id={}). Total polls: {}",
        token,
        max_wait.as_secs_f64(),
        last_status.as_deref().unwrap_or("none"),
        last_status_id.map_or_else(|| "none".to_string(), |id| id.to_string()),
        polls
    ))
    .with_token(token)
    .with_max_wait(max_wait.as_secs_f64())
    .with_polls(polls)
    .with_last_status(last_status.as_deref(), last_status_id))
}

/// Submits `request`, then either waits for the result or hands back the token.
#[tracing::instrument(skip(api, request))]
pub async fn execute<A: ExecutionApi + ?Sized>(
    api: &A,
    request: &SubmissionRequest,
    wait: bool,
    max_wait: Duration,
    poll_interval: Duration,
) -> Result<Execution> {
    let start = Instant::now();
    let token = api.submit(request).await?;

    if !wait {
        return Ok(Execution::Pending { token });
    }

    let result = wait_for_completion(api, &token, max_wait, poll_interval).await?;
    info!(
        "Execute operation completed (token={}, total_time_sec={:.2})",
        token,
        start.elapsed().as_secs_f64()
    );
    Ok(Execution::Completed(result))
}
