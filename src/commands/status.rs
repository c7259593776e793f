use anyhow::{Context, Result};
use log::debug;
use std::io::Write;
use std::time::Duration;

use crate::judge0::{self, ExecutionApi};

use super::write_json;

/// Fetches the current state of a submission once.
#[tracing::instrument(skip(api, out))]
pub async fn status<A: ExecutionApi + ?Sized, W: Write>(
    api: &A,
    token: &str,
    fields: Option<&str>,
    out: &mut W,
) -> Result<()> {
    let params: Vec<(String, String)> = fields
        .filter(|f| !f.trim().is_empty())
        .map(|f| vec![("fields".to_string(), f.trim().to_string())])
        .unwrap_or_default();
    debug!("Fetching submission {} with params {:?}", token, params);

    let result = api
        .fetch(token, &params)
        .await
        .with_context(|| format!("Failed to fetch submission {}", token))?;
    write_json(out, &result)
}

/// Polls a submission until it reaches a terminal status.
#[tracing::instrument(skip(api, out))]
pub async fn wait<A: ExecutionApi + ?Sized, W: Write>(
    api: &A,
    token: &str,
    max_wait: Duration,
    poll_interval: Duration,
    out: &mut W,
) -> Result<()> {
    let result = judge0::wait_for_completion(api, token, max_wait, poll_interval)
        .await
        .with_context(|| format!("Failed waiting for submission {}", token))?;
    write_json(out, &result)
}
