use anyhow::{Context, Result};
use log::debug;
use std::io::Write;
use std::time::Duration;

use crate::judge0::{self, Execution, ExecutionApi, SubmissionRequest};

use super::write_json;

/// Submits the request and prints the terminal result, or only the token
/// when `wait` is off.
#[tracing::instrument(skip(api, request, out))]
pub async fn run<A: ExecutionApi + ?Sized, W: Write>(
    api: &A,
    request: &SubmissionRequest,
    wait: bool,
    max_wait: Duration,
    poll_interval: Duration,
    out: &mut W,
) -> Result<()> {
    debug!("Running {} bytes of source as language {}", request.source_code.len(), request.language_id);

    let execution = judge0::execute(api, request, wait, max_wait, poll_interval)
        .await
        .context("Execution failed")?;

    match execution {
        Execution::Completed(result) => write_json(out, &result)?,
        Execution::Pending { token } => writeln!(out, "{}", token)?,
    }
    Ok(())
}

/// Submits the request and prints the token.
#[tracing::instrument(skip(api, request, out))]
pub async fn submit<A: ExecutionApi + ?Sized, W: Write>(
    api: &A,
    request: &SubmissionRequest,
    out: &mut W,
) -> Result<()> {
    let token = api.submit(request).await.context("Submission failed")?;
    writeln!(out, "{}", token)?;
    Ok(())
}
