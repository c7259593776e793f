use anyhow::Result;
use std::io::Write;

use crate::judge0::{self, ExecutionApi};

use super::write_json;

/// Probes the server and prints `healthy`/`unhealthy`, or the full report
/// with `details`. Returns whether the server is healthy.
#[tracing::instrument(skip(api, out))]
pub async fn health<A: ExecutionApi + ?Sized, W: Write>(
    api: &A,
    details: bool,
    out: &mut W,
) -> Result<bool> {
    let report = judge0::health_report(api).await;

    if details {
        write_json(out, &report)?;
    } else if report.healthy {
        writeln!(out, "healthy")?;
    } else {
        writeln!(out, "unhealthy")?;
    }
    Ok(report.healthy)
}
