//! Liveness probe against `GET /about`.

use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use crate::http::client::round_ms;

use super::client::ExecutionApi;

/// Fixed request timeout for health checks, independent of the configured
/// request timeout.
pub const HEALTH_CHECK_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthReport {
    pub healthy: bool,
    pub api_url: String,
    pub error: Option<String>,
    pub version: Option<String>,
    pub response_time_ms: Option<f64>,
}

/// Probes the server. Every failure is folded into the report.
pub async fn health_report<A: ExecutionApi + ?Sized>(api: &A) -> HealthReport {
    let mut report = HealthReport {
        healthy: false,
        api_url: api.api_url().to_string(),
        error: None,
        version: None,
        response_time_ms: None,
    };

    let start = Instant::now();
    match api.about().await {
        Ok(about) => {
            report.healthy = true;
            report.response_time_ms = Some(round_ms(start.elapsed()));
            report.version = about.version;
            info!(
                "Health check passed (response_time_ms={:?}, version={:?})",
                report.response_time_ms, report.version
            );
        }
        Err(e) => {
            // A status code means the server answered.
            if let Some(code) = e.status_code() {
                report.response_time_ms = Some(round_ms(start.elapsed()));
                report.error = Some(format!("Status {}", code));
            } else {
                report.error = Some(e.to_string());
            }
            warn!("Health check failed: {}", e);
        }
    }

    report
}

/// `true` when the server answered `/about` successfully.
pub async fn health_check<A: ExecutionApi + ?Sized>(api: &A) -> bool {
    health_report(api).await.healthy
}
