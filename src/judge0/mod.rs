//! Client for the Judge0 code execution API.
//!
//! # Structure
//!
//! - `client` - [`ExecutionApi`] trait and its HTTP implementation [`Judge0Client`]
//! - `poll` - waiting for a submission to reach a terminal status
//! - `health` - liveness probe that never fails
//! - `types` - request and response types

mod client;
mod health;
mod poll;
mod types;

pub use client::{ExecutionApi, Judge0Client};
pub use health::{HEALTH_CHECK_TIMEOUT, HealthReport, health_check, health_report};
pub use poll::{DEFAULT_POLL_INTERVAL, execute, wait_for_completion};
pub use types::{
    About, DEFAULT_LANGUAGE_ID, Execution, Language, StatusKind, SubmissionRequest,
    SubmissionResult,
};

#[cfg(test)]
pub use client::MockExecutionApi;
