//! Command implementations behind the `judge0` binary.
//!
//! Each command talks to an [`ExecutionApi`](crate::judge0::ExecutionApi)
//! and writes its output to the given writer.

mod health;
mod languages;
mod run;
mod status;

pub use health::health;
pub use languages::languages;
pub use run::{run, submit};
pub use status::{status, wait};

use anyhow::{Context, Result, bail};
use serde::Serialize;
use serde_json::Value;
use std::io::Write;
use std::path::PathBuf;

use crate::judge0::SubmissionRequest;
use crate::runtime::Runtime;

/// What to submit, as given on the command line.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceOptions {
    pub file: PathBuf,
    pub language_id: i64,
    pub stdin: Option<String>,
    pub expected_output: Option<String>,
    /// Extra submission fields as `KEY=VALUE`.
    pub params: Vec<String>,
}

/// Reads the source file and assembles the submission.
#[tracing::instrument(skip(runtime))]
pub fn build_request<R: Runtime + ?Sized>(
    runtime: &R,
    options: &SourceOptions,
) -> Result<SubmissionRequest> {
    let source = runtime
        .read_to_string(&options.file)
        .with_context(|| format!("Failed to read source file {}", options.file.display()))?;

    let mut request = SubmissionRequest::new(source, options.language_id);
    if let Some(stdin) = &options.stdin {
        request = request.stdin(stdin.clone());
    }
    if let Some(expected) = &options.expected_output {
        request = request.expected_output(expected.clone());
    }
    for raw in &options.params {
        let (key, value) = parse_param(raw)?;
        request = request.param(key, value);
    }
    Ok(request)
}

/// Parses `KEY=VALUE`. The value is taken as JSON when it parses as JSON,
/// otherwise as a plain string.
pub fn parse_param(raw: &str) -> Result<(String, Value)> {
    let Some((key, value)) = raw.split_once('=') else {
        bail!("Invalid parameter '{}': expected KEY=VALUE", raw);
    };
    let key = key.trim();
    if key.is_empty() {
        bail!("Invalid parameter '{}': empty key", raw);
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::from(value));
    Ok((key.to_string(), value))
}

fn write_json<W: Write, T: Serialize>(out: &mut W, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    writeln!(out, "{}", json)?;
    Ok(())
}
