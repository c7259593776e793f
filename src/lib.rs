pub mod commands;
pub mod config;
pub mod error;
pub mod http;
pub mod judge0;
pub mod runtime;

pub use config::Judge0Config;
pub use error::{ErrorKind, Judge0Error};
pub use judge0::{ExecutionApi, Execution, Judge0Client, SubmissionRequest, SubmissionResult};
