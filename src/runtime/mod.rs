//! Runtime abstraction for process-level operations.
//!
//! Configuration and the CLI never touch `std::env` or the file system
//! directly; they go through [`Runtime`] so tests can substitute a mock.
//!
//! - `env` - Environment variables
//! - `fs` - Reading source files

mod env;
mod fs;

use anyhow::Result;
use std::env as std_env;
use std::path::Path;

#[cfg_attr(test, mockall::automock)]
pub trait Runtime: Send + Sync {
    // Environment
    fn env_var(&self, key: &str) -> Result<String, std_env::VarError>;

    // File System
    fn read_to_string(&self, path: &Path) -> Result<String>;
}

pub struct RealRuntime;

impl Runtime for RealRuntime {
    fn env_var(&self, key: &str) -> Result<String, std_env::VarError> {
        self.env_var_impl(key)
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        self.read_to_string_impl(path)
    }
}

/// Looks up `key` and returns it only when set to a non-empty value.
pub fn non_empty_env<R: Runtime + ?Sized>(runtime: &R, key: &str) -> Option<String> {
    runtime.env_var(key).ok().filter(|value| !value.is_empty())
}
