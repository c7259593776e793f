//! HTTP plumbing: a thin reqwest wrapper and the retry combinator.

pub(crate) mod client;
pub mod retry;

pub use client::{HttpClient, HttpResponse};
pub use retry::{RetryPolicy, with_retry};
