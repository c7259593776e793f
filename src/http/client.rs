//! HTTP client that captures status, body and round-trip time.

use log::debug;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};

/// User agent sent with every request.
pub const USER_AGENT: &str = concat!("judge0-client/", env!("CARGO_PKG_VERSION"));

/// A fully read response.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub body: String,
    pub elapsed: Duration,
}

impl HttpResponse {
    pub fn json<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_str(&self.body)
    }

    /// Round-trip time in milliseconds, rounded to two decimals.
    pub fn elapsed_ms(&self) -> f64 {
        round_ms(self.elapsed)
    }
}

pub(crate) fn round_ms(elapsed: Duration) -> f64 {
    (elapsed.as_secs_f64() * 100_000.0).round() / 100.0
}

#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Creates a new HTTP client wrapping the given reqwest Client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a client whose requests time out after `timeout`.
    pub fn with_timeout(timeout: Duration) -> reqwest::Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self::new(client))
    }

    /// Returns a reference to the underlying reqwest Client.
    pub fn inner(&self) -> &Client {
        &self.client
    }

    /// Sends the request and reads the whole body.
    ///
    /// Only transport failures are errors; every HTTP status is returned as a
    /// response for the caller to interpret.
    pub async fn send(&self, request: RequestBuilder) -> reqwest::Result<HttpResponse> {
        let start = Instant::now();
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        let elapsed = start.elapsed();

        debug!(
            "HTTP {} ({} bytes) in {:.2}ms",
            status,
            body.len(),
            round_ms(elapsed)
        );

        Ok(HttpResponse {
            status,
            body,
            elapsed,
        })
    }
}
