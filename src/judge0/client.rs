use async_trait::async_trait;
use log::{debug, error, info};
use reqwest::{StatusCode, Url};
use serde_json::Value;
use std::time::Duration;

use crate::config::Judge0Config;
use crate::error::{ErrorKind, Judge0Error, Result, truncate_response};
use crate::http::{HttpClient, HttpResponse, RetryPolicy, with_retry};
use crate::runtime::Runtime;

use super::health::{self, HEALTH_CHECK_TIMEOUT, HealthReport};
use super::poll::{self, DEFAULT_POLL_INTERVAL};
use super::types::{About, Execution, Language, SubmissionRequest, SubmissionResult};

/// The remote execution API.
///
/// [`Judge0Client`] talks HTTP; the polling and health helpers in this module
/// only need this trait, so they can be driven by a mock in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExecutionApi: Send + Sync {
    /// Creates a submission and returns its token.
    async fn submit(&self, request: &SubmissionRequest) -> Result<String>;
    /// Fetches the current state of a submission.
    async fn fetch(&self, token: &str, query: &[(String, String)]) -> Result<SubmissionResult>;
    async fn languages(&self) -> Result<Vec<Language>>;
    async fn about(&self) -> Result<About>;
    fn api_url(&self) -> &str;
}

pub struct Judge0Client {
    config: Judge0Config,
    http: HttpClient,
    submit_policy: RetryPolicy,
    fetch_policy: RetryPolicy,
}

impl Judge0Client {
    #[tracing::instrument(skip(config))]
    pub fn new(config: Judge0Config) -> Result<Self> {
        config.validate()?;

        let http = HttpClient::with_timeout(config.timeout()).map_err(|e| {
            Judge0Error::configuration("Failed to build HTTP client").with_source(e)
        })?;

        info!(
            "Initialized Judge0 client (api_url={}, timeout={}s, max_wait={}s)",
            config.api_url(),
            config.timeout().as_secs_f64(),
            config.max_wait().as_secs_f64()
        );

        Ok(Self {
            config,
            http,
            submit_policy: RetryPolicy::SUBMIT,
            fetch_policy: RetryPolicy::FETCH,
        })
    }

    /// Client configured from `JUDGE0_*` environment variables.
    pub fn from_env<R: Runtime + ?Sized>(runtime: &R) -> Result<Self> {
        Self::new(Judge0Config::from_env(runtime)?)
    }

    /// Replaces the retry policies used for submit and fetch.
    pub fn with_retry_policies(mut self, submit: RetryPolicy, fetch: RetryPolicy) -> Self {
        self.submit_policy = submit;
        self.fetch_policy = fetch;
        self
    }

    pub fn config(&self) -> &Judge0Config {
        &self.config
    }

    /// Polls until the submission leaves the queue. `max_wait` defaults to the
    /// configured maximum.
    pub async fn wait_for_completion(
        &self,
        token: &str,
        max_wait: Option<Duration>,
        poll_interval: Duration,
    ) -> Result<SubmissionResult> {
        let max_wait = max_wait.unwrap_or(self.config.max_wait());
        poll::wait_for_completion(self, token, max_wait, poll_interval).await
    }

    /// Submits `request` and, when `wait` is set, waits for the result.
    pub async fn execute(
        &self,
        request: &SubmissionRequest,
        wait: bool,
        max_wait: Option<Duration>,
    ) -> Result<Execution> {
        let max_wait = max_wait.unwrap_or(self.config.max_wait());
        poll::execute(self, request, wait, max_wait, DEFAULT_POLL_INTERVAL).await
    }

    /// `true` when `/about` answers with 200. Never fails.
    pub async fn health_check(&self) -> bool {
        health::health_check(self).await
    }

    /// Detailed liveness probe. Never fails.
    pub async fn health_report(&self) -> HealthReport {
        health::health_report(self).await
    }

    /// `{api_url}/submissions/{token}` with the token escaped as a single
    /// path segment.
    fn submission_url(&self, token: &str) -> Result<String> {
        if matches!(token, "" | "." | "..") {
            return Err(
                Judge0Error::validation(format!("Invalid submission token: '{}'", token))
                    .with_field("token"),
            );
        }

        let base = self.config.endpoint("/submissions");
        let mut url = Url::parse(&base).map_err(|e| {
            Judge0Error::configuration(format!("Invalid API URL: {}", base))
                .with_config_key("api_url")
                .with_source(e)
        })?;
        url.path_segments_mut()
            .map_err(|_| {
                Judge0Error::configuration(format!("API URL cannot take a path: {}", base))
                    .with_config_key("api_url")
            })?
            .push(token);
        Ok(url.to_string())
    }

    #[tracing::instrument(skip(self, request))]
    async fn submit_once(&self, request: &SubmissionRequest) -> Result<String> {
        let url = self.config.endpoint("/submissions");
        let headers = self.config.headers()?;

        info!(
            "Submitting code (language_id={}, code_length={}, has_stdin={}, has_expected_output={})",
            request.language_id,
            request.source_code.len(),
            !request.stdin.is_empty(),
            request.expected_output.as_deref().is_some_and(|e| !e.is_empty())
        );
        debug!("Code snippet: {}...", snippet(&request.source_code, 100));

        let response = self
            .http
            .send(self.http.inner().post(&url).headers(headers).json(&request.to_body()))
            .await
            .map_err(|e| {
                error!("Transport error during submission: {}", e);
                transport_error(ErrorKind::Submission, e, &url)
            })?;

        debug!(
            "Submission response received (status_code={}, response_time_ms={})",
            response.status.as_u16(),
            response.elapsed_ms()
        );

        if response.status != StatusCode::CREATED {
            error!(
                "Submission failed (status_code={}, response={})",
                response.status.as_u16(),
                snippet(&response.body, 500)
            );
            return Err(Judge0Error::submission(format!(
                "Submission failed with status {}",
                response.status.as_u16()
            ))
            .with_status_code(response.status.as_u16())
            .with_response_text(&response.body));
        }

        let token = extract_token(&response)?;
        info!(
            "Submission successful (token={}, response_time_ms={})",
            token,
            response.elapsed_ms()
        );
        Ok(token)
    }

    #[tracing::instrument(skip(self, query))]
    async fn fetch_once(&self, token: &str, query: &[(String, String)]) -> Result<SubmissionResult> {
        let url = self.submission_url(token)?;
        let headers = self.config.headers()?;

        debug!("Fetching submission: {}", token);

        let mut request = self.http.inner().get(&url).headers(headers);
        if !query.is_empty() {
            request = request.query(query);
        }

        let response = self.http.send(request).await.map_err(|e| {
            error!("Transport error fetching submission {}: {}", token, e);
            transport_error(ErrorKind::Client, e, &url).with_token(token)
        })?;

        if response.status != StatusCode::OK {
            error!(
                "Failed to get submission (token={}, status_code={}, response={})",
                token,
                response.status.as_u16(),
                snippet(&response.body, 500)
            );
            return Err(Judge0Error::client(format!(
                "Failed to get submission: {} - {}",
                response.status.as_u16(),
                truncate_response(&response.body)
            ))
            .with_status_code(response.status.as_u16())
            .with_token(token)
            .with_response_text(&response.body));
        }

        let result: SubmissionResult = response.json().map_err(|e| {
            Judge0Error::validation("Submission response is not a JSON object")
                .with_field("body")
                .with_token(token)
                .with_response_text(&response.body)
                .with_source(e)
        })?;

        debug!(
            "Submission fetched (token={}, status_id={:?}, status={:?}, response_time_ms={})",
            token,
            result.status_id(),
            result.status_description(),
            response.elapsed_ms()
        );

        Ok(result)
    }
}

#[async_trait]
impl ExecutionApi for Judge0Client {
    /// Retried with [`RetryPolicy::SUBMIT`] on transport failures only; a
    /// rejected or malformed response is never resubmitted.
    async fn submit(&self, request: &SubmissionRequest) -> Result<String> {
        with_retry(
            "submit",
            &self.submit_policy,
            Judge0Error::is_transport,
            || self.submit_once(request),
        )
        .await
    }

    /// Retried with [`RetryPolicy::FETCH`] on transport failures only.
    async fn fetch(&self, token: &str, query: &[(String, String)]) -> Result<SubmissionResult> {
        with_retry(
            "fetch",
            &self.fetch_policy,
            Judge0Error::is_transport,
            || self.fetch_once(token, query),
        )
        .await
    }

    #[tracing::instrument(skip(self))]
    async fn languages(&self) -> Result<Vec<Language>> {
        let url = self.config.endpoint("/languages");
        let headers = self.config.headers()?;

        debug!("Fetching available languages");

        let response = self
            .http
            .send(self.http.inner().get(&url).headers(headers))
            .await
            .map_err(|e| {
                error!("Transport error fetching languages: {}", e);
                transport_error(ErrorKind::Client, e, &url)
            })?;

        if response.status != StatusCode::OK {
            error!(
                "Failed to get languages: {} - {}",
                response.status.as_u16(),
                truncate_response(&response.body)
            );
            return Err(Judge0Error::client(format!(
                "Failed to get languages: {}",
                response.status.as_u16()
            ))
            .with_status_code(response.status.as_u16())
            .with_response_text(&response.body));
        }

        let languages: Vec<Language> = response.json().map_err(|e| {
            Judge0Error::validation("Languages response is not a list of languages")
                .with_field("body")
                .with_response_text(&response.body)
                .with_source(e)
        })?;

        info!("Fetched {} languages", languages.len());
        Ok(languages)
    }

    /// Uses [`HEALTH_CHECK_TIMEOUT`] instead of the configured timeout.
    #[tracing::instrument(skip(self))]
    async fn about(&self) -> Result<About> {
        let url = self.config.endpoint("/about");
        let headers = self.config.headers()?;

        let response = self
            .http
            .send(
                self.http
                    .inner()
                    .get(&url)
                    .headers(headers)
                    .timeout(HEALTH_CHECK_TIMEOUT),
            )
            .await
            .map_err(|e| transport_error(ErrorKind::Network, e, &url))?;

        if response.status != StatusCode::OK {
            return Err(Judge0Error::client(format!("Status {}", response.status.as_u16()))
                .with_status_code(response.status.as_u16())
                .with_response_text(&response.body));
        }

        response.json().map_err(|e| {
            Judge0Error::validation("About response is not a JSON object")
                .with_field("body")
                .with_response_text(&response.body)
                .with_source(e)
        })
    }

    fn api_url(&self) -> &str {
        self.config.api_url()
    }
}

/// Pulls a non-empty string `token` out of a 201 response body.
fn extract_token(response: &HttpResponse) -> Result<String> {
    let status = response.status.as_u16();
    let body: Value = response.json().map_err(|e| {
        error!("Submission response is not JSON: {}", snippet(&response.body, 500));
        Judge0Error::submission("Invalid JSON in submission response")
            .with_status_code(status)
            .with_response_text(&response.body)
            .with_source(e)
    })?;

    match body.get("token") {
        Some(Value::String(token)) if !token.is_empty() => Ok(token.clone()),
        None | Some(Value::Null) | Some(Value::String(_)) => {
            error!("No token in response: {}", snippet(&response.body, 500));
            Err(Judge0Error::submission("No token in response")
                .with_status_code(status)
                .with_response_text(&response.body))
        }
        Some(other) => {
            error!("Invalid token format: {}", other);
            Err(Judge0Error::submission(format!("Invalid token: {}", other))
                .with_status_code(status)
                .with_response_text(&response.body))
        }
    }
}

/// Wraps a reqwest transport failure, keeping it as the error source so the
/// retry predicate can recognise it.
fn transport_error(kind: ErrorKind, e: reqwest::Error, url: &str) -> Judge0Error {
    let message = if e.is_timeout() {
        format!("Request timed out: {}", e)
    } else if e.is_connect() {
        format!("Connection error: {}", e)
    } else {
        format!("Network error: {}", e)
    };
    Judge0Error::new(kind, message).with_url(url).with_source(e)
}

fn snippet(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => &text[..cut],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn client_for(server: &mockito::Server) -> Judge0Client {
        let config = Judge0Config::new(Some(server.url()), None, None);
        Judge0Client::new(config)
            .unwrap()
            .with_retry_policies(
                RetryPolicy::new(3, Duration::from_millis(1), 2.0),
                RetryPolicy::new(3, Duration::from_millis(1), 1.5),
            )
    }

    /// A client pointed at a port nobody listens on.
    fn unreachable_client(attempts: usize) -> Judge0Client {
        let config = Judge0Config::new(Some("http://127.0.0.1:9".to_string()), None, None);
        let policy = RetryPolicy::new(attempts, Duration::from_millis(1), 1.0);
        Judge0Client::new(config)
            .unwrap()
            .with_retry_policies(policy, policy)
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = Judge0Config::default().with_timeout(Duration::ZERO);
        let err = Judge0Client::new(config).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[tokio::test]
    async fn test_submit_returns_token() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/submissions")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(json!({
                "source_code": "print('hi')",
                "language_id": 71,
                "stdin": "",
                "expected_output": "hi\n"
            })))
            .with_status(201)
            .with_header("content-type", "application/json")
            .with_body(r#"{"token": "d85cd024-1548-4165-96c7-7bc88673f194"}"#)
            .create_async()
            .await;

        let client = client_for(&server);
        let request = SubmissionRequest::new("print('hi')", 71).expected_output("hi\n");
        let token = client.submit(&request).await.unwrap();

        mock.assert_async().await;
        assert_eq!(token, "d85cd024-1548-4165-96c7-7bc88673f194");
    }

    #[tokio::test]
    async fn test_submit_sends_rapidapi_headers() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/submissions")
            .match_header("x-rapidapi-key", "my-key")
            .match_header("x-rapidapi-host", "judge0-ce.p.rapidapi.com")
            .with_status(201)
            .with_body(r#"{"token": "tok"}"#)
            .create_async()
            .await;

        let config = Judge0Config::rapidapi("my-key").with_api_url(server.url());
        let client = Judge0Client::new(config).unwrap();
        let token = client.submit(&SubmissionRequest::new("x", 71)).await.unwrap();

        mock.assert_async().await;
        assert_eq!(token, "tok");
    }

    #[tokio::test]
    async fn test_submit_missing_token_is_not_retried() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/submissions")
            .with_status(201)
            .with_body(r#"{"id": 1}"#)
            .expect(1)
            .create_async()
            .await;

        let client = client_for(&server);
        let err = client
            .submit(&SubmissionRequest::new("x", 71))
            .await
            .unwrap_err();

        mock.assert_async().await;
        assert_eq!(err.kind(), ErrorKind::Submission);
        assert_eq!(err.message(), "No token in response");
        assert_eq!(err.status_code(), Some(201));
    }

    #[tokio::test]
    async fn test_submit_empty_token() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/submissions")
            .with_status(201)
            .with_body(r#"{"token": ""}"#)
            .create_async()
            .await;

        let err = client_for(&server)
            .submit(&SubmissionRequest::new("x", 71))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Submission);
    }

    #[tokio::test]
    async fn test_submit_non_string_token() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/submissions")
            .with_status(201)
            .with_body(r#"{"token": 12345}"#)
            .create_async()
            .await;

        let err = client_for(&server)
            .submit(&SubmissionRequest::new("x", 71))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Submission);
        assert_eq!(err.message(), "Invalid token: 12345");
    }

    #[tokio::test]
    async fn test_submit_non_201_carries_status_and_body() {
        let mut server = mockito::Server::new_async().await;
        let long_body = format!(r#"{{"error": "{}"}}"#, "x".repeat(300));
        let mock = server
            .mock("POST", "/submissions")
            .with_status(422)
            .with_body(&long_body)
            .expect(1)
            .create_async()
            .await;

        let err = client_for(&server)
            .submit(&SubmissionRequest::new("x", 9999))
            .await
            .unwrap_err();

        mock.assert_async().await;
        assert_eq!(err.kind(), ErrorKind::Submission);
        assert_eq!(err.status_code(), Some(422));
        assert_eq!(err.message(), "Submission failed with status 422");
        let response = err.get("response").and_then(Value::as_str).unwrap();
        assert!(response.ends_with("..."));
        assert_eq!(response.chars().count(), 203);
    }

    /// A server that accepts connections and closes them without answering.
    /// Returns its URL and the number of connections accepted so far.
    async fn hang_up_server() -> (String, Arc<AtomicUsize>) {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        let accepted = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&accepted);
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                counter.fetch_add(1, Ordering::SeqCst);
                drop(stream);
            }
        });
        (url, accepted)
    }

    #[tokio::test]
    async fn test_submit_transport_failure_retried_then_surfaces() {
        let (url, accepted) = hang_up_server().await;
        let policy = RetryPolicy::new(3, Duration::from_millis(1), 1.0);
        let client = Judge0Client::new(Judge0Config::new(Some(url.clone()), None, None))
            .unwrap()
            .with_retry_policies(policy, RetryPolicy::none());

        let err = client
            .submit(&SubmissionRequest::new("x", 71))
            .await
            .unwrap_err();

        assert_eq!(accepted.load(Ordering::SeqCst), 3);
        assert_eq!(err.kind(), ErrorKind::Submission);
        assert!(err.is_transport());
        assert_eq!(
            err.get("url").and_then(Value::as_str),
            Some(format!("{}/submissions", url).as_str())
        );
    }

    #[tokio::test]
    async fn test_submit_connection_refused() {
        let err = unreachable_client(2)
            .submit(&SubmissionRequest::new("x", 71))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Submission);
        assert!(err.is_transport());
        assert!(err.message().starts_with("Connection error"));
        assert_eq!(
            err.get("url").and_then(Value::as_str),
            Some("http://127.0.0.1:9/submissions")
        );
    }

    #[tokio::test]
    async fn test_fetch_transport_failure_uses_fetch_policy() {
        let (url, accepted) = hang_up_server().await;
        let client = Judge0Client::new(Judge0Config::new(Some(url), None, None))
            .unwrap()
            .with_retry_policies(
                RetryPolicy::none(),
                RetryPolicy::new(2, Duration::from_millis(1), 1.0),
            );

        let err = client.fetch("tok", &[]).await.unwrap_err();

        assert_eq!(accepted.load(Ordering::SeqCst), 2);
        assert_eq!(err.kind(), ErrorKind::Client);
        assert!(err.is_transport());
    }

    #[tokio::test]
    async fn test_submit_rapidapi_without_key_fails_before_sending() {
        let config = Judge0Config::new(None, None, Some("host".into())).with_rapidapi(true);
        let client = Judge0Client::new(config).unwrap();
        let err = client
            .submit(&SubmissionRequest::new("x", 71))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[tokio::test]
    async fn test_fetch_success_with_query() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/submissions/tok")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("base64_encoded".into(), "false".into()),
                Matcher::UrlEncoded("fields".into(), "stdout,status".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"stdout": "hi\n", "status": {"id": 3, "description": "Accepted"}}"#)
            .create_async()
            .await;

        let query = vec![
            ("base64_encoded".to_string(), "false".to_string()),
            ("fields".to_string(), "stdout,status".to_string()),
        ];
        let result = client_for(&server).fetch("tok", &query).await.unwrap();

        mock.assert_async().await;
        assert_eq!(result.stdout(), Some("hi\n"));
        assert_eq!(result.status_id(), Some(3));
    }

    #[tokio::test]
    async fn test_fetch_not_found() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/submissions/missing")
            .with_status(404)
            .with_body(r#"{"error": "not found"}"#)
            .expect(1)
            .create_async()
            .await;

        let err = client_for(&server).fetch("missing", &[]).await.unwrap_err();

        mock.assert_async().await;
        assert_eq!(err.kind(), ErrorKind::Client);
        assert_eq!(err.status_code(), Some(404));
        assert_eq!(err.token(), Some("missing"));
        assert!(err.message().starts_with("Failed to get submission: 404 - "));
        assert_eq!(
            err.to_map()["response"],
            json!(r#"{"error": "not found"}"#)
        );
    }

    #[tokio::test]
    async fn test_fetch_escapes_token_into_one_path_segment() {
        let mut server = mockito::Server::new_async().await;
        let languages = server
            .mock("GET", "/languages")
            .expect(0)
            .create_async()
            .await;
        let traversal = server
            .mock("GET", "/submissions/..%2Flanguages")
            .with_status(404)
            .expect(1)
            .create_async()
            .await;
        let query = server
            .mock("GET", "/submissions/a%3Fb")
            .with_status(200)
            .with_body(r#"{"status": {"id": 3, "description": "Accepted"}}"#)
            .expect(1)
            .create_async()
            .await;

        let client = client_for(&server);
        let err = client.fetch("../languages", &[]).await.unwrap_err();
        assert_eq!(err.status_code(), Some(404));
        let result = client.fetch("a?b", &[]).await.unwrap();
        assert_eq!(result.status_id(), Some(3));

        languages.assert_async().await;
        traversal.assert_async().await;
        query.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_rejects_dot_segment_tokens() {
        let mut server = mockito::Server::new_async().await;
        let any = server
            .mock("GET", Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let client = client_for(&server);
        for token in ["", ".", ".."] {
            let err = client.fetch(token, &[]).await.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Validation);
            assert_eq!(err.get("field").and_then(Value::as_str), Some("token"));
        }

        any.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_non_object_body() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/submissions/tok")
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let err = client_for(&server).fetch("tok", &[]).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.get("field").and_then(Value::as_str), Some("body"));
    }

    #[tokio::test]
    async fn test_fetch_transport_failure() {
        let err = unreachable_client(1).fetch("tok", &[]).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Client);
        assert!(err.is_transport());
        assert_eq!(err.token(), Some("tok"));
    }

    #[tokio::test]
    async fn test_languages() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/languages")
            .with_status(200)
            .with_body(r#"[{"id": 71, "name": "Python (3.8.1)"}, {"id": 54, "name": "C++ (GCC 9.2.0)"}]"#)
            .create_async()
            .await;

        let languages = client_for(&server).languages().await.unwrap();

        mock.assert_async().await;
        assert_eq!(languages.len(), 2);
        assert_eq!(languages[1].id, 54);
        assert_eq!(languages[1].name, "C++ (GCC 9.2.0)");
    }

    #[tokio::test]
    async fn test_languages_server_error() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/languages")
            .with_status(500)
            .create_async()
            .await;

        let err = client_for(&server).languages().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Client);
        assert_eq!(err.message(), "Failed to get languages: 500");
    }

    #[tokio::test]
    async fn test_about() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/about")
            .with_status(200)
            .with_body(r#"{"version": "1.13.1", "homepage": "https://judge0.com"}"#)
            .create_async()
            .await;

        let about = client_for(&server).about().await.unwrap();
        assert_eq!(about.version.as_deref(), Some("1.13.1"));
        assert_eq!(about.extra["homepage"], "https://judge0.com");
    }

    #[tokio::test]
    async fn test_execute_without_wait_returns_token() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/submissions")
            .with_status(201)
            .with_body(r#"{"token": "tok"}"#)
            .create_async()
            .await;

        let execution = client_for(&server)
            .execute(&SubmissionRequest::new("x", 71), false, None)
            .await
            .unwrap();
        assert_eq!(execution, Execution::Pending { token: "tok".into() });
    }

    #[tokio::test]
    async fn test_execute_waits_for_result() {
        let mut server = mockito::Server::new_async().await;
        let _submit = server
            .mock("POST", "/submissions")
            .with_status(201)
            .with_body(r#"{"token": "tok"}"#)
            .create_async()
            .await;
        let _fetch = server
            .mock("GET", "/submissions/tok")
            .with_status(200)
            .with_body(r#"{"token": "tok", "stdout": "42\n", "status": {"id": 3, "description": "Accepted"}}"#)
            .create_async()
            .await;

        let execution = client_for(&server)
            .execute(&SubmissionRequest::new("print(42)", 71), true, Some(Duration::from_secs(5)))
            .await
            .unwrap();

        let result = execution.into_result().unwrap();
        assert_eq!(result.stdout(), Some("42\n"));
    }

    #[test]
    fn test_snippet() {
        assert_eq!(snippet("abcdef", 3), "abc");
        assert_eq!(snippet("ab", 3), "ab");
    }
}
