//! Error type shared by every client operation.
//!
//! A single [`Judge0Error`] carries a kind, a human message and an ordered
//! list of context entries (status codes, tokens, poll counts, ...). The
//! context is rendered into the `Display` output and flattened by
//! [`Judge0Error::to_map`] for structured logging.

use serde_json::{Map, Value};
use std::fmt;

/// Maximum number of response-body characters kept in error context.
pub const RESPONSE_TEXT_LIMIT: usize = 200;

pub type Result<T, E = Judge0Error> = std::result::Result<T, E>;

/// The family a [`Judge0Error`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Generic API failure (unexpected status while fetching, listing, ...)
    Client,
    /// The submit request was rejected or its response was unusable
    Submission,
    /// Polling ran out of time before a terminal status was observed
    Timeout,
    /// Invalid or incomplete configuration
    Configuration,
    /// Transport-level failure
    Network,
    /// A response field did not have the expected shape
    Validation,
}

impl ErrorKind {
    /// Tag used as `error_type` in structured output.
    pub fn tag(&self) -> &'static str {
        match self {
            ErrorKind::Client => "Judge0Error",
            ErrorKind::Submission => "SubmissionError",
            ErrorKind::Timeout => "TimeoutError",
            ErrorKind::Configuration => "ConfigurationError",
            ErrorKind::Network => "NetworkError",
            ErrorKind::Validation => "ValidationError",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[derive(Debug)]
pub struct Judge0Error {
    kind: ErrorKind,
    message: String,
    context: Vec<(String, Value)>,
    source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

impl Judge0Error {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            context: Vec::new(),
            source: None,
        }
    }

    pub fn client(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Client, message)
    }

    pub fn submission(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Submission, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Timeout, message)
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Network, message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Attaches a context entry. A key that is already present is replaced
    /// in place so the original ordering is kept.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let key = key.into();
        let value = value.into();
        match self.context.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.context.push((key, value)),
        }
        self
    }

    pub fn with_source(
        mut self,
        source: impl Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
    ) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_status_code(self, status_code: u16) -> Self {
        self.with_context("status_code", status_code)
    }

    /// Stores the response body, cut down to [`RESPONSE_TEXT_LIMIT`] characters.
    /// Empty bodies are not recorded.
    pub fn with_response_text(self, text: &str) -> Self {
        if text.is_empty() {
            return self;
        }
        self.with_context("response", truncate_response(text))
    }

    /// Empty tokens are not recorded.
    pub fn with_token(self, token: &str) -> Self {
        if token.is_empty() {
            return self;
        }
        self.with_context("token", token)
    }

    pub fn with_max_wait(self, max_wait_secs: f64) -> Self {
        self.with_context("max_wait_sec", max_wait_secs)
    }

    pub fn with_polls(self, polls: u32) -> Self {
        self.with_context("polls", polls)
    }

    /// Records the last observed submission status. Missing parts are skipped.
    pub fn with_last_status(self, description: Option<&str>, id: Option<i64>) -> Self {
        let err = match description {
            Some(desc) if !desc.is_empty() => self.with_context("last_status", desc),
            _ => self,
        };
        match id {
            Some(id) => err.with_context("last_status_id", id),
            None => err,
        }
    }

    pub fn with_config_key(self, key: &str) -> Self {
        self.with_context("config_key", key)
    }

    pub fn with_url(self, url: &str) -> Self {
        self.with_context("url", url)
    }

    pub fn with_attempts(self, attempts: usize) -> Self {
        self.with_context("attempts", attempts)
    }

    pub fn with_field(self, field: &str) -> Self {
        self.with_context("field", field)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Context entries in insertion order.
    pub fn context(&self) -> &[(String, Value)] {
        &self.context
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.context
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, value)| value)
    }

    pub fn status_code(&self) -> Option<u16> {
        self.get("status_code")
            .and_then(Value::as_u64)
            .and_then(|code| u16::try_from(code).ok())
    }

    pub fn token(&self) -> Option<&str> {
        self.get("token").and_then(Value::as_str)
    }

    pub fn polls(&self) -> Option<u32> {
        self.get("polls")
            .and_then(Value::as_u64)
            .and_then(|polls| u32::try_from(polls).ok())
    }

    /// True for failures of the transport itself: connection refused, DNS,
    /// request timeout, reset streams. HTTP status failures and body decode
    /// failures are not transport failures.
    pub fn is_transport(&self) -> bool {
        if self.kind == ErrorKind::Network {
            return true;
        }
        self.source
            .as_deref()
            .and_then(|source| source.downcast_ref::<reqwest::Error>())
            .is_some_and(|e| !e.is_status() && !e.is_decode() && !e.is_builder())
    }

    /// Flattens the error into a JSON object: `error_type`, `message` and
    /// every context entry at the top level.
    pub fn to_map(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("error_type".into(), Value::from(self.kind.tag()));
        map.insert("message".into(), Value::from(self.message.clone()));
        for (key, value) in &self.context {
            map.insert(key.clone(), value.clone());
        }
        map
    }
}

impl fmt::Display for Judge0Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)?;
        if self.context.is_empty() {
            return Ok(());
        }

        f.write_str(" [")?;
        for (i, (key, value)) in self.context.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            match value {
                Value::String(s) => write!(f, "{}={}", key, s)?,
                other => write!(f, "{}={}", key, other)?,
            }
        }
        f.write_str("]")
    }
}

impl std::error::Error for Judge0Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Cuts `text` to [`RESPONSE_TEXT_LIMIT`] characters, appending `...` when
/// anything was dropped.
pub fn truncate_response(text: &str) -> String {
    match text.char_indices().nth(RESPONSE_TEXT_LIMIT) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
