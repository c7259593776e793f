use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Language id of Python 3 on a stock Judge0 CE instance.
pub const DEFAULT_LANGUAGE_ID: i64 = 71;

/// Body of `POST /submissions`.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionRequest {
    pub source_code: String,
    /// Execution environment id. Not checked locally; the server decides.
    pub language_id: i64,
    pub stdin: String,
    pub expected_output: Option<String>,
    /// Additional submission fields, merged into the body last.
    pub extra: Map<String, Value>,
}

impl SubmissionRequest {
    pub fn new(source_code: impl Into<String>, language_id: i64) -> Self {
        Self {
            source_code: source_code.into(),
            language_id,
            stdin: String::new(),
            expected_output: None,
            extra: Map::new(),
        }
    }

    pub fn stdin(mut self, stdin: impl Into<String>) -> Self {
        self.stdin = stdin.into();
        self
    }

    pub fn expected_output(mut self, expected_output: impl Into<String>) -> Self {
        self.expected_output = Some(expected_output.into());
        self
    }

    /// Adds an extra submission field such as `cpu_time_limit`.
    pub fn param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// JSON body sent to the server. An empty expected output is omitted and
    /// extra fields override the named ones.
    pub fn to_body(&self) -> Value {
        let mut body = Map::new();
        body.insert("source_code".into(), Value::from(self.source_code.clone()));
        body.insert("language_id".into(), Value::from(self.language_id));
        body.insert("stdin".into(), Value::from(self.stdin.clone()));
        if let Some(expected) = self.expected_output.as_deref().filter(|e| !e.is_empty()) {
            body.insert("expected_output".into(), Value::from(expected));
        }
        for (key, value) in &self.extra {
            body.insert(key.clone(), value.clone());
        }
        Value::Object(body)
    }
}

impl Default for SubmissionRequest {
    fn default() -> Self {
        Self::new(String::new(), DEFAULT_LANGUAGE_ID)
    }
}

/// Judge0 submission status ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusKind {
    InQueue,
    Processing,
    Accepted,
    WrongAnswer,
    TimeLimitExceeded,
    CompilationError,
    /// Ids 7 to 12: SIGSEGV, SIGXFSZ, SIGFPE, SIGABRT, NZEC, other.
    RuntimeError(i64),
    InternalError,
    ExecFormatError,
    Other(i64),
}

impl StatusKind {
    pub fn from_id(id: i64) -> Self {
        match id {
            1 => StatusKind::InQueue,
            2 => StatusKind::Processing,
            3 => StatusKind::Accepted,
            4 => StatusKind::WrongAnswer,
            5 => StatusKind::TimeLimitExceeded,
            6 => StatusKind::CompilationError,
            7..=12 => StatusKind::RuntimeError(id),
            13 => StatusKind::InternalError,
            14 => StatusKind::ExecFormatError,
            other => StatusKind::Other(other),
        }
    }

    pub fn id(&self) -> i64 {
        match self {
            StatusKind::InQueue => 1,
            StatusKind::Processing => 2,
            StatusKind::Accepted => 3,
            StatusKind::WrongAnswer => 4,
            StatusKind::TimeLimitExceeded => 5,
            StatusKind::CompilationError => 6,
            StatusKind::RuntimeError(id) => *id,
            StatusKind::InternalError => 13,
            StatusKind::ExecFormatError => 14,
            StatusKind::Other(id) => *id,
        }
    }

    /// Queued and processing submissions are still moving.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, StatusKind::InQueue | StatusKind::Processing)
    }
}

/// Submission state as returned by `GET /submissions/{token}`.
///
/// The server decides which fields are present (see the `fields` query
/// parameter), so the full JSON object is kept and the common fields are
/// exposed through accessors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubmissionResult(Map<String, Value>);

impl SubmissionResult {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn token(&self) -> Option<&str> {
        self.str_field("token")
    }

    pub fn status_id(&self) -> Option<i64> {
        self.0.get("status")?.get("id")?.as_i64()
    }

    pub fn status_description(&self) -> Option<&str> {
        self.0.get("status")?.get("description")?.as_str()
    }

    pub fn status_kind(&self) -> Option<StatusKind> {
        self.status_id().map(StatusKind::from_id)
    }

    /// Anything but "In Queue" or "Processing" is final, including a missing
    /// status.
    pub fn is_terminal(&self) -> bool {
        self.status_kind().is_none_or(|kind| kind.is_terminal())
    }

    pub fn stdout(&self) -> Option<&str> {
        self.str_field("stdout")
    }

    pub fn stderr(&self) -> Option<&str> {
        self.str_field("stderr")
    }

    pub fn compile_output(&self) -> Option<&str> {
        self.str_field("compile_output")
    }

    pub fn message(&self) -> Option<&str> {
        self.str_field("message")
    }

    /// Run time in seconds. Judge0 sends it as a decimal string.
    pub fn time(&self) -> Option<f64> {
        match self.0.get("time")? {
            Value::String(s) => s.parse().ok(),
            other => other.as_f64(),
        }
    }

    /// Memory usage in kilobytes.
    pub fn memory(&self) -> Option<u64> {
        self.0.get("memory")?.as_u64()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.0.get(key)?.as_str()
    }
}

impl From<Map<String, Value>> for SubmissionResult {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

/// Outcome of [`execute`](crate::judge0::execute).
#[derive(Debug, Clone, PartialEq)]
pub enum Execution {
    /// The submission reached a terminal status.
    Completed(SubmissionResult),
    /// Submitted without waiting.
    Pending { token: String },
}

impl Execution {
    pub fn token(&self) -> Option<&str> {
        match self {
            Execution::Completed(result) => result.token(),
            Execution::Pending { token } => Some(token.as_str()),
        }
    }

    pub fn result(&self) -> Option<&SubmissionResult> {
        match self {
            Execution::Completed(result) => Some(result),
            Execution::Pending { .. } => None,
        }
    }

    pub fn into_result(self) -> Option<SubmissionResult> {
        match self {
            Execution::Completed(result) => Some(result),
            Execution::Pending { .. } => None,
        }
    }
}

/// Entry of `GET /languages`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Language {
    pub id: i64,
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Response of `GET /about`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct About {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
