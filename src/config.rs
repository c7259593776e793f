//! Connection settings for a Judge0 instance.

use log::debug;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use std::fmt;
use std::time::Duration;

use crate::error::{Judge0Error, Result};
use crate::runtime::{Runtime, non_empty_env};

pub const DEFAULT_PORT: u16 = 2358;
pub const DEFAULT_API_URL: &str = "http://localhost:2358";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_MAX_WAIT: Duration = Duration::from_secs(60);

pub const RAPIDAPI_URL: &str = "https://judge0-ce.p.rapidapi.com";
pub const RAPIDAPI_HOST: &str = "judge0-ce.p.rapidapi.com";

pub const RAPIDAPI_KEY_HEADER: &str = "x-rapidapi-key";
pub const RAPIDAPI_HOST_HEADER: &str = "x-rapidapi-host";

pub const ENV_API_URL: &str = "JUDGE0_API_URL";
pub const ENV_API_KEY: &str = "JUDGE0_API_KEY";
pub const ENV_API_HOST: &str = "JUDGE0_API_HOST";
pub const ENV_TIMEOUT: &str = "JUDGE0_TIMEOUT";
pub const ENV_MAX_WAIT: &str = "JUDGE0_MAX_WAIT";

/// Immutable connection settings. Build one with [`Judge0Config::new`],
/// [`Judge0Config::from_env`] or one of the presets, adjust it with the
/// `with_*` methods, then hand it to the client.
#[derive(Clone, PartialEq, Eq)]
pub struct Judge0Config {
    api_url: String,
    api_key: Option<String>,
    api_host: Option<String>,
    timeout: Duration,
    max_wait: Duration,
    use_rapidapi: bool,
}

impl Default for Judge0Config {
    fn default() -> Self {
        Self::new(None, None, None)
    }
}

impl Judge0Config {
    /// RapidAPI headers are enabled when both `api_key` and `api_host` are given.
    pub fn new(api_url: Option<String>, api_key: Option<String>, api_host: Option<String>) -> Self {
        let api_key = api_key.filter(|k| !k.is_empty());
        let api_host = api_host.filter(|h| !h.is_empty());
        let use_rapidapi = api_key.is_some() && api_host.is_some();

        Self {
            api_url: api_url
                .filter(|u| !u.is_empty())
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            api_key,
            api_host,
            timeout: DEFAULT_TIMEOUT,
            max_wait: DEFAULT_MAX_WAIT,
            use_rapidapi,
        }
    }

    /// Reads `JUDGE0_API_URL`, `JUDGE0_API_KEY`, `JUDGE0_API_HOST`,
    /// `JUDGE0_TIMEOUT` and `JUDGE0_MAX_WAIT`. Unset or empty variables fall
    /// back to the defaults; timeouts are whole seconds.
    #[tracing::instrument(skip(runtime))]
    pub fn from_env<R: Runtime + ?Sized>(runtime: &R) -> Result<Self> {
        let config = Self::new(
            non_empty_env(runtime, ENV_API_URL),
            non_empty_env(runtime, ENV_API_KEY),
            non_empty_env(runtime, ENV_API_HOST),
        );

        let timeout = match non_empty_env(runtime, ENV_TIMEOUT) {
            Some(raw) => parse_seconds(ENV_TIMEOUT, &raw)?,
            None => DEFAULT_TIMEOUT,
        };
        let max_wait = match non_empty_env(runtime, ENV_MAX_WAIT) {
            Some(raw) => parse_seconds(ENV_MAX_WAIT, &raw)?,
            None => DEFAULT_MAX_WAIT,
        };

        let config = config.with_timeout(timeout).with_max_wait(max_wait);
        debug!("Loaded configuration from environment: {:?}", config);
        Ok(config)
    }

    /// A Judge0 instance on this machine.
    pub fn local(port: u16) -> Self {
        Self::new(Some(format!("http://localhost:{}", port)), None, None)
    }

    /// A self-hosted Judge0 instance reachable at `host:port`.
    pub fn remote(host: &str, port: u16) -> Self {
        Self::new(Some(format!("http://{}:{}", host, port)), None, None)
    }

    /// The hosted Judge0 CE endpoint on RapidAPI.
    pub fn rapidapi(api_key: impl Into<String>) -> Self {
        Self {
            api_url: RAPIDAPI_URL.to_string(),
            api_key: Some(api_key.into()),
            api_host: Some(RAPIDAPI_HOST.to_string()),
            timeout: DEFAULT_TIMEOUT,
            max_wait: DEFAULT_MAX_WAIT,
            use_rapidapi: true,
        }
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_wait(mut self, max_wait: Duration) -> Self {
        self.max_wait = max_wait;
        self
    }

    /// Overrides the auto-detected RapidAPI flag.
    pub fn with_rapidapi(mut self, use_rapidapi: bool) -> Self {
        self.use_rapidapi = use_rapidapi;
        self
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    pub fn api_host(&self) -> Option<&str> {
        self.api_host.as_deref()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn max_wait(&self) -> Duration {
        self.max_wait
    }

    pub fn use_rapidapi(&self) -> bool {
        self.use_rapidapi
    }

    /// Joins `path` onto the base URL, tolerating a trailing slash on the base.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_url.trim_end_matches('/'), path.trim_start_matches('/'))
    }

    /// Rejects settings the client cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.api_url.is_empty() {
            return Err(Judge0Error::configuration("API URL must not be empty")
                .with_config_key("api_url"));
        }
        if self.timeout.is_zero() {
            return Err(Judge0Error::configuration("Timeout must be greater than zero")
                .with_config_key("timeout"));
        }
        if self.max_wait.is_zero() {
            return Err(Judge0Error::configuration("Max wait must be greater than zero")
                .with_config_key("max_wait"));
        }
        Ok(())
    }

    /// Headers sent with every request.
    ///
    /// `content-type: application/json` is always present. With RapidAPI
    /// enabled the key and host headers are added, and a missing key or host
    /// is reported here, at request time.
    pub fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if self.use_rapidapi {
            let api_key = self.api_key.as_deref().ok_or_else(|| {
                Judge0Error::configuration("API key required for RapidAPI")
                    .with_config_key("api_key")
            })?;
            let api_host = self.api_host.as_deref().ok_or_else(|| {
                Judge0Error::configuration("API host required for RapidAPI")
                    .with_config_key("api_host")
            })?;

            let mut key_value = header_value("api_key", api_key)?;
            key_value.set_sensitive(true);
            headers.insert(HeaderName::from_static(RAPIDAPI_KEY_HEADER), key_value);
            headers.insert(
                HeaderName::from_static(RAPIDAPI_HOST_HEADER),
                header_value("api_host", api_host)?,
            );
        }

        Ok(headers)
    }
}

impl fmt::Debug for Judge0Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Judge0Config")
            .field("api_url", &self.api_url)
            .field("api_key", &self.api_key.as_deref().map(mask_key))
            .field("api_host", &self.api_host)
            .field("timeout", &self.timeout)
            .field("max_wait", &self.max_wait)
            .field("use_rapidapi", &self.use_rapidapi)
            .finish()
    }
}

fn mask_key(key: &str) -> String {
    let visible: String = key.chars().take(8).collect();
    format!("{}...", visible)
}

fn header_value(config_key: &str, value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value).map_err(|e| {
        Judge0Error::configuration(format!("Invalid header value for {}", config_key))
            .with_config_key(config_key)
            .with_source(e)
    })
}

fn parse_seconds(variable: &str, raw: &str) -> Result<Duration> {
    let secs: u64 = raw.trim().parse().map_err(|e| {
        Judge0Error::configuration(format!("{} must be a whole number of seconds, got '{}'", variable, raw))
            .with_config_key(variable)
            .with_source(e)
    })?;
    if secs == 0 {
        return Err(Judge0Error::configuration(format!("{} must be greater than zero", variable))
            .with_config_key(variable));
    }
    Ok(Duration::from_secs(secs))
}
