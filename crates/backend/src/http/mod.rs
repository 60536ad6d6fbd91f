use std::env;
use std::time::Duration;

use thiserror::Error;
use url::Url;

mod questions;
mod submissions;

pub use questions::HttpQuestionProvider;
pub use submissions::HttpSubmissionService;

/// Request timeout applied when the environment does not override it.
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("QUIZ_API_BASE_URL is not set")]
    MissingBaseUrl,

    #[error("invalid base url: {0}")]
    InvalidBaseUrl(String),

    #[error("invalid QUIZ_API_TIMEOUT_SECS value: {0}")]
    InvalidTimeout(String),
}

/// Connection settings shared by the HTTP question and submission clients.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    base_url: Url,
    auth_token: Option<String>,
    timeout: Duration,
}

impl ApiConfig {
    /// Creates a config for the given API root.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidBaseUrl` if the url does not parse.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        let base_url =
            Url::parse(base_url).map_err(|e| ConfigError::InvalidBaseUrl(e.to_string()))?;
        Ok(Self {
            base_url,
            auth_token: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        })
    }

    /// Reads `QUIZ_API_BASE_URL`, `QUIZ_API_TOKEN`, and
    /// `QUIZ_API_TIMEOUT_SECS` from the environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when the base url is missing or invalid, or a
    /// timeout override is present but not a positive integer.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = env::var("QUIZ_API_BASE_URL").map_err(|_| ConfigError::MissingBaseUrl)?;
        if base_url.trim().is_empty() {
            return Err(ConfigError::MissingBaseUrl);
        }

        let mut config = Self::new(base_url.trim())?;
        if let Ok(token) = env::var("QUIZ_API_TOKEN") {
            config = config.with_token(token);
        }
        if let Ok(raw) = env::var("QUIZ_API_TIMEOUT_SECS") {
            let secs: u64 = raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidTimeout(raw.clone()))?;
            if secs == 0 {
                return Err(ConfigError::InvalidTimeout(raw));
            }
            config = config.with_timeout(Duration::from_secs(secs));
        }
        Ok(config)
    }

    /// Attaches a bearer token. Blank tokens are treated as absent.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        let token = token.into();
        self.auth_token = if token.trim().is_empty() {
            None
        } else {
            Some(token)
        };
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Joins an API path onto the base url.
    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.as_str().trim_end_matches('/'), path)
    }

    /// Applies the shared timeout and auth settings to a request.
    pub(crate) fn prepare(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let request = request.timeout(self.timeout);
        match &self.auth_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}
