use std::time::Duration;

use crate::errors::AppError;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_PAGE_SIZE: usize = 20;
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Settings for talking to the trip-planning backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub api_token: Option<String>,
    pub session_page_size: usize,
    pub request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            api_token: None,
            session_page_size: DEFAULT_PAGE_SIZE,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ClientConfig {
    pub fn new(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: trim_base_url(api_base_url.into()),
            ..Self::default()
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    /// Reads `XPLORER_API_URL`, `XPLORER_API_TOKEN`, `XPLORER_PAGE_SIZE` and
    /// `XPLORER_HTTP_TIMEOUT_SECS` from the process environment.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let api_base_url = lookup("XPLORER_API_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let api_token = lookup("XPLORER_API_TOKEN").filter(|v| !v.trim().is_empty());

        let session_page_size = match lookup("XPLORER_PAGE_SIZE") {
            Some(raw) => parse_positive("XPLORER_PAGE_SIZE", &raw)? as usize,
            None => DEFAULT_PAGE_SIZE,
        };

        let timeout_secs = match lookup("XPLORER_HTTP_TIMEOUT_SECS") {
            Some(raw) => parse_positive("XPLORER_HTTP_TIMEOUT_SECS", &raw)?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            api_base_url: trim_base_url(api_base_url),
            api_token,
            session_page_size,
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

fn trim_base_url(url: String) -> String {
    url.trim().trim_end_matches('/').to_string()
}

fn parse_positive(key: &str, raw: &str) -> Result<u64, AppError> {
    match raw.trim().parse::<u64>() {
        Ok(0) => Err(AppError::InvalidConfig {
            key: key.to_string(),
            message: "must be greater than zero".to_string(),
        }),
        Ok(n) => Ok(n),
        Err(e) => Err(AppError::InvalidConfig {
            key: key.to_string(),
            message: format!("'{raw}' is not a number ({e})"),
        }),
    }
}
