//! Client configuration, resolved once at startup from the environment

use reqwest::Url;
use std::time::Duration;
use thiserror::Error;

/// Base URL used when `DOCUMIND_API_URL` is unset
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("DOCUMIND_API_URL must be an http:// or https:// URL with a host, got {0:?}")]
    InvalidApiUrl(String),
    #[error("DOCUMIND_REQUEST_TIMEOUT_SECS must be a positive integer, got {0:?}")]
    InvalidTimeout(String),
}

/// Configuration for talking to the document services
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the ingestion and question-answering services, without a trailing slash
    pub api_url: String,
    /// Per-request timeout. `None` waits indefinitely.
    pub request_timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            request_timeout: None,
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = match lookup("DOCUMIND_API_URL") {
            Some(raw) if !raw.trim().is_empty() => normalize_api_url(&raw)?,
            _ => DEFAULT_API_URL.to_string(),
        };

        let request_timeout = match lookup("DOCUMIND_REQUEST_TIMEOUT_SECS") {
            Some(raw) if !raw.trim().is_empty() => {
                let secs: u64 = raw
                    .trim()
                    .parse()
                    .ok()
                    .filter(|s| *s > 0)
                    .ok_or_else(|| ConfigError::InvalidTimeout(raw.clone()))?;
                Some(Duration::from_secs(secs))
            }
            _ => None,
        };

        Ok(Self {
            api_url,
            request_timeout,
        })
    }

    /// Absolute URL for an endpoint path such as `/chat`
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_url, path.trim_start_matches('/'))
    }
}

fn normalize_api_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let invalid = || ConfigError::InvalidApiUrl(raw.to_string());

    let url = Url::parse(trimmed).map_err(|_| invalid())?;
    let has_host = url.host_str().is_some_and(|host| !host.is_empty());
    if !matches!(url.scheme(), "http" | "https") || !has_host {
        return Err(invalid());
    }
    Ok(trimmed.to_string())
}
