//! API origin configuration.
//!
//! The base URL is baked in at build time from `REFRAME_API_BASE_URL`, the
//! same way the bundler injected it for the JavaScript client. Every REST
//! path in `net::api` is relative to it.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8000/api/";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid API base URL: {0:?} (expected http:// or https://)")]
    InvalidBaseUrl(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    api_base_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self { api_base_url: DEFAULT_API_BASE_URL.to_owned() }
    }
}

impl ClientConfig {
    /// Build config from an explicit base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] when the value is blank or not
    /// an `http(s)` URL.
    pub fn new(api_base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self { api_base_url: normalize_base_url(api_base_url)? })
    }

    /// Build config from the compile-time `REFRAME_API_BASE_URL` variable,
    /// falling back to [`DEFAULT_API_BASE_URL`] when it was not set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] when the injected value is malformed.
    pub fn from_build_env() -> Result<Self, ConfigError> {
        Self::resolve(option_env!("REFRAME_API_BASE_URL"))
    }

    fn resolve(raw: Option<&str>) -> Result<Self, ConfigError> {
        match raw {
            Some(value) if !value.trim().is_empty() => Self::new(value),
            _ => Ok(Self::default()),
        }
    }

    /// Normalized base URL, always ending in a single `/`.
    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }
}

fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim();
    let has_scheme = trimmed.starts_with("http://") || trimmed.starts_with("https://");
    let host = trimmed
        .trim_start_matches("https://")
        .trim_start_matches("http://")
        .trim_end_matches('/');
    if !has_scheme || host.is_empty() {
        return Err(ConfigError::InvalidBaseUrl(raw.to_owned()));
    }
    Ok(format!("{}/", trimmed.trim_end_matches('/')))
}
