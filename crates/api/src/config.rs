//! Endpoint configuration for the color-extraction service.

use std::env;
use std::time::Duration;

use reqwest::Url;
use thiserror::Error;

/// Origin of the hosted color-extraction service.
pub const DEFAULT_API_BASE: &str = "https://coooooodingggprojects.onrender.com";
/// Environment variable overriding [`DEFAULT_API_BASE`].
pub const API_BASE_ENV: &str = "CHROMAPICK_API_BASE";
/// Environment variable enabling a request timeout, in whole seconds.
pub const TIMEOUT_ENV: &str = "CHROMAPICK_TIMEOUT_SECS";

/// Hostnames allowed to use plain HTTP.
const LOCALHOST_DOMAINS: &[&str] = &["localhost", "127.0.0.1"];

/// Error surfaced when the endpoint configuration is unusable.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ApiConfigError {
    #[error("invalid API base URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("API base URL '{url}' must include a host")]
    MissingHost { url: String },
    #[error("API base URL must use https for non-localhost hosts; got '{scheme}://'")]
    InsecureScheme { scheme: String },
    #[error("invalid CHROMAPICK_TIMEOUT_SECS value '{value}'; expected a positive number of seconds")]
    InvalidTimeout { value: String },
}

/// Resolved endpoint settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    base_url: String,
    timeout: Option<Duration>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE.to_string(),
            timeout: None,
        }
    }
}

impl ApiConfig {
    /// Build a configuration from `CHROMAPICK_API_BASE` and
    /// `CHROMAPICK_TIMEOUT_SECS`, falling back to the hosted service with no
    /// timeout.
    pub fn from_environment() -> Result<Self, ApiConfigError> {
        Self::resolve(None, None)
    }

    /// Build a configuration where each explicit override replaces its
    /// environment variable. A variable that is overridden is never read, so
    /// a malformed value there cannot fail the build.
    pub fn resolve(base_url: Option<&str>, timeout: Option<Duration>) -> Result<Self, ApiConfigError> {
        let mut config = Self::default();
        match base_url {
            Some(base) => config = config.with_base_url(base)?,
            None => {
                if let Ok(base) = env::var(API_BASE_ENV)
                    && !base.trim().is_empty()
                {
                    config = config.with_base_url(&base)?;
                }
            }
        }
        if timeout.is_some() {
            config.timeout = timeout;
        } else if let Ok(raw) = env::var(TIMEOUT_ENV)
            && !raw.trim().is_empty()
        {
            let seconds = raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|value| *value > 0)
                .ok_or(ApiConfigError::InvalidTimeout { value: raw.clone() })?;
            config.timeout = Some(Duration::from_secs(seconds));
        }
        Ok(config)
    }

    /// Replace the base URL after validating it.
    pub fn with_base_url(mut self, base: &str) -> Result<Self, ApiConfigError> {
        let trimmed = base.trim().trim_end_matches('/');
        validate_base_url(trimmed)?;
        self.base_url = trimmed.to_string();
        Ok(self)
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

/// Validate that a base URL is acceptable for use by the client.
///
/// Rules:
/// - `localhost` or `127.0.0.1`: any scheme is allowed
/// - otherwise: scheme must be HTTPS
fn validate_base_url(base: &str) -> Result<(), ApiConfigError> {
    let parsed_base_url = Url::parse(base).map_err(|error| ApiConfigError::InvalidUrl {
        url: base.to_string(),
        reason: error.to_string(),
    })?;

    let host_name = parsed_base_url
        .host_str()
        .ok_or_else(|| ApiConfigError::MissingHost { url: base.to_string() })?;

    if LOCALHOST_DOMAINS
        .iter()
        .any(|&allowed| host_name.eq_ignore_ascii_case(allowed))
    {
        return Ok(());
    }

    if parsed_base_url.scheme() != "https" {
        return Err(ApiConfigError::InsecureScheme {
            scheme: parsed_base_url.scheme().to_string(),
        });
    }

    Ok(())
}
