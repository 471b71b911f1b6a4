//! # Patientor Client
//!
//! HTTP binding of [`patientor_core::PatientApi`] for the patient service.
//!
//! Routes, relative to the configured base URL:
//! - `GET {base}/patients/{id}`: one patient with entries, `404` when unknown
//! - `GET {base}/diagnoses`: the diagnosis catalog
//! - `POST {base}/patients/{id}/entries`: create an entry, answers with the stored entry

mod http;

pub use http::HttpPatientApi;

use patientor_core::config::seconds_from_env_value;
use patientor_core::ConfigError;
use reqwest::Url;
use std::time::Duration;

/// Environment variable holding the service base URL.
pub const API_URL_ENV: &str = "PATIENTOR_API_URL";
/// Environment variable holding the per-request timeout in whole seconds.
pub const REQUEST_TIMEOUT_SECS_ENV: &str = "PATIENTOR_REQUEST_TIMEOUT_SECS";

pub const DEFAULT_API_URL: &str = "http://localhost:3001/api";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors raised while setting up a client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("invalid base URL '{value}': {reason}")]
    InvalidUrl { value: String, reason: String },

    #[error("failed to build HTTP client: {0}")]
    Build(#[from] reqwest::Error),
}

/// Client configuration resolved at startup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    base_url: Url,
    request_timeout: Duration,
}

impl ClientConfig {
    /// Create a new `ClientConfig`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidUrl`] unless `base_url` is an absolute `http` or `https`
    /// URL, and [`ClientError::Config`] for a zero timeout.
    pub fn new(base_url: &str, request_timeout: Duration) -> Result<Self, ClientError> {
        let invalid = |reason: String| ClientError::InvalidUrl {
            value: base_url.to_string(),
            reason,
        };
        let url = Url::parse(base_url.trim()).map_err(|e| invalid(e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
            return Err(invalid("expected an http or https URL".into()));
        }
        if request_timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                name: REQUEST_TIMEOUT_SECS_ENV,
                reason: "timeout must be greater than zero".into(),
            }
            .into());
        }
        Ok(Self {
            base_url: url,
            request_timeout,
        })
    }

    /// Build a config from optional raw values, as read from the environment at startup.
    ///
    /// `None` or blank values select the defaults (`http://localhost:3001/api`, 10 seconds).
    pub fn from_env_values(
        api_url: Option<String>,
        request_timeout_secs: Option<String>,
    ) -> Result<Self, ClientError> {
        let api_url = api_url
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let timeout = seconds_from_env_value(
            REQUEST_TIMEOUT_SECS_ENV,
            request_timeout_secs,
            DEFAULT_REQUEST_TIMEOUT,
        )?;
        Self::new(&api_url, timeout)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }
}
