//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and passed into the session. Nothing in
//! this crate reads environment variables while a session is running; binaries call the
//! `*_from_env_value` helpers with whatever they read at startup.

use crate::constants::NOTIFICATION_TIMEOUT;
use crate::error::ConfigError;
use std::time::Duration;

/// Environment variable holding the notification timeout in whole seconds.
pub const NOTIFICATION_SECS_ENV: &str = "PATIENTOR_NOTIFICATION_SECS";

/// Session configuration resolved at startup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    notification_timeout: Duration,
}

impl SessionConfig {
    /// Create a new `SessionConfig`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for a zero timeout, which would hide every
    /// notification before it could be seen.
    pub fn new(notification_timeout: Duration) -> Result<Self, ConfigError> {
        if notification_timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                name: NOTIFICATION_SECS_ENV,
                reason: "timeout must be greater than zero".into(),
            });
        }
        Ok(Self {
            notification_timeout,
        })
    }

    pub fn notification_timeout(&self) -> Duration {
        self.notification_timeout
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            notification_timeout: NOTIFICATION_TIMEOUT,
        }
    }
}

/// Build a [`SessionConfig`] from the optional notification timeout value.
///
/// `None` or a blank value selects the default five second timeout.
pub fn session_config_from_env_value(value: Option<String>) -> Result<SessionConfig, ConfigError> {
    let timeout = seconds_from_env_value(NOTIFICATION_SECS_ENV, value, NOTIFICATION_TIMEOUT)?;
    SessionConfig::new(timeout)
}

/// Parse a whole number of seconds from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns `default`.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidValue`] naming `name` when the value is not a non-negative
/// integer.
pub fn seconds_from_env_value(
    name: &'static str,
    value: Option<String>,
    default: Duration,
) -> Result<Duration, ConfigError> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    match value {
        None => Ok(default),
        Some(v) => v
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|e| ConfigError::InvalidValue {
                name,
                reason: format!("'{v}' is not a whole number of seconds ({e})"),
            }),
    }
}
