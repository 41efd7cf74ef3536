//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use std::net::SocketAddr;

use crate::config::{AppConfig, Transport};
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },

    #[error("missing required configuration: {field} ({hint})")]
    Missing { field: String, hint: String },
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `timeout_ms` is less than 100ms or exceeds 5 minutes
    /// - `captcha_poll_interval_ms` is 0 or exceeds 1 minute
    /// - `captcha_timeout_ms` is shorter than one poll interval or exceeds 10 minutes
    /// - `user_agent` or either base URL is empty
    /// - `http_bind` is not a socket address while the HTTP transport is selected
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_ms < 100 {
            return Err(ConfigError::Invalid { field: "timeout_ms".into(), reason: "must be at least 100ms".into() });
        }
        if self.timeout_ms > 300_000 {
            return Err(ConfigError::Invalid {
                field: "timeout_ms".into(),
                reason: "must not exceed 5 minutes (300000ms)".into(),
            });
        }

        if self.captcha_poll_interval_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "captcha_poll_interval_ms".into(),
                reason: "must be greater than 0".into(),
            });
        }
        if self.captcha_poll_interval_ms > 60_000 {
            return Err(ConfigError::Invalid {
                field: "captcha_poll_interval_ms".into(),
                reason: "must not exceed 1 minute (60000ms)".into(),
            });
        }

        if self.captcha_timeout_ms < self.captcha_poll_interval_ms {
            return Err(ConfigError::Invalid {
                field: "captcha_timeout_ms".into(),
                reason: "must be at least one poll interval".into(),
            });
        }
        if self.captcha_timeout_ms > 600_000 {
            return Err(ConfigError::Invalid {
                field: "captcha_timeout_ms".into(),
                reason: "must not exceed 10 minutes (600000ms)".into(),
            });
        }

        if self.user_agent.is_empty() {
            return Err(ConfigError::Invalid { field: "user_agent".into(), reason: "must not be empty".into() });
        }

        for (field, value) in [("ahrefs_base_url", &self.ahrefs_base_url), ("capsolver_base_url", &self.capsolver_base_url)]
        {
            if !value.starts_with("http://") && !value.starts_with("https://") {
                return Err(ConfigError::Invalid { field: field.into(), reason: "must be an http(s) URL".into() });
            }
        }

        if self.transport == Transport::Http && self.http_bind.parse::<SocketAddr>().is_err() {
            return Err(ConfigError::Invalid {
                field: "http_bind".into(),
                reason: format!("not a socket address: {}", self.http_bind),
            });
        }

        if self.capsolver_api_key.is_none() {
            tracing::warn!("capsolver_api_key is not set; every tool call will fail until it is configured");
        }

        Ok(())
    }
}
