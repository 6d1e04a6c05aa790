//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::AppConfig;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `timeout_ms` is less than 100ms or exceeds 5 minutes
    /// - `user_agent` is empty
    /// - `max_redirects` exceeds 20
    /// - `max_body_bytes` is 0 or exceeds 50MB
    /// - `accepted_statuses` is empty or holds a code outside 100-599
    /// - `indicator_phrases` is empty or holds a blank phrase
    /// - `rejection_threshold` is 0
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

        if self.user_agent.is_empty() {
            return Err(ConfigError::Invalid { field: "user_agent".into(), reason: "must not be empty".into() });
        }

        if self.max_redirects > 20 {
            return Err(ConfigError::Invalid { field: "max_redirects".into(), reason: "must not exceed 20".into() });
        }

        if self.max_body_bytes == 0 {
            return Err(ConfigError::Invalid { field: "max_body_bytes".into(), reason: "must be greater than 0".into() });
        }
        if self.max_body_bytes > 50 * 1024 * 1024 {
            return Err(ConfigError::Invalid { field: "max_body_bytes".into(), reason: "must not exceed 50MB".into() });
        }

        if self.accepted_statuses.is_empty() {
            return Err(ConfigError::Invalid { field: "accepted_statuses".into(), reason: "must not be empty".into() });
        }
        if let Some(code) = self.accepted_statuses.iter().find(|c| !(100..=599).contains(*c)) {
            return Err(ConfigError::Invalid {
                field: "accepted_statuses".into(),
                reason: format!("{code} is not an HTTP status code"),
            });
        }

        if self.indicator_phrases.is_empty() {
            return Err(ConfigError::Invalid { field: "indicator_phrases".into(), reason: "must not be empty".into() });
        }
        if self.indicator_phrases.iter().any(|p| p.trim().is_empty()) {
            return Err(ConfigError::Invalid {
                field: "indicator_phrases".into(),
                reason: "phrases must not be blank".into(),
            });
        }

        if self.rejection_threshold == 0 {
            return Err(ConfigError::Invalid {
                field: "rejection_threshold".into(),
                reason: "must be at least 1".into(),
            });
        }
        if self.rejection_threshold > self.indicator_phrases.len() {
            tracing::warn!(
                rejection_threshold = self.rejection_threshold,
                phrase_count = self.indicator_phrases.len(),
                "rejection_threshold exceeds the number of indicator phrases; \
                 body inspection will never reject a cookie"
            );
        }

        Ok(())
    }
}
