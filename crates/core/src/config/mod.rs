//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (CRUMB_*)
//! 2. TOML config file (if CRUMB_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Desktop Chrome user agent; some sites refuse requests without a browser-like one.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Status codes that count as a successful replay. Redirects are included
/// because many sites redirect after accepting a session.
pub const DEFAULT_ACCEPTED_STATUSES: &[u16] = &[200, 201, 202, 301, 302, 304];

/// Body phrases suggesting the replayed session was rejected.
pub const DEFAULT_INDICATOR_PHRASES: &[&str] =
    &["login", "sign in", "authentication required", "session expired", "unauthorized", "access denied"];

/// Number of distinct indicator phrases at which a cookie is rejected.
pub const DEFAULT_REJECTION_THRESHOLD: usize = 2;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (CRUMB_*)
/// 2. TOML config file (if CRUMB_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the SQLite cookie database.
    ///
    /// Set via CRUMB_DB_PATH environment variable.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// User-Agent string sent with replay requests.
    ///
    /// Set via CRUMB_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Replay request timeout in milliseconds.
    ///
    /// Set via CRUMB_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Maximum number of redirects to follow during replay.
    ///
    /// Set via CRUMB_MAX_REDIRECTS environment variable.
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,

    /// Maximum replay response body read, in bytes. Longer bodies are truncated.
    ///
    /// Set via CRUMB_MAX_BODY_BYTES environment variable.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,

    /// Status codes treated as a successful replay.
    #[serde(default = "default_accepted_statuses")]
    pub accepted_statuses: Vec<u16>,

    /// Lower-case body phrases that hint at a rejected session.
    #[serde(default = "default_indicator_phrases")]
    pub indicator_phrases: Vec<String>,

    /// Distinct indicator phrases needed to reject a cookie.
    ///
    /// Set via CRUMB_REJECTION_THRESHOLD environment variable.
    #[serde(default = "default_rejection_threshold")]
    pub rejection_threshold: usize,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./crumb.sqlite")
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.into()
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_max_redirects() -> usize {
    10
}

fn default_max_body_bytes() -> usize {
    5_242_880 // 5MB
}

fn default_accepted_statuses() -> Vec<u16> {
    DEFAULT_ACCEPTED_STATUSES.to_vec()
}

fn default_indicator_phrases() -> Vec<String> {
    DEFAULT_INDICATOR_PHRASES.iter().map(|p| p.to_string()).collect()
}

fn default_rejection_threshold() -> usize {
    DEFAULT_REJECTION_THRESHOLD
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
            max_redirects: default_max_redirects(),
            max_body_bytes: default_max_body_bytes(),
            accepted_statuses: default_accepted_statuses(),
            indicator_phrases: default_indicator_phrases(),
            rejection_threshold: default_rejection_threshold(),
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `CRUMB_`
    /// 2. TOML file from `CRUMB_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("CRUMB_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("CRUMB_")
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}
