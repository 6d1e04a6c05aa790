//! Outbound replay transport.
//!
//! The validator only needs one capability from the network: send a GET with
//! a set of named cookies and hand back the status, the cookies the server
//! sets in return, and the body text. [`Transport`] is that seam;
//! [`HttpTransport`] is the reqwest-backed implementation.

pub mod http;

pub use http::{HttpTransport, ReplayConfig};

use async_trait::async_trait;
use std::collections::HashMap;

/// What the validator reads back from a replayed request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplayResponse {
    /// Final HTTP status after redirects.
    pub status: u16,
    /// Cookies (name -> value) the server set on the final response.
    /// Deletions (`Max-Age=0` or a past `Expires`) are left out.
    pub set_cookies: HashMap<String, String>,
    /// Decoded response body.
    pub body: String,
}

impl ReplayResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self { status, set_cookies: HashMap::new(), body: body.into() }
    }

    /// Add a re-issued cookie.
    pub fn with_set_cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_cookies.insert(name.into(), value.into());
        self
    }

    /// Whether the server re-issued a cookie with this name.
    pub fn reissued(&self, name: &str) -> bool {
        self.set_cookies.contains_key(name)
    }
}

/// Transport-level failures. All of them make a validation call fail closed.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("request failed: {0}")]
    Request(String),

    #[error("failed to read response body: {0}")]
    Body(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout
        } else if err.is_connect() {
            TransportError::Connect(err.to_string())
        } else if err.is_body() || err.is_decode() {
            TransportError::Body(err.to_string())
        } else {
            TransportError::Request(err.to_string())
        }
    }
}

/// Sends one cookie-carrying GET request.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Replay `cookies` (name, value) against `url`, following redirects.
    async fn replay(&self, url: &str, cookies: &[(String, String)]) -> Result<ReplayResponse, TransportError>;
}
