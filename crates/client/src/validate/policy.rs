//! Acceptance heuristic for replayed cookies.
//!
//! There is no generic way to ask a site whether a session is still good, so
//! the verdict leans on three signals from a single response:
//!
//! - **Re-issue**: the server set a cookie with the same name. Accepted,
//!   whatever the status or body says.
//! - **Body**: the lower-cased body contains at least `rejection_threshold`
//!   distinct indicator phrases (`login`, `session expired`, ...). Rejected.
//! - **Status**: otherwise the cookie is accepted iff the status is one of
//!   `accepted_statuses`.
//!
//! Given the same response the verdicts are always the same.

use crate::transport::ReplayResponse;
use crumb_core::AppConfig;
use crumb_core::config::{DEFAULT_ACCEPTED_STATUSES, DEFAULT_INDICATOR_PHRASES, DEFAULT_REJECTION_THRESHOLD};

/// Policy constants for the acceptance heuristic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationPolicy {
    accepted_statuses: Vec<u16>,
    indicator_phrases: Vec<String>,
    rejection_threshold: usize,
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self::new(
            DEFAULT_ACCEPTED_STATUSES.to_vec(),
            DEFAULT_INDICATOR_PHRASES.iter().map(|p| p.to_string()).collect(),
            DEFAULT_REJECTION_THRESHOLD,
        )
    }
}

impl From<&AppConfig> for ValidationPolicy {
    fn from(config: &AppConfig) -> Self {
        Self::new(config.accepted_statuses.clone(), config.indicator_phrases.clone(), config.rejection_threshold)
    }
}

impl ValidationPolicy {
    /// Phrases are lower-cased and de-duplicated so counts stay distinct.
    pub fn new(accepted_statuses: Vec<u16>, indicator_phrases: Vec<String>, rejection_threshold: usize) -> Self {
        let mut phrases: Vec<String> = Vec::with_capacity(indicator_phrases.len());
        for phrase in indicator_phrases {
            let phrase = phrase.to_lowercase();
            if !phrase.is_empty() && !phrases.contains(&phrase) {
                phrases.push(phrase);
            }
        }

        Self { accepted_statuses, indicator_phrases: phrases, rejection_threshold }
    }

    pub fn accepted_statuses(&self) -> &[u16] {
        &self.accepted_statuses
    }

    pub fn indicator_phrases(&self) -> &[String] {
        &self.indicator_phrases
    }

    pub fn rejection_threshold(&self) -> usize {
        self.rejection_threshold
    }

    /// Coarse success signal for the whole request.
    pub fn request_succeeded(&self, status: u16) -> bool {
        self.accepted_statuses.contains(&status)
    }

    /// Number of distinct indicator phrases occurring in `body`.
    pub fn indicator_count(&self, body: &str) -> usize {
        let body = body.to_lowercase();
        self.indicator_phrases
            .iter()
            .filter(|phrase| body.contains(phrase.as_str()))
            .count()
    }

    /// Whether the body reads like a login wall or an expired session.
    pub fn body_rejects(&self, body: &str) -> bool {
        self.indicator_count(body) >= self.rejection_threshold
    }

    /// Evaluate the response-wide signals once.
    pub fn assess<'a>(&self, response: &'a ReplayResponse) -> Assessment<'a> {
        Assessment {
            response,
            request_succeeded: self.request_succeeded(response.status),
            body_rejected: self.body_rejects(&response.body),
        }
    }
}

/// Response-wide signals, ready to be applied per cookie name.
#[derive(Debug, Clone, Copy)]
pub struct Assessment<'a> {
    response: &'a ReplayResponse,
    pub request_succeeded: bool,
    pub body_rejected: bool,
}

impl Assessment<'_> {
    /// Verdict for one cookie name.
    pub fn accepts(&self, name: &str) -> bool {
        if self.response.reissued(name) {
            return true;
        }
        !self.body_rejected && self.request_succeeded
    }
}
