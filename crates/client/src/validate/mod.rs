//! Cookie validation engine.
//!
//! Replays a website's stored cookies in one GET request and turns the
//! response into a verdict per cookie:
//!
//! 1. Normalize the website into a URL ([`normalize_website`]).
//! 2. Keep cookies with a non-empty name and value. When a name repeats, the
//!    later record's value is sent.
//! 3. Send them through the injected [`Transport`].
//! 4. Apply the [`ValidationPolicy`] to the response.
//!
//! Transport failures never escape: every cookie that would have been sent is
//! reported invalid instead.

pub mod policy;
pub mod url;

pub use policy::{Assessment, ValidationPolicy};
pub use url::normalize_website;

use crate::transport::{HttpTransport, ReplayConfig, Transport};
use crumb_core::{AppConfig, CookieRecord, Error, ValidationOutcome};
use std::collections::HashMap;

/// Validates stored cookies against their live website.
///
/// Holds no per-call state; share one instance (behind `Arc` if needed) so
/// the transport's connection pool is reused.
#[derive(Debug, Clone)]
pub struct CookieValidator<T = HttpTransport> {
    transport: T,
    policy: ValidationPolicy,
}

impl CookieValidator<HttpTransport> {
    /// Build the HTTP transport and policy from application configuration.
    pub fn from_config(config: &AppConfig) -> Result<Self, Error> {
        let transport = HttpTransport::new(ReplayConfig::from(config))?;
        Ok(Self::new(transport, ValidationPolicy::from(config)))
    }
}

impl<T: Transport> CookieValidator<T> {
    pub fn new(transport: T, policy: ValidationPolicy) -> Self {
        Self { transport, policy }
    }

    pub fn policy(&self) -> &ValidationPolicy {
        &self.policy
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Validate `cookies` against `website`.
    ///
    /// Returns exactly one outcome per cookie with a non-empty name and value,
    /// in input order. Cookies shadowed by a later record of the same name
    /// were not sent and are reported invalid.
    pub async fn validate(&self, website: &str, cookies: &[CookieRecord]) -> Vec<ValidationOutcome> {
        let usable: Vec<&CookieRecord> = cookies.iter().filter(|c| c.is_usable()).collect();
        if usable.is_empty() {
            tracing::debug!("no usable cookies for {}, skipping replay", website);
            return Vec::new();
        }

        // name -> index of the record whose value is sent
        let mut sent: HashMap<&str, usize> = HashMap::new();
        for (idx, cookie) in usable.iter().enumerate() {
            sent.insert(cookie.name.as_str(), idx);
        }
        let mut pairs: Vec<(usize, (String, String))> = sent
            .values()
            .map(|&idx| (idx, (usable[idx].name.clone(), usable[idx].value.clone())))
            .collect();
        pairs.sort_by_key(|(idx, _)| *idx);
        let pairs: Vec<(String, String)> = pairs.into_iter().map(|(_, pair)| pair).collect();

        let url = normalize_website(website);

        let response = match self.transport.replay(&url, &pairs).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(
                    website = %website,
                    url = %url,
                    error = %e,
                    cookies = usable.len(),
                    "replay failed, marking all cookies invalid"
                );
                return usable
                    .iter()
                    .map(|c| ValidationOutcome { cookie_id: c.id, is_valid: false })
                    .collect();
            }
        };

        let assessment = self.policy.assess(&response);
        tracing::debug!(
            "{} -> status {} (succeeded: {}, body rejected: {})",
            url,
            response.status,
            assessment.request_succeeded,
            assessment.body_rejected
        );

        usable
            .iter()
            .enumerate()
            .map(|(idx, cookie)| {
                let was_sent = sent.get(cookie.name.as_str()) == Some(&idx);
                ValidationOutcome { cookie_id: cookie.id, is_valid: was_sent && assessment.accepts(&cookie.name) }
            })
            .collect()
    }
}
