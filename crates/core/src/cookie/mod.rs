//! Stored cookie records and validation results.

pub mod expiry;
pub mod header;

pub use expiry::{is_expired, is_expired_at};
pub use header::parse_cookie_header;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A cookie row as held by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CookieRecord {
    pub id: i64,
    pub user_id: i64,
    pub website: String,
    pub name: String,
    pub value: String,
    pub domain: Option<String>,
    pub path: Option<String>,
    pub expires: Option<String>,
    /// `None` until the cookie has been validated at least once.
    pub is_valid: Option<bool>,
    pub last_validated: Option<String>,
    pub created_at: String,
}

impl CookieRecord {
    /// Whether the record carries both a name and a value worth replaying.
    pub fn is_usable(&self) -> bool {
        !self.name.is_empty() && !self.value.is_empty()
    }
}

/// A cookie submitted for storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct NewCookie {
    pub name: String,
    pub value: String,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default = "default_path")]
    pub path: String,
    #[serde(default)]
    pub expires: Option<String>,
}

fn default_path() -> String {
    "/".into()
}

impl NewCookie {
    /// A bare name/value cookie with path `/`.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self { name: name.into(), value: value.into(), domain: None, path: default_path(), expires: None }
    }
}

/// Verdict for a single stored cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ValidationOutcome {
    pub cookie_id: i64,
    pub is_valid: bool,
}

/// Tally of a store-driven validation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ValidationSummary {
    pub website: String,
    /// Stored rows for the website, including ones too empty to replay.
    pub total: usize,
    pub valid: usize,
    pub invalid: usize,
    pub outcomes: Vec<ValidationOutcome>,
}

impl ValidationSummary {
    pub fn from_outcomes(website: impl Into<String>, total: usize, outcomes: Vec<ValidationOutcome>) -> Self {
        let valid = outcomes.iter().filter(|o| o.is_valid).count();
        Self { website: website.into(), total, valid, invalid: outcomes.len() - valid, outcomes }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, value: &str) -> CookieRecord {
        CookieRecord {
            id: 1,
            user_id: 1,
            website: "example.com".into(),
            name: name.into(),
            value: value.into(),
            domain: None,
            path: Some("/".into()),
            expires: None,
            is_valid: None,
            last_validated: None,
            created_at: "2024-01-01T00:00:00Z".into(),
        }
    }

    #[test]
    fn test_is_usable() {
        assert!(record("sid", "abc").is_usable());
        assert!(!record("", "abc").is_usable());
        assert!(!record("sid", "").is_usable());
    }

    #[test]
    fn test_new_cookie_defaults_from_json() {
        let cookie: NewCookie = serde_json::from_str(r#"{"name":"sid","value":"abc"}"#).unwrap();
        assert_eq!(cookie, NewCookie::new("sid", "abc"));
    }

    #[test]
    fn test_summary_tally() {
        let outcomes = vec![
            ValidationOutcome { cookie_id: 1, is_valid: true },
            ValidationOutcome { cookie_id: 2, is_valid: false },
            ValidationOutcome { cookie_id: 3, is_valid: true },
        ];
        let summary = ValidationSummary::from_outcomes("example.com", 4, outcomes);
        assert_eq!(summary.total, 4);
        assert_eq!(summary.valid, 2);
        assert_eq!(summary.invalid, 1);
    }
}
