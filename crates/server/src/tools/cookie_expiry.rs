//! cookie_expiry tool implementation.
//!
//! Reports which stored cookies are past their declared expiry. Cookies
//! with no expiry, or one that can't be parsed, are reported as live.

use super::json_result;
use chrono::{DateTime, SecondsFormat, Utc};
use crumb_core::cookie::{expiry::parse_expiry, is_expired_at};
use crumb_core::{CookieDb, CookieRecord};
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for the cookie_expiry tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CookieExpiryParams {
    /// Caller's user id.
    pub user_id: i64,

    /// Only check cookies for this website.
    #[serde(default)]
    pub website: Option<String>,
}

/// Expiry status of one stored cookie.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CookieExpiryEntry {
    pub cookie_id: i64,
    pub website: String,
    pub name: String,
    /// Expiry exactly as stored.
    pub expires: Option<String>,
    /// Parsed expiry in RFC 3339, if the stored value was recognised.
    pub expires_at: Option<String>,
    pub expired: bool,
}

/// Output from the cookie_expiry tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CookieExpiryOutput {
    pub checked_at: String,
    pub cookies: Vec<CookieExpiryEntry>,
    pub expired: usize,
}

fn entry(cookie: CookieRecord, now: DateTime<Utc>) -> CookieExpiryEntry {
    let parsed = cookie.expires.as_deref().and_then(parse_expiry);
    let expired = cookie.expires.as_deref().is_some_and(|e| is_expired_at(e, now));

    CookieExpiryEntry {
        cookie_id: cookie.id,
        website: cookie.website,
        name: cookie.name,
        expires: cookie.expires,
        expires_at: parsed.map(|at| at.to_rfc3339_opts(SecondsFormat::Secs, true)),
        expired,
    }
}

/// Implementation of the cookie_expiry tool.
pub async fn expiry_impl(db: &CookieDb, params: CookieExpiryParams) -> Result<CallToolResult, McpError> {
    let website = params.website.as_deref().map(str::trim).filter(|w| !w.is_empty());
    let cookies = db.list_cookies(params.user_id, website).await?;

    let now = Utc::now();
    let cookies: Vec<_> = cookies.into_iter().map(|c| entry(c, now)).collect();
    let expired = cookies.iter().filter(|c| c.expired).count();

    json_result(&CookieExpiryOutput {
        checked_at: now.to_rfc3339_opts(SecondsFormat::Secs, true),
        cookies,
        expired,
    })
}
