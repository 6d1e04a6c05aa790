//! SQLite-backed cookie storage.
//!
//! Persistent storage using SQLite with async access via tokio-rusqlite:
//!
//! - Automatic schema migrations
//! - WAL mode for concurrent access
//! - Upsert per (user, website, cookie name)
//!
//! The validation engine only needs the narrow [`CookieStore`] view of it.

pub mod connection;
pub mod cookies;

pub use connection::CookieDb;

use crate::Error;
use crate::cookie::{CookieRecord, ValidationOutcome};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Storage capabilities required by store-driven validation.
#[async_trait]
pub trait CookieStore: Send + Sync {
    /// All stored cookies for a (user, website) pair.
    async fn cookies_for_website(&self, user_id: i64, website: &str) -> Result<Vec<CookieRecord>, Error>;

    /// Persist a validation run's verdicts, keyed by cookie identity.
    ///
    /// Implementations write all of them or none.
    async fn record_validities(&self, outcomes: &[ValidationOutcome], validated_at: DateTime<Utc>) -> Result<(), Error>;
}

#[async_trait]
impl CookieStore for CookieDb {
    async fn cookies_for_website(&self, user_id: i64, website: &str) -> Result<Vec<CookieRecord>, Error> {
        self.list_cookies(user_id, Some(website)).await
    }

    async fn record_validities(&self, outcomes: &[ValidationOutcome], validated_at: DateTime<Utc>) -> Result<(), Error> {
        let updated = self.set_validities(outcomes, validated_at).await?;
        if updated < outcomes.len() {
            tracing::warn!(
                missing = outcomes.len() - updated,
                "verdicts for cookies that no longer exist"
            );
        }
        Ok(())
    }
}
