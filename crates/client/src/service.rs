//! Store-driven validation: read a website's cookies, validate them, write
//! the verdicts back.

use crate::transport::Transport;
use crate::validate::CookieValidator;
use chrono::Utc;
use crumb_core::{CookieStore, Error, ValidationSummary};

impl<T: Transport> CookieValidator<T> {
    /// Validate every stored cookie a user holds for `website` and persist
    /// the verdicts as one batch stamped with the current time.
    ///
    /// # Errors
    ///
    /// - `Error::InvalidInput` if `website` is blank
    /// - `Error::NoCookies` if the user has nothing stored for it
    /// - any store error from reading or writing rows
    ///
    /// Network trouble is not an error here; it shows up as invalid verdicts.
    pub async fn validate_stored<S>(&self, store: &S, user_id: i64, website: &str) -> Result<ValidationSummary, Error>
    where
        S: CookieStore + ?Sized,
    {
        let website = website.trim();
        if website.is_empty() {
            return Err(Error::InvalidInput("website is required".into()));
        }

        let cookies = store.cookies_for_website(user_id, website).await?;
        if cookies.is_empty() {
            return Err(Error::NoCookies(website.to_string()));
        }

        let outcomes = self.validate(website, &cookies).await;

        store.record_validities(&outcomes, Utc::now()).await?;

        let summary = ValidationSummary::from_outcomes(website, cookies.len(), outcomes);
        tracing::info!(
            user_id,
            website = %summary.website,
            total = summary.total,
            valid = summary.valid,
            invalid = summary.invalid,
            "validated stored cookies"
        );

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use crate::transport::{ReplayResponse, TransportError};
    use crate::validate::ValidationPolicy;
    use crate::validate::tests::FakeTransport;
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use crumb_core::{CookieDb, CookieRecord, CookieStore, Error, NewCookie, ValidationOutcome};
    use std::sync::Mutex;

    use super::CookieValidator;

    async fn db_with(cookies: &[NewCookie]) -> CookieDb {
        let db = CookieDb::open_in_memory().await.unwrap();
        db.save_cookies(7, "example.com", cookies).await.unwrap();
        db
    }

    #[tokio::test]
    async fn test_validate_stored_persists_verdicts() {
        let db = db_with(&[NewCookie::new("sid", "abc"), NewCookie::new("lang", "en")]).await;
        let response = ReplayResponse::new(200, "Session expired. Sign in again.").with_set_cookie("lang", "en");
        let validator = CookieValidator::new(FakeTransport::responding(response), ValidationPolicy::default());

        let summary = validator.validate_stored(&db, 7, "  example.com ").await.unwrap();

        assert_eq!(summary.website, "example.com");
        assert_eq!(summary.total, 2);
        assert_eq!(summary.valid, 1);
        assert_eq!(summary.invalid, 1);

        let stored = db.list_cookies(7, Some("example.com")).await.unwrap();
        let sid = stored.iter().find(|c| c.name == "sid").unwrap();
        let lang = stored.iter().find(|c| c.name == "lang").unwrap();
        assert_eq!(sid.is_valid, Some(false));
        assert_eq!(lang.is_valid, Some(true));
        assert!(sid.last_validated.is_some());
        assert_eq!(sid.last_validated, lang.last_validated);
    }

    #[tokio::test]
    async fn test_validate_stored_counts_unusable_rows_in_total() {
        let db = db_with(&[NewCookie::new("sid", "abc"), NewCookie::new("empty", "")]).await;
        let validator =
            CookieValidator::new(FakeTransport::responding(ReplayResponse::new(200, "")), ValidationPolicy::default());

        let summary = validator.validate_stored(&db, 7, "example.com").await.unwrap();

        assert_eq!(summary.total, 2);
        assert_eq!(summary.outcomes.len(), 1);
        let empty = db
            .list_cookies(7, Some("example.com"))
            .await
            .unwrap()
            .into_iter()
            .find(|c| c.name == "empty")
            .unwrap();
        assert!(empty.is_valid.is_none());
    }

    #[tokio::test]
    async fn test_validate_stored_transport_failure_marks_invalid() {
        let db = db_with(&[NewCookie::new("sid", "abc")]).await;
        let validator =
            CookieValidator::new(FakeTransport::failing(TransportError::Timeout), ValidationPolicy::default());

        let summary = validator.validate_stored(&db, 7, "example.com").await.unwrap();

        assert_eq!(summary.invalid, 1);
        let stored = db.list_cookies(7, Some("example.com")).await.unwrap();
        assert_eq!(stored[0].is_valid, Some(false));
    }

    #[tokio::test]
    async fn test_validate_stored_no_cookies() {
        let db = db_with(&[NewCookie::new("sid", "abc")]).await;
        let validator =
            CookieValidator::new(FakeTransport::responding(ReplayResponse::new(200, "")), ValidationPolicy::default());

        let other_user = validator.validate_stored(&db, 8, "example.com").await;
        assert!(matches!(other_user, Err(Error::NoCookies(w)) if w == "example.com"));

        let other_site = validator.validate_stored(&db, 7, "other.com").await;
        assert!(matches!(other_site, Err(Error::NoCookies(_))));
        assert_eq!(validator.transport().call_count(), 0);
    }

    #[tokio::test]
    async fn test_validate_stored_blank_website() {
        let db = CookieDb::open_in_memory().await.unwrap();
        let validator =
            CookieValidator::new(FakeTransport::responding(ReplayResponse::new(200, "")), ValidationPolicy::default());

        let result = validator.validate_stored(&db, 7, "   ").await;
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    /// Store whose writes always fail; remembers the size of each write batch.
    struct ReadOnlyStore {
        rows: Vec<CookieRecord>,
        writes: Mutex<Vec<usize>>,
    }

    #[async_trait]
    impl CookieStore for ReadOnlyStore {
        async fn cookies_for_website(&self, _user_id: i64, _website: &str) -> Result<Vec<CookieRecord>, Error> {
            Ok(self.rows.clone())
        }

        async fn record_validities(&self, outcomes: &[ValidationOutcome], _at: DateTime<Utc>) -> Result<(), Error> {
            self.writes.lock().unwrap().push(outcomes.len());
            Err(Error::InvalidInput("store is read-only".into()))
        }
    }

    #[tokio::test]
    async fn test_validate_stored_propagates_store_errors() {
        let store = ReadOnlyStore {
            rows: vec![
                crate::validate::tests::record(1, "sid", "abc"),
                crate::validate::tests::record(2, "lang", "en"),
            ],
            writes: Mutex::new(Vec::new()),
        };
        let validator =
            CookieValidator::new(FakeTransport::responding(ReplayResponse::new(200, "")), ValidationPolicy::default());

        let result = validator.validate_stored(&store, 1, "example.com").await;

        assert!(matches!(result, Err(Error::InvalidInput(_))));
        assert_eq!(*store.writes.lock().unwrap(), vec![2]);
    }
}
