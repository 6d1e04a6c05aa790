//! cookies_validate tool implementation.
//!
//! Replays a user's stored cookies against their website and records which
//! ones the site still accepts.

use super::json_result;
use crumb_client::{CookieValidator, Transport};
use crumb_core::CookieDb;
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for the cookies_validate tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CookiesValidateParams {
    /// Caller's user id.
    pub user_id: i64,

    /// Website whose stored cookies should be validated.
    pub website: String,
}

/// Implementation of the cookies_validate tool.
///
/// Returns a [`crumb_core::ValidationSummary`]. Network failures mark every
/// cookie invalid rather than failing the call.
pub async fn validate_impl<T: Transport>(
    db: &CookieDb, validator: &CookieValidator<T>, params: CookiesValidateParams,
) -> Result<CallToolResult, McpError> {
    let summary = validator
        .validate_stored(db, params.user_id, &params.website)
        .await?;

    json_result(&summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::output;
    use async_trait::async_trait;
    use crumb_client::{ReplayResponse, TransportError, ValidationPolicy};
    use crumb_core::{NewCookie, ValidationSummary};

    struct StubTransport(Result<ReplayResponse, TransportError>);

    #[async_trait]
    impl Transport for StubTransport {
        async fn replay(&self, _url: &str, _cookies: &[(String, String)]) -> Result<ReplayResponse, TransportError> {
            self.0.clone()
        }
    }

    fn validator(result: Result<ReplayResponse, TransportError>) -> CookieValidator<StubTransport> {
        CookieValidator::new(StubTransport(result), ValidationPolicy::default())
    }

    async fn seeded_db() -> CookieDb {
        let db = CookieDb::open_in_memory().await.unwrap();
        db.save_cookies(1, "example.com", &[NewCookie::new("sid", "abc"), NewCookie::new("theme", "dark")])
            .await
            .unwrap();
        db
    }

    #[tokio::test]
    async fn test_validate_accepted_and_persisted() {
        let db = seeded_db().await;
        let validator = validator(Ok(ReplayResponse::new(200, "<h1>Dashboard</h1>")));

        let result = validate_impl(&db, &validator, CookiesValidateParams { user_id: 1, website: "example.com".into() })
            .await
            .unwrap();

        let summary: ValidationSummary = output(&result);
        assert_eq!(summary.total, 2);
        assert_eq!(summary.valid, 2);
        assert_eq!(summary.invalid, 0);

        let stored = db.list_cookies(1, Some("example.com")).await.unwrap();
        assert!(stored.iter().all(|c| c.is_valid == Some(true)));
        assert!(stored.iter().all(|c| c.last_validated.is_some()));
    }

    #[tokio::test]
    async fn test_validate_login_page_rejects() {
        let db = seeded_db().await;
        let validator = validator(Ok(ReplayResponse::new(200, "Please login. Your session expired.")));

        let result = validate_impl(&db, &validator, CookiesValidateParams { user_id: 1, website: "example.com".into() })
            .await
            .unwrap();

        let summary: ValidationSummary = output(&result);
        assert_eq!(summary.valid, 0);
        assert_eq!(summary.invalid, 2);
    }

    #[tokio::test]
    async fn test_validate_network_failure_is_not_an_error() {
        let db = seeded_db().await;
        let validator = validator(Err(TransportError::Timeout));

        let result = validate_impl(&db, &validator, CookiesValidateParams { user_id: 1, website: "example.com".into() })
            .await
            .unwrap();

        let summary: ValidationSummary = output(&result);
        assert_eq!(summary.invalid, 2);
    }

    #[tokio::test]
    async fn test_validate_without_cookies() {
        let db = CookieDb::open_in_memory().await.unwrap();
        let validator = validator(Ok(ReplayResponse::new(200, "")));

        let err = validate_impl(&db, &validator, CookiesValidateParams { user_id: 1, website: "example.com".into() })
            .await
            .unwrap_err();
        assert_eq!(err.code.0, -32001);
    }
}
