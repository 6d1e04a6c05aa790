//! cookies_upload tool implementation.
//!
//! Stores cookies for a website, from a JSON list, a raw `Cookie` header
//! string, or both.

use super::json_result;
use crumb_core::cookie::parse_cookie_header;
use crumb_core::{CookieDb, Error, NewCookie};
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for the cookies_upload tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CookiesUploadParams {
    /// Caller's user id.
    pub user_id: i64,

    /// Website the cookies belong to (e.g. "example.com").
    pub website: String,

    /// Structured cookies. Entries without both a name and a value are ignored.
    #[serde(default)]
    pub cookies: Vec<NewCookie>,

    /// Raw header string such as "sid=abc; theme=dark".
    #[serde(default)]
    pub cookie_header: Option<String>,
}

/// Output from the cookies_upload tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CookiesUploadOutput {
    pub website: String,
    /// Number of cookies stored.
    pub count: usize,
}

/// Implementation of the cookies_upload tool.
pub async fn upload_impl(db: &CookieDb, params: CookiesUploadParams) -> Result<CallToolResult, McpError> {
    let website = params.website.trim();
    if website.is_empty() {
        return Err(Error::InvalidInput("website is required".into()).into());
    }

    let mut cookies: Vec<NewCookie> = params
        .cookie_header
        .as_deref()
        .map(parse_cookie_header)
        .unwrap_or_default()
        .into_iter()
        .filter(|c| !c.name.is_empty())
        .collect();

    cookies.extend(
        params
            .cookies
            .into_iter()
            .filter(|c| !c.name.is_empty() && !c.value.is_empty()),
    );

    if cookies.is_empty() {
        return Err(Error::InvalidInput("no valid cookies provided".into()).into());
    }

    let count = db.save_cookies(params.user_id, website, &cookies).await?;
    tracing::debug!(user_id = params.user_id, website, count, "stored cookies");

    json_result(&CookiesUploadOutput { website: website.to_string(), count })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::output;

    fn params(website: &str, cookies: Vec<NewCookie>, header: Option<&str>) -> CookiesUploadParams {
        CookiesUploadParams {
            user_id: 1,
            website: website.into(),
            cookies,
            cookie_header: header.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_upload_header_and_list() {
        let db = CookieDb::open_in_memory().await.unwrap();

        let result = upload_impl(
            &db,
            params(" example.com ", vec![NewCookie::new("lang", "en"), NewCookie::new("blank", "")], Some("sid=abc; theme=dark")),
        )
        .await
        .unwrap();

        let out: CookiesUploadOutput = output(&result);
        assert_eq!(out.website, "example.com");
        assert_eq!(out.count, 3);

        let stored = db.list_cookies(1, Some("example.com")).await.unwrap();
        let mut names: Vec<_> = stored.iter().map(|c| c.name.as_str()).collect();
        names.sort();
        assert_eq!(names, vec!["lang", "sid", "theme"]);
    }

    #[tokio::test]
    async fn test_upload_requires_website() {
        let db = CookieDb::open_in_memory().await.unwrap();
        let result = upload_impl(&db, params("  ", vec![NewCookie::new("sid", "abc")], None)).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_upload_requires_cookies() {
        let db = CookieDb::open_in_memory().await.unwrap();
        let result = upload_impl(&db, params("example.com", vec![NewCookie::new("sid", "")], Some("noequals"))).await;
        let err = result.unwrap_err();
        assert_eq!(err.code.0, -32602);
    }

    #[test]
    fn test_params_from_json() {
        let params: CookiesUploadParams = serde_json::from_str(
            r#"{"user_id": 3, "website": "example.com", "cookies": [{"name": "sid", "value": "abc", "domain": ".example.com"}]}"#,
        )
        .unwrap();
        assert_eq!(params.cookies[0].path, "/");
        assert_eq!(params.cookies[0].domain.as_deref(), Some(".example.com"));
        assert!(params.cookie_header.is_none());
    }
}
