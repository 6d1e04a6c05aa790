//! cookies_list tool implementation.

use super::json_result;
use crumb_core::{CookieDb, CookieRecord};
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for the cookies_list tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CookiesListParams {
    /// Caller's user id.
    pub user_id: i64,

    /// Only list cookies for this website.
    #[serde(default)]
    pub website: Option<String>,
}

/// Output from the cookies_list tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CookiesListOutput {
    /// Newest first.
    pub cookies: Vec<CookieRecord>,
    pub count: usize,
}

/// Implementation of the cookies_list tool.
pub async fn list_impl(db: &CookieDb, params: CookiesListParams) -> Result<CallToolResult, McpError> {
    let website = params.website.as_deref().map(str::trim).filter(|w| !w.is_empty());
    let cookies = db.list_cookies(params.user_id, website).await?;

    json_result(&CookiesListOutput { count: cookies.len(), cookies })
}
