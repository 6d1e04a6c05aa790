//! cookies_delete tool implementation.

use super::json_result;
use crumb_core::{CookieDb, Error};
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for the cookies_delete tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CookiesDeleteParams {
    /// Caller's user id.
    pub user_id: i64,

    /// Id of the cookie to delete.
    pub cookie_id: i64,
}

/// Output from the cookies_delete tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CookiesDeleteOutput {
    pub cookie_id: i64,
    pub deleted: bool,
}

/// Implementation of the cookies_delete tool.
pub async fn delete_impl(db: &CookieDb, params: CookiesDeleteParams) -> Result<CallToolResult, McpError> {
    if !db.delete_cookie(params.user_id, params.cookie_id).await? {
        return Err(Error::CookieNotFound(params.cookie_id).into());
    }

    json_result(&CookiesDeleteOutput { cookie_id: params.cookie_id, deleted: true })
}
