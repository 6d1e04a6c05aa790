//! MCP tool implementations.
//!
//! This module contains all tools exposed by the crumb server. Every tool
//! takes the caller's `user_id` as already resolved by the host; no
//! authentication happens here.

pub mod cookie_expiry;
pub mod cookies_delete;
pub mod cookies_list;
pub mod cookies_upload;
pub mod cookies_validate;

pub use cookie_expiry::{CookieExpiryParams, expiry_impl};
pub use cookies_delete::{CookiesDeleteParams, delete_impl};
pub use cookies_list::{CookiesListParams, list_impl};
pub use cookies_upload::{CookiesUploadParams, upload_impl};
pub use cookies_validate::{CookiesValidateParams, validate_impl};

use crumb_core::Error;
use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use serde::Serialize;

/// Serialize a tool output as pretty JSON text content.
pub(crate) fn json_result<T: Serialize>(output: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(output)
        .map_err(|e| Error::InvalidInput(format!("Failed to serialize output: {e}")))?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}
