//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the appropriate implementations.
use crate::tools::{
    CookieExpiryParams, CookiesDeleteParams, CookiesListParams, CookiesUploadParams, CookiesValidateParams,
    delete_impl, expiry_impl, list_impl, upload_impl, validate_impl,
};

use crumb_client::CookieValidator;
use crumb_core::CookieDb;
use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};
use std::sync::Arc;

/// The main MCP server handler for crumb.
#[derive(Clone)]
pub struct CrumbServer {
    tool_router: ToolRouter<Self>,
    db: CookieDb,
    validator: Arc<CookieValidator>,
}

/// Tool router implementation using the #[tool_router] macro.
///
/// This macro generates the routing logic that maps tool names to handler methods.
#[tool_router]
impl CrumbServer {
    /// Create a new server handler over an open store and a configured validator.
    pub fn new(db: CookieDb, validator: Arc<CookieValidator>) -> Self {
        Self { tool_router: Self::tool_router(), db, validator }
    }

    /// Store cookies for a website.
    #[tool(
        description = "Store cookies for a website. Accepts a JSON list of cookies, a raw Cookie header string, or both. Re-uploading a name replaces it."
    )]
    async fn cookies_upload(&self, params: Parameters<CookiesUploadParams>) -> Result<CallToolResult, McpError> {
        upload_impl(&self.db, params.0).await
    }

    #[tool(description = "List stored cookies, newest first, optionally for a single website.")]
    async fn cookies_list(&self, params: Parameters<CookiesListParams>) -> Result<CallToolResult, McpError> {
        list_impl(&self.db, params.0).await
    }

    #[tool(description = "Delete one stored cookie by id.")]
    async fn cookies_delete(&self, params: Parameters<CookiesDeleteParams>) -> Result<CallToolResult, McpError> {
        delete_impl(&self.db, params.0).await
    }

    /// Validate stored cookies against their website.
    ///
    /// Issues a single GET carrying every stored cookie and records a verdict per cookie.
    #[tool(
        description = "Check whether a website still accepts the stored cookies by replaying them in one GET request. Records and returns a verdict per cookie."
    )]
    async fn cookies_validate(&self, params: Parameters<CookiesValidateParams>) -> Result<CallToolResult, McpError> {
        validate_impl(&self.db, &self.validator, params.0).await
    }

    #[tool(description = "Report which stored cookies are past their declared expiry date.")]
    async fn cookie_expiry(&self, params: Parameters<CookieExpiryParams>) -> Result<CallToolResult, McpError> {
        expiry_impl(&self.db, params.0).await
    }
}

impl ServerHandler for CrumbServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "crumb".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}
