//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the appropriate implementations.
use std::future::Future;
use std::sync::Arc;

use crate::services::Services;
use crate::tools::backlinks::{BacklinksParams, backlinks_impl};
use crate::tools::keyword_difficulty::{KeywordDifficultyParams, keyword_difficulty_impl};
use crate::tools::keyword_generator::{KeywordGeneratorParams, keyword_generator_impl};
use crate::tools::traffic::{TrafficParams, traffic_impl};

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
use seo_mcp_core::Error;

/// The main MCP server handler for seo-mcp.
#[derive(Clone)]
pub struct SeoMcpServer {
    tool_router: ToolRouter<Self>,
    services: Arc<Services>,
}

/// Run a tool body until it finishes or `cancelled` resolves, whichever is first.
async fn cancellable<F, C>(cancelled: C, work: F) -> Result<CallToolResult, McpError>
where
    F: Future<Output = Result<CallToolResult, McpError>>,
    C: Future<Output = ()>,
{
    tokio::select! {
        result = work => result,
        () = cancelled => {
            tracing::debug!("tool call cancelled");
            Err(Error::Cancelled("request cancelled by client".into()).into())
        }
    }
}

/// Tool router implementation using the #[tool_router] macro.
///
/// This macro generates the routing logic that maps tool names to handler methods.
#[tool_router]
impl SeoMcpServer {
    /// Create a new server handler.
    pub fn new(services: Arc<Services>) -> Self {
        Self { tool_router: Self::tool_router(), services }
    }

    /// Top backlinks for a domain, plus the domain overview.
    ///
    /// Reuses a cached signature for the domain while it is valid; otherwise
    /// solves a captcha to obtain a new one.
    #[tool(
        description = "Get the top backlinks for a domain. Returns the domain overview and a list of backlinks with anchor, domainRating, title, urlFrom, urlTo, edu and gov."
    )]
    async fn get_backlinks_list(
        &self, params: Parameters<BacklinksParams>, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        cancellable(context.ct.cancelled(), backlinks_impl(&self.services, params.0)).await
    }

    #[tool(
        description = "Generate keyword ideas and question ideas for a seed keyword. Returns a list of {label, value} records with keyword, country, difficulty, volume and updatedAt."
    )]
    async fn keyword_generator(
        &self, params: Parameters<KeywordGeneratorParams>, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        cancellable(context.ct.cancelled(), keyword_generator_impl(&self.services, params.0)).await
    }

    #[tool(
        description = "Estimate search traffic for a domain or URL. Returns traffic history, monthly averages, top pages, top countries and top keywords, or null."
    )]
    async fn get_traffic(
        &self, params: Parameters<TrafficParams>, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        cancellable(context.ct.cancelled(), traffic_impl(&self.services, params.0)).await
    }

    #[tool(
        description = "Get keyword difficulty for a keyword. Returns difficulty, shortage, lastUpdate and the organic SERP with per-result metrics, or null."
    )]
    async fn keyword_difficulty(
        &self, params: Parameters<KeywordDifficultyParams>, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        cancellable(context.ct.cancelled(), keyword_difficulty_impl(&self.services, params.0)).await
    }
}

impl ServerHandler for SeoMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "seo-mcp".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            instructions: Some(
                "SEO research tools backed by Ahrefs' free checkers: backlinks, keyword ideas, keyword difficulty and traffic estimates.".into(),
            ),
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

#[cfg(test)]
mod tests {
    use super::*;
    use seo_mcp_core::AppConfig;

    fn server() -> SeoMcpServer {
        let services = Services::from_config(&AppConfig::default()).unwrap();
        SeoMcpServer::new(Arc::new(services))
    }

    #[test]
    fn test_lists_four_tools() {
        let mut names: Vec<String> = server()
            .tool_router
            .list_all()
            .into_iter()
            .map(|tool| tool.name.to_string())
            .collect();
        names.sort();

        assert_eq!(names, ["get_backlinks_list", "get_traffic", "keyword_difficulty", "keyword_generator"]);
    }

    #[tokio::test]
    async fn test_cancelled_call_reports_cancelled() {
        let err = cancellable(std::future::ready(()), std::future::pending()).await.unwrap_err();
        assert_eq!(err.code.0, -32800);
    }

    #[tokio::test]
    async fn test_finished_call_wins() {
        let result = cancellable(std::future::pending(), async { Ok(CallToolResult::success(vec![])) }).await;
        assert!(result.is_ok());
    }

    #[test]
    fn test_server_info() {
        let info = server().get_info();
        assert_eq!(info.server_info.name, "seo-mcp");
        assert!(info.capabilities.tools.is_some());
    }
}
