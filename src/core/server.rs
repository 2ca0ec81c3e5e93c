//! MCP Server implementation and lifecycle management.
//!
//! The server implements the MCP protocol by delegating to the tool router:
//! `tools/list` advertises the tool set for the session's navigation state,
//! and `tools/call` dispatches by name. Both `ServerHandler` methods are
//! hand-written because the visible tool set depends on mutable session
//! state and must be re-derived on every listing.

use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler, model::*, service::RequestContext,
};
use std::sync::Arc;
use tracing::{info, instrument};

use super::config::Config;
use crate::client::ClientAccessor;
use crate::domains::{SessionState, ToolRouter};

/// The main MCP server handler.
///
/// Cloning is cheap: clones share the router and client cache but can carry
/// their own session (see [`McpServer::with_session`]), which is how the
/// HTTP transport gives each session its own navigation state.
#[derive(Clone)]
pub struct McpServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Router resolving tool calls to navigation or domain handlers.
    router: Arc<ToolRouter>,

    /// Navigation state for the session this instance serves.
    session: SessionState,
}

impl McpServer {
    /// Create a new MCP server with the given configuration.
    pub fn new(config: Config) -> Self {
        let config = Arc::new(config);
        let accessor = Arc::new(ClientAccessor::new(config.credentials.clone()));

        Self {
            router: Arc::new(ToolRouter::new(accessor)),
            session: SessionState::new(),
            config,
        }
    }

    /// A handle onto the same server serving a different session.
    pub fn with_session(&self, session: SessionState) -> Self {
        Self {
            config: self.config.clone(),
            router: self.router.clone(),
            session,
        }
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    /// Get the server configuration.
    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    /// The session this instance serves.
    pub fn session(&self) -> &SessionState {
        &self.session
    }

    // ========================================================================
    // HTTP Transport Support Methods
    // ========================================================================

    /// List the tools visible to this session (for HTTP transport).
    pub fn list_tools(&self) -> Vec<serde_json::Value> {
        self.router
            .visible_tools(&self.session)
            .into_iter()
            .map(|t| {
                serde_json::json!({
                    "name": t.name,
                    "description": t.description,
                    "inputSchema": t.input_schema
                })
            })
            .collect()
    }

    /// Call a tool by name (for HTTP transport).
    ///
    /// Always returns a result envelope; faults are represented by
    /// `isError: true`, never by a protocol-level error.
    pub async fn call_tool(&self, name: &str, arguments: serde_json::Value) -> serde_json::Value {
        let args = arguments.as_object().cloned().unwrap_or_default();
        let result = self.router.dispatch(&self.session, name, args).await;

        serde_json::json!({
            "content": result.content,
            "isError": result.is_error.unwrap_or(false)
        })
    }
}

impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Liongard MCP server with decision-tree navigation. Use liongard_navigate to \
                 select a domain; domain-specific tools become available after navigation, and \
                 liongard_back returns to domain selection."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    #[instrument(skip(self, _context))]
    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        let tools = self.router.visible_tools(&self.session);
        info!("Listing {} tool(s)", tools.len());
        Ok(ListToolsResult {
            tools,
            next_cursor: None,
            meta: None,
        })
    }

    #[instrument(skip_all, fields(tool = %request.name))]
    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        info!("Calling tool: {}", request.name);
        let args = request.arguments.unwrap_or_default();
        Ok(self.router.dispatch(&self.session, &request.name, args).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::Domain;
    use serde_json::json;

    fn server() -> McpServer {
        McpServer::new(Config::default())
    }

    #[test]
    fn test_root_listing_shows_only_navigate() {
        let server = server();
        let tools = server.list_tools();
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0]["name"], "liongard_navigate");
    }

    #[tokio::test]
    async fn test_navigation_changes_subsequent_listings() {
        let server = server();

        let result = server
            .call_tool("liongard_navigate", json!({"domain": "agents"}))
            .await;
        assert_eq!(result["isError"], json!(false));
        assert_eq!(server.session().current_domain(), Some(Domain::Agents));

        let tools = server.list_tools();
        assert_eq!(tools[0]["name"], "liongard_back");
        assert_eq!(tools.len(), 4);

        server.call_tool("liongard_back", json!({})).await;
        assert_eq!(server.list_tools().len(), 1);
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let server = server();
        let other = server.with_session(SessionState::new());

        server
            .call_tool("liongard_navigate", json!({"domain": "metrics"}))
            .await;

        assert_eq!(server.session().current_domain(), Some(Domain::Metrics));
        assert_eq!(other.session().current_domain(), None);
        assert_eq!(other.list_tools().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_tool_yields_error_envelope() {
        let server = server();
        let result = server.call_tool("totally_unknown_tool", json!({})).await;
        assert_eq!(result["isError"], json!(true));
    }
}
