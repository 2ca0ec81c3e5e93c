//! HTTP transport implementation.
//!
//! HTTP server with JSON-RPC over POST requests. Sessions are keyed by the
//! `Mcp-Session-Id` header so each client gets its own navigation state; the
//! header is echoed on every response and generated at `initialize` when the
//! client did not supply one.
//!
//! In gateway mode, Liongard credentials are extracted from the
//! `x-liongard-api-key` / `x-liongard-instance` headers on every request and
//! bound to the session; requests without both headers are rejected with 401
//! before any tool processing.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, instrument, warn};

use super::{TransportError, TransportResult, config::HttpConfig};
use crate::client::Credentials;
use crate::core::config::AuthMode;
use crate::core::McpServer;
use crate::domains::SessionState;

/// Request header carrying the tenant API key in gateway mode.
const API_KEY_HEADER: &str = "x-liongard-api-key";

/// Request header carrying the tenant instance in gateway mode.
const INSTANCE_HEADER: &str = "x-liongard-instance";

/// Header identifying the client session.
const SESSION_ID_HEADER: &str = "mcp-session-id";

/// Sessions idle longer than this are pruned.
const SESSION_TTL: Duration = Duration::from_secs(3600);

/// HTTP transport handler.
pub struct HttpTransport {
    config: HttpConfig,
}

/// JSON-RPC request structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    pub method: String,
    #[serde(default)]
    pub params: Option<serde_json::Value>,
}

/// JSON-RPC response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

/// JSON-RPC error structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl JsonRpcResponse {
    /// Create a success response.
    pub fn success(id: Option<serde_json::Value>, result: serde_json::Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Create an error response.
    pub fn error(id: Option<serde_json::Value>, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
                data: None,
            }),
        }
    }

    /// Method not found error.
    pub fn method_not_found(id: Option<serde_json::Value>) -> Self {
        Self::error(id, -32601, "Method not found")
    }

    /// Invalid request error.
    pub fn invalid_request(id: Option<serde_json::Value>) -> Self {
        Self::error(id, -32600, "Invalid Request")
    }

    /// Invalid params error.
    pub fn invalid_params(id: Option<serde_json::Value>, msg: impl Into<String>) -> Self {
        Self::error(id, -32602, msg)
    }
}

/// Application state shared across HTTP handlers.
#[derive(Clone)]
struct AppState {
    /// The MCP server instance.
    server: McpServer,
    /// Credential supply mode.
    auth_mode: AuthMode,
    /// Navigation state per client session.
    sessions: Arc<RwLock<HashMap<String, SessionEntry>>>,
}

struct SessionEntry {
    state: SessionState,
    last_seen: Instant,
}

impl AppState {
    /// Look up (or create) the session named by the request headers,
    /// pruning idle sessions along the way.
    async fn resolve_session(&self, headers: &HeaderMap) -> (String, SessionState) {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        sessions.retain(|_, entry| now.duration_since(entry.last_seen) < SESSION_TTL);

        let session_id = header_value(headers, SESSION_ID_HEADER)
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

        let entry = sessions
            .entry(session_id.clone())
            .or_insert_with(|| SessionEntry {
                state: SessionState::new(),
                last_seen: now,
            });
        entry.last_seen = now;

        (session_id, entry.state.clone())
    }
}

impl HttpTransport {
    /// Create a new HTTP transport with the given config.
    pub fn new(config: HttpConfig) -> Self {
        Self { config }
    }

    /// Get the bind address.
    pub fn address(&self) -> String {
        format!("{}:{}", self.config.host, self.config.port)
    }

    /// Run the HTTP transport.
    pub async fn run(self, server: McpServer) -> TransportResult<()> {
        let addr = self.address();
        let auth_mode = server.config().auth_mode;

        let state = AppState {
            server,
            auth_mode,
            sessions: Arc::new(RwLock::new(HashMap::new())),
        };

        // Build router
        let mut app = Router::new()
            .route(&self.config.rpc_path, post(handle_rpc))
            .route("/health", get(health_check))
            .route("/", get(root_handler))
            .fallback(not_found)
            .with_state(state);

        // Add CORS if enabled
        if self.config.enable_cors {
            let cors = CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any);
            app = app.layer(cors);
        }

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| TransportError::bind(&addr, e))?;

        info!("Ready - listening on {} (JSON-RPC over HTTP)", addr);
        info!("  → JSON-RPC: POST {}", self.config.rpc_path);
        info!("  → Health:   GET /health");
        info!("Authentication mode: {}", auth_mode.as_str());

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| TransportError::http(e.to_string()))?;

        info!("HTTP transport finished");
        Ok(())
    }
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        warn!("Failed to listen for shutdown signal");
        return;
    }
    info!("Shutting down Liongard MCP server...");
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .filter(|s| !s.is_empty())
}

/// Extract gateway credentials, or the 401 response rejecting the request.
fn gateway_credentials(
    auth_mode: AuthMode,
    headers: &HeaderMap,
) -> Result<Option<Credentials>, Response> {
    if auth_mode != AuthMode::Gateway {
        return Ok(None);
    }

    match (
        header_value(headers, API_KEY_HEADER),
        header_value(headers, INSTANCE_HEADER),
    ) {
        (Some(api_key), Some(instance)) => Ok(Some(Credentials::new(api_key, instance))),
        _ => {
            warn!(
                "Gateway mode: missing {} or {} header",
                API_KEY_HEADER, INSTANCE_HEADER
            );
            Err((
                StatusCode::UNAUTHORIZED,
                Json(serde_json::json!({
                    "error": "Missing credentials",
                    "message": "Gateway mode requires X-Liongard-API-Key and \
                                X-Liongard-Instance headers",
                    "required": ["X-Liongard-API-Key", "X-Liongard-Instance"],
                })),
            )
                .into_response())
        }
    }
}

/// Root handler - provides API info.
async fn root_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "name": "Liongard MCP Server",
        "version": env!("CARGO_PKG_VERSION"),
        "transport": "HTTP",
        "endpoints": {
            "rpc": "/mcp",
            "health": "/health"
        },
        "protocol": "JSON-RPC 2.0",
        "documentation": "Send POST requests to /mcp with JSON-RPC messages"
    }))
}

/// Health check endpoint - no auth required.
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "transport": "http",
        "authMode": state.auth_mode.as_str(),
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// 404 for everything else.
async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({
            "error": "Not found",
            "endpoints": ["/mcp", "/health"]
        })),
    )
}

/// Handle JSON-RPC requests.
#[instrument(skip_all, fields(method = %request.method))]
async fn handle_rpc(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<JsonRpcRequest>,
) -> Response {
    info!("Received JSON-RPC request: {}", request.method);

    // Gateway mode: credentials must arrive with every request.
    let credentials = match gateway_credentials(state.auth_mode, &headers) {
        Ok(credentials) => credentials,
        Err(rejection) => return rejection,
    };

    let (session_id, session) = state.resolve_session(&headers).await;
    if let Some(credentials) = credentials {
        session.set_credentials(credentials);
    }

    let server = state.server.with_session(session);
    let response = process_request(&server, request).await;

    (
        StatusCode::OK,
        [(SESSION_ID_HEADER, session_id)],
        Json(response),
    )
        .into_response()
}

/// Process a JSON-RPC request and return the response.
async fn process_request(server: &McpServer, request: JsonRpcRequest) -> JsonRpcResponse {
    // Validate JSON-RPC version
    if request.jsonrpc != "2.0" {
        return JsonRpcResponse::invalid_request(request.id);
    }

    match request.method.as_str() {
        // Initialize the MCP session
        "initialize" => handle_initialize(server, request),

        // List available tools (depends on the session's navigation state)
        "tools/list" => handle_tools_list(server, request),

        // Call a tool
        "tools/call" => handle_tools_call(server, request).await,

        // Notifications (no response needed for stateless HTTP)
        method if method.starts_with("notifications/") => {
            info!("Received notification: {}", request.method);
            JsonRpcResponse::success(request.id, serde_json::json!(null))
        }

        // Unknown method
        _ => {
            warn!("Unknown method: {}", request.method);
            JsonRpcResponse::method_not_found(request.id)
        }
    }
}

/// Handle initialize request.
fn handle_initialize(server: &McpServer, request: JsonRpcRequest) -> JsonRpcResponse {
    info!("Processing initialize request");

    let result = serde_json::json!({
        "protocolVersion": "2024-11-05",
        "capabilities": {
            "tools": {}
        },
        "serverInfo": {
            "name": server.name(),
            "version": server.version()
        },
        "instructions": "Liongard MCP server with decision-tree navigation. Use \
                         liongard_navigate to select a domain first."
    });

    JsonRpcResponse::success(request.id, result)
}

/// Handle tools/list request.
fn handle_tools_list(server: &McpServer, request: JsonRpcRequest) -> JsonRpcResponse {
    let tools = server.list_tools();
    JsonRpcResponse::success(request.id, serde_json::json!({ "tools": tools }))
}

/// Handle tools/call request.
async fn handle_tools_call(server: &McpServer, request: JsonRpcRequest) -> JsonRpcResponse {
    let params = match request.params {
        Some(p) => p,
        None => return JsonRpcResponse::invalid_params(request.id, "Missing params"),
    };

    let name = match params.get("name").and_then(|v| v.as_str()) {
        Some(n) => n.to_string(),
        None => return JsonRpcResponse::invalid_params(request.id, "Missing tool name"),
    };

    let arguments = params
        .get("arguments")
        .cloned()
        .unwrap_or(serde_json::json!({}));

    let result = server.call_tool(&name, arguments).await;
    JsonRpcResponse::success(request.id, result)
}
