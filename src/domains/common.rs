//! Shared building blocks for the domain tool catalogs.
//!
//! Every domain pairs a declarative tool list with a handler that maps
//! validated arguments onto backend calls and serializes the raw response.
//! The helpers here carry the parts all nine domains repeat: descriptor
//! construction, argument parsing, and result envelopes.

use rmcp::handler::server::tool::cached_schema_for_type;
use rmcp::model::{CallToolResult, Content, JsonObject, Tool};
use schemars::JsonSchema;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

use super::error::ToolError;
use crate::client::PageQuery;

// ============================================================================
// Descriptor Construction
// ============================================================================

/// Build a tool descriptor from a parameter type's derived schema.
pub(crate) fn tool<P: JsonSchema + std::any::Any>(
    name: &'static str,
    description: &'static str,
) -> Tool {
    Tool {
        name: name.into(),
        description: Some(description.into()),
        input_schema: cached_schema_for_type::<P>(),
        annotations: None,
        output_schema: None,
        icons: None,
        meta: None,
        title: None,
    }
}

// ============================================================================
// Argument Parsing
// ============================================================================

/// Deserialize tool arguments into a typed parameter struct.
///
/// Unknown fields are dropped; missing required fields fail before any
/// backend call is made.
pub(crate) fn parse_params<T: DeserializeOwned>(
    tool_name: &str,
    args: JsonObject,
) -> Result<T, ToolError> {
    serde_json::from_value(Value::Object(args))
        .map_err(|e| ToolError::invalid_arguments(tool_name, e.to_string()))
}

// ============================================================================
// Result Envelopes
// ============================================================================

/// Wrap a backend response as pretty-printed JSON text, unreshaped.
pub(crate) fn json_result<T: serde::Serialize>(value: &T) -> crate::Result<CallToolResult> {
    let text = serde_json::to_string_pretty(value)?;
    Ok(CallToolResult::success(vec![Content::text(text)]))
}

/// Create a success result with plain text content.
pub(crate) fn text_result(message: impl Into<String>) -> CallToolResult {
    CallToolResult::success(vec![Content::text(message.into())])
}

/// Create an error result with a formatted message.
pub(crate) fn error_result(message: impl Into<String>) -> CallToolResult {
    let message = message.into();
    warn!("{}", message);
    CallToolResult::error(vec![Content::text(message)])
}

// ============================================================================
// Shared Parameter Types
// ============================================================================

/// Empty parameter set for tools that take no arguments.
#[derive(Debug, Clone, Copy, Default, Deserialize, JsonSchema)]
pub struct NoParams {}

/// Pagination parameters accepted by list tools.
#[derive(Debug, Clone, Copy, Default, Deserialize, JsonSchema)]
pub struct PageParams {
    /// Page number (1-indexed, default: 1)
    pub page: Option<u32>,

    /// Number of items per page (default: 50)
    #[serde(rename = "pageSize")]
    pub page_size: Option<u32>,
}

impl PageParams {
    /// Pass-through pagination; the platform applies its own defaults.
    pub fn query(&self) -> PageQuery {
        PageQuery::new(self.page, self.page_size)
    }
}

/// Entity-id parameter shared by get-style tools.
#[derive(Debug, Clone, Copy, Deserialize, JsonSchema)]
pub struct IdParams {
    /// The unique entity ID
    pub id: u64,
}

/// Pagination plus an optional free-form filter object.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct FilteredPageParams {
    /// Page number (1-indexed, default: 1)
    pub page: Option<u32>,

    /// Number of items per page (default: 50)
    #[serde(rename = "pageSize")]
    pub page_size: Option<u32>,

    /// Optional filters to narrow results (e.g., by environment)
    pub filters: Option<Value>,
}

impl FilteredPageParams {
    pub fn query(&self) -> PageQuery {
        PageQuery::new(self.page, self.page_size)
    }
}
