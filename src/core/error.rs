//! Error types and handling for the MCP server.
//!
//! This module defines a unified error type representing faults from all
//! layers. During a tool call, every variant is caught at the router
//! boundary and converted into an error envelope; nothing escapes as an
//! unhandled fault.

use thiserror::Error;

/// A specialized Result type for MCP server operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the MCP server.
#[derive(Debug, Error)]
pub enum Error {
    /// Error while preparing a tool invocation (argument validation).
    #[error(transparent)]
    Tool(#[from] crate::domains::ToolError),

    /// Error from the Liongard client: missing credentials, construction,
    /// or a backend fault. The message is passed through verbatim.
    #[error(transparent)]
    Client(#[from] crate::client::ClientError),

    /// Configuration-related errors.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization errors.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Internal server errors that should not occur under normal operation.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new internal error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}
