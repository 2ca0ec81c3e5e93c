//! Liongard MCP Server Library
//!
//! This crate exposes the Liongard API as a Model Context Protocol (MCP)
//! server built around a decision-tree architecture: tools are grouped into
//! nine domains and the tools advertised to the client depend on which
//! domain the session has navigated into.
//!
//! # Architecture
//!
//! - **core**: Configuration, error handling, the MCP server handler, and
//!   the transport layer (stdio and HTTP)
//! - **client**: The Liongard API capability trait, its HTTP implementation,
//!   and lazy credential-keyed client acquisition
//! - **domains**: The nine domain tool catalogs, the navigation state
//!   machine, and the tool router
//!
//! # Example
//!
//! ```rust,no_run
//! use liongard_mcp_server::core::{Config, McpServer, TransportService};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     let server = McpServer::new(config.clone());
//!     TransportService::new(config.transport).run(server).await?;
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{Config, Error, McpServer, Result};
