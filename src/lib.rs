//! SPARQL MCP Server Library
//!
//! A session-aware tool server that lets a chat agent answer questions about
//! environmental measurements. It orchestrates three backend services: a
//! natural-language-to-SPARQL translator, a triple store and a result
//! formatter.
//!
//! # Architecture
//!
//! - **core**: configuration, error handling, the MCP server and transports
//! - **domains**: business logic organized by bounded contexts
//!   - **session**: per-conversation state keyed by thread identifier
//!   - **backends**: HTTP clients for the three backend services
//!   - **prompts**: system prompt and question templates
//!   - **tools**: tool registry, dispatcher and the six tool handlers
//!
//! # Example
//!
//! ```rust,no_run
//! use sparql_mcp_server::core::{Config, McpServer};
//! use sparql_mcp_server::domains::tools::ToolCallRequest;
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let server = McpServer::new(Config::from_env())?;
//!     let response = server
//!         .dispatch(ToolCallRequest {
//!             tool: "select_locations".into(),
//!             input: json!({ "locationIds": ["loc1", "loc2"] }),
//!             thread_id: Some("conversation-1".into()),
//!         })
//!         .await;
//!     println!("{}", serde_json::to_string(&response)?);
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{Config, Error, McpServer, Result};
