//! Tools domain module.
//!
//! This module handles everything between an inbound tool call and the
//! backend services: validating input, loading the caller's session, running
//! the handler and applying its session change.
//!
//! ## Architecture
//!
//! - `definitions/` - Individual tool implementations (one file per tool)
//! - `schema.rs` - Field-level input declarations and validation
//! - `registry.rs` - Closed set of tools, input decoding and dispatch by name
//! - `dispatcher.rs` - Protocol envelope and per-call state machine
//! - `router.rs` - rmcp ToolRouter builder for the STDIO transport
//! - `geo.rs` - Location rows and map hints
//! - `error.rs` - Tool-specific error types
//!
//! ## Adding a New Tool
//!
//! 1. Create a new file in `definitions/` with params, `FIELDS`, `execute()`
//!    and `to_tool()`
//! 2. Export it in `definitions/mod.rs`
//! 3. Add a `ToolInput` variant, a `SPECS` entry and a match arm in
//!    `registry.rs`
//!
//! Both transports pick the tool up from the registry.

pub mod definitions;
mod dispatcher;
mod error;
mod geo;
mod handlers;
mod registry;
pub mod router;
mod schema;

pub use dispatcher::{Dispatcher, ErrorBody, ToolCallRequest, ToolCallResponse};
pub use error::ToolError;
pub use geo::{Coordinate, Location, MapView};
pub use handlers::{ToolContext, ToolOutcome};
pub use registry::{ToolInput, ToolRegistry, ToolSpec};
pub use router::build_tool_router;
pub use schema::{FieldKind, FieldSpec};
