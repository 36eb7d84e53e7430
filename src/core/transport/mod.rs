//! Transport layer for the MCP server.
//!
//! This module provides two transport implementations:
//! - **HTTP**: tool call envelopes over POST (default) - feature: `http`
//! - **STDIO**: MCP over standard input/output via rmcp - feature: `stdio`
//!
//! Both delegate to the same dispatcher, so sessions, validation and error
//! objects behave identically.
//!
//! # Feature Flags
//!
//! Transport implementations are conditionally compiled based on features:
//! - `http` (default): HTTP transport - adds axum, tower-http
//! - `stdio` (default): STDIO transport - no extra dependencies

mod config;
mod error;
mod service;

#[cfg(feature = "http")]
pub mod http;

#[cfg(feature = "stdio")]
pub mod stdio;

pub use config::TransportConfig;
pub use error::{TransportError, TransportResult};
pub use service::TransportService;

#[cfg(feature = "http")]
pub use config::HttpConfig;
