//! Domains module containing business logic organized by bounded contexts.
//!
//! Each subdomain represents a specific area of functionality within the MCP
//! server:
//!
//! - `session` - conversation state and its store
//! - `backends` - clients for the translator, triple store and formatter
//! - `prompts` - static instructions and question templates
//! - `tools` - the tools exposed to the chat agent

pub mod backends;
pub mod prompts;
pub mod session;
pub mod tools;
