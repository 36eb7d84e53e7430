//! Tool-specific error types.

use thiserror::Error;

use crate::domains::backends::{BackendError, BackendErrorKind, Service};
use crate::domains::session::SessionError;

/// Errors that can occur while dispatching or executing a tool call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToolError {
    /// The requested tool is not registered.
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// The tool input does not match the tool's schema.
    #[error("Invalid input field '{field}': {message}")]
    Validation { field: String, message: String },

    /// A backend service failed; carries the service and failure kind.
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// The session could not be loaded.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// An internal error occurred.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ToolError {
    /// Create a new "unknown tool" error.
    pub fn unknown_tool(name: impl Into<String>) -> Self {
        Self::UnknownTool(name.into())
    }

    /// Create a new validation error naming the offending field.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a new "internal" error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Protocol name of the error class.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnknownTool(_) => "UnknownToolError",
            Self::Validation { .. } => "ValidationError",
            Self::Backend(_) => "BackendError",
            Self::Session(_) => "SessionError",
            Self::Internal(_) => "InternalError",
        }
    }

    /// Backend service the error originated from, if any.
    pub fn service(&self) -> Option<Service> {
        match self {
            Self::Backend(err) => Some(err.service),
            _ => None,
        }
    }

    /// Backend failure kind, if any.
    pub fn backend_kind(&self) -> Option<BackendErrorKind> {
        match self {
            Self::Backend(err) => Some(err.kind),
            _ => None,
        }
    }

    /// Offending input field of a validation error.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Validation { field, .. } => Some(field),
            _ => None,
        }
    }

    /// Whether the error was raised locally, before any backend call.
    pub fn is_local(&self) -> bool {
        !matches!(self, Self::Backend(_))
    }
}
