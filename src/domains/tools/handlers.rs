//! Handler plumbing shared by every tool definition.

use serde::Serialize;
use serde_json::Value;

use super::error::ToolError;
use crate::domains::backends::Backends;
use crate::domains::session::{SessionMutation, SessionState, ThreadId};

/// Everything a handler may look at while it runs.
///
/// The session state is a read-only view; handlers request changes through
/// [`ToolOutcome::mutation`].
pub struct ToolContext<'a> {
    pub thread_id: &'a ThreadId,
    pub session: &'a SessionState,
    pub backends: &'a Backends,
}

/// Successful result of a handler.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolOutcome {
    /// Tool-specific result object returned to the caller.
    pub result: Value,

    /// Session change to apply now that the call has succeeded.
    pub mutation: Option<SessionMutation>,
}

impl ToolOutcome {
    /// An outcome that leaves the session untouched.
    pub fn read_only(result: impl Serialize) -> Result<Self, ToolError> {
        Ok(Self {
            result: to_value(result)?,
            mutation: None,
        })
    }

    /// An outcome that changes the session.
    pub fn mutating(result: impl Serialize, mutation: SessionMutation) -> Result<Self, ToolError> {
        Ok(Self {
            result: to_value(result)?,
            mutation: Some(mutation),
        })
    }
}

fn to_value(result: impl Serialize) -> Result<Value, ToolError> {
    serde_json::to_value(result)
        .map_err(|e| ToolError::internal(format!("failed to serialize result: {}", e)))
}

/// Reject a string input that is empty or whitespace only.
pub(crate) fn require_non_blank(field: &str, value: &str) -> Result<(), ToolError> {
    if value.trim().is_empty() {
        return Err(ToolError::validation(field, "must not be blank"));
    }
    Ok(())
}
