//! Session-specific error types.

use thiserror::Error;

/// Errors raised by the session store.
///
/// None of these occur under correct use; seeing one points at a client
/// sending an unusable thread identifier or at a defect in the store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The supplied thread identifier cannot address a session.
    #[error("Invalid thread identifier: {0}")]
    InvalidThreadId(String),

    /// A lock for one thread identifier yielded another thread's session.
    #[error("Session mismatch: expected '{expected}', found '{found}'")]
    Mismatch { expected: String, found: String },
}

impl SessionError {
    /// Create a new "invalid thread identifier" error.
    pub fn invalid_thread_id(reason: impl Into<String>) -> Self {
        Self::InvalidThreadId(reason.into())
    }
}
