//! Session data model.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

use super::error::SessionError;

/// Longest thread identifier accepted from a client.
const MAX_THREAD_ID_LEN: usize = 256;

/// Opaque identifier correlating all calls of one conversation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ThreadId(String);

impl ThreadId {
    /// Validate a client-supplied thread identifier.
    pub fn parse(raw: impl Into<String>) -> Result<Self, SessionError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(SessionError::invalid_thread_id(
                "thread identifier must not be blank",
            ));
        }
        if raw.chars().count() > MAX_THREAD_ID_LEN {
            return Err(SessionError::invalid_thread_id(format!(
                "thread identifier exceeds {} characters",
                MAX_THREAD_ID_LEN
            )));
        }
        Ok(Self(raw))
    }

    /// Mint a fresh identifier for a client that did not supply one.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ThreadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Workflow state carried between tool calls of one conversation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    /// Location identifiers chosen via `select_locations`, in call order.
    pub selected_location_ids: Vec<String>,

    /// Query text produced by the last successful translation.
    pub last_translated_query: Option<String>,
}

/// One conversation's session.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub thread_id: ThreadId,
    pub state: SessionState,
    pub created_at: DateTime<Utc>,
    pub last_used_at: DateTime<Utc>,
}

impl Session {
    /// Create an empty session for `thread_id`.
    pub fn new(thread_id: ThreadId) -> Self {
        let now = Utc::now();
        Self {
            thread_id,
            state: SessionState::default(),
            created_at: now,
            last_used_at: now,
        }
    }

    /// Mark the session as used now.
    pub fn touch(&mut self) {
        self.last_used_at = Utc::now();
    }
}

/// A change to [`SessionState`] requested by a successful tool call.
///
/// Handlers never write the session themselves; they return one of these
/// and the dispatcher applies it once the call has succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionMutation {
    /// Replace the selected locations.
    SelectLocations(Vec<String>),

    /// Remember the latest translated query.
    RecordTranslation(String),
}

impl SessionMutation {
    pub fn apply(self, state: &mut SessionState) {
        match self {
            Self::SelectLocations(ids) => state.selected_location_ids = ids,
            Self::RecordTranslation(query) => state.last_translated_query = Some(query),
        }
    }
}
