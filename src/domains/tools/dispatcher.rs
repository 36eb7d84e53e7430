//! Tool call dispatcher and protocol envelope.
//!
//! A call moves through `Received -> Validated -> SessionLoaded -> Executing
//! -> Responding -> Done` and stops at the first failing stage. Input is
//! validated before the session is touched, so a malformed call neither
//! creates nor queues on a session. The session lock is held from load until
//! the handler's mutation has been applied, which serializes calls per thread
//! identifier in arrival order.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use super::error::ToolError;
use super::handlers::ToolContext;
use super::registry::ToolRegistry;
use crate::domains::backends::{Backends, BackendErrorKind, Service};
use crate::domains::session::{SessionError, SessionStore, ThreadId};

// ============================================================================
// Protocol Envelope
// ============================================================================

/// Inbound protocol call.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolCallRequest {
    pub tool: String,
    #[serde(default)]
    pub input: Value,
    #[serde(default)]
    pub thread_id: Option<String>,
}

/// Protocol error object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub kind: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<Service>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backend_kind: Option<BackendErrorKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl From<&ToolError> for ErrorBody {
    fn from(err: &ToolError) -> Self {
        Self {
            kind: err.kind().to_string(),
            message: err.to_string(),
            service: err.service(),
            backend_kind: err.backend_kind(),
            field: err.field().map(str::to_string),
        }
    }
}

/// Outbound protocol response: exactly one of `result` or `error`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolCallResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<String>,
}

impl ToolCallResponse {
    pub fn success(result: Value, thread_id: Option<String>) -> Self {
        Self {
            result: Some(result),
            error: None,
            thread_id,
        }
    }

    pub fn failure(error: &ToolError, thread_id: Option<String>) -> Self {
        Self {
            result: None,
            error: Some(error.into()),
            thread_id,
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

// ============================================================================
// Dispatcher
// ============================================================================

/// Routes validated calls to handlers against the caller's session.
pub struct Dispatcher {
    registry: ToolRegistry,
    sessions: Arc<SessionStore>,
    backends: Backends,
}

impl Dispatcher {
    pub fn new(registry: ToolRegistry, sessions: Arc<SessionStore>, backends: Backends) -> Self {
        Self {
            registry,
            sessions,
            backends,
        }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    pub fn sessions(&self) -> &Arc<SessionStore> {
        &self.sessions
    }

    /// Answer one protocol call.
    ///
    /// An absent thread identifier is replaced by a freshly minted one, which
    /// the response carries back to the caller.
    pub async fn dispatch(&self, request: ToolCallRequest) -> ToolCallResponse {
        let thread_id = match request.thread_id {
            Some(raw) => match ThreadId::parse(raw.clone()) {
                Ok(thread_id) => thread_id,
                Err(err) => {
                    warn!("Rejecting call to {}: {}", request.tool, err);
                    return ToolCallResponse::failure(&err.into(), Some(raw));
                }
            },
            None => {
                let minted = ThreadId::generate();
                debug!(thread_id = %minted, "Minted thread identifier");
                minted
            }
        };

        let response_thread = Some(thread_id.to_string());
        match self.call(&thread_id, &request.tool, request.input).await {
            Ok(result) => ToolCallResponse::success(result, response_thread),
            Err(err) => ToolCallResponse::failure(&err, response_thread),
        }
    }

    /// Run `tool` with `input` against the session of `thread_id`.
    #[instrument(skip(self, thread_id, input), fields(thread_id = %thread_id))]
    pub async fn call(
        &self,
        thread_id: &ThreadId,
        tool: &str,
        input: Value,
    ) -> Result<Value, ToolError> {
        debug!("Received");
        let input = self.registry.parse(tool, input).inspect_err(|err| {
            warn!("Rejected before execution: {}", err);
        })?;
        debug!("Validated");

        let mut session = self.sessions.lock(thread_id).await;
        if session.thread_id != *thread_id {
            return Err(SessionError::Mismatch {
                expected: thread_id.to_string(),
                found: session.thread_id.to_string(),
            }
            .into());
        }
        debug!("SessionLoaded");

        debug!("Executing");
        let outcome = {
            let ctx = ToolContext {
                thread_id,
                session: &session.state,
                backends: &self.backends,
            };
            self.registry.execute(input, &ctx).await
        };

        debug!("Responding");
        session.touch();
        let result = match outcome {
            Ok(outcome) => {
                if let Some(mutation) = outcome.mutation {
                    mutation.apply(&mut session.state);
                }
                info!("Tool {} succeeded", tool);
                Ok(outcome.result)
            }
            Err(err) => {
                warn!("Tool {} failed: {}", tool, err);
                Err(err)
            }
        };
        drop(session);

        debug!("Done");
        result
    }
}
