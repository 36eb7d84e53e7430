//! Backend-specific error types.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// The backend service an error originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Service {
    Translator,
    GraphQuery,
    Formatter,
}

impl Service {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Translator => "Translator",
            Self::GraphQuery => "GraphQuery",
            Self::Formatter => "Formatter",
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized failure class of a backend round trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BackendErrorKind {
    /// No response within the configured timeout.
    Timeout,
    /// The service could not be connected to.
    Unreachable,
    /// The service answered with a body that does not honor its contract.
    BadResponse,
    /// The service answered, but refused the request.
    Rejected,
}

impl BackendErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Timeout => "Timeout",
            Self::Unreachable => "Unreachable",
            Self::BadResponse => "BadResponse",
            Self::Rejected => "Rejected",
        }
    }
}

impl fmt::Display for BackendErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed call to one of the backend services.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{service} {kind}: {detail}")]
pub struct BackendError {
    pub service: Service,
    pub kind: BackendErrorKind,
    pub detail: String,
}

impl BackendError {
    pub fn new(service: Service, kind: BackendErrorKind, detail: impl Into<String>) -> Self {
        Self {
            service,
            kind,
            detail: detail.into(),
        }
    }

    pub fn timeout(service: Service, detail: impl Into<String>) -> Self {
        Self::new(service, BackendErrorKind::Timeout, detail)
    }

    pub fn unreachable(service: Service, detail: impl Into<String>) -> Self {
        Self::new(service, BackendErrorKind::Unreachable, detail)
    }

    pub fn bad_response(service: Service, detail: impl Into<String>) -> Self {
        Self::new(service, BackendErrorKind::BadResponse, detail)
    }

    pub fn rejected(service: Service, detail: impl Into<String>) -> Self {
        Self::new(service, BackendErrorKind::Rejected, detail)
    }
}
