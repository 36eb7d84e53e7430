//! In-process backend doubles for tests.

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::{Arc, Mutex};

use super::{
    BackendError, Backends, FormatRequest, Formatter, GraphQuery, QueryResult,
    TranslationRequest, Translator,
};

/// Serve `router` on an ephemeral local port and return its base URL.
pub(crate) async fn serve(router: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

/// A base URL nothing listens on.
pub(crate) async fn unused_base_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

/// Build a result row from `(column, value)` pairs.
pub(crate) fn row(pairs: &[(&str, Value)]) -> Map<String, Value> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

pub(crate) struct StubTranslator {
    reply: Result<String, BackendError>,
    pub calls: Mutex<Vec<TranslationRequest>>,
}

impl StubTranslator {
    pub fn new(reply: Result<String, BackendError>) -> Arc<Self> {
        Arc::new(Self {
            reply,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<TranslationRequest> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Translator for StubTranslator {
    async fn translate(&self, request: &TranslationRequest) -> Result<String, BackendError> {
        self.calls.lock().unwrap().push(request.clone());
        self.reply.clone()
    }
}

pub(crate) struct StubGraphQuery {
    reply: Result<QueryResult, BackendError>,
    pub calls: Mutex<Vec<String>>,
}

impl StubGraphQuery {
    pub fn new(reply: Result<QueryResult, BackendError>) -> Arc<Self> {
        Arc::new(Self {
            reply,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl GraphQuery for StubGraphQuery {
    async fn execute(&self, query: &str) -> Result<QueryResult, BackendError> {
        self.calls.lock().unwrap().push(query.to_string());
        self.reply.clone()
    }
}

/// Echoes the request back as the formatted value, or fails with `error`.
pub(crate) struct StubFormatter {
    error: Option<BackendError>,
    pub calls: Mutex<Vec<FormatRequest>>,
}

impl StubFormatter {
    pub fn echo() -> Arc<Self> {
        Arc::new(Self {
            error: None,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(error: BackendError) -> Arc<Self> {
        Arc::new(Self {
            error: Some(error),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<FormatRequest> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Formatter for StubFormatter {
    async fn format(&self, request: &FormatRequest) -> Result<Value, BackendError> {
        self.calls.lock().unwrap().push(request.clone());
        match &self.error {
            Some(err) => Err(err.clone()),
            None => Ok(serde_json::to_value(request).unwrap()),
        }
    }
}

/// Stubs bundled with handles for inspecting the calls they received.
pub(crate) struct StubBackends {
    pub translator: Arc<StubTranslator>,
    pub graph: Arc<StubGraphQuery>,
    pub formatter: Arc<StubFormatter>,
}

impl StubBackends {
    pub fn new(
        translator: Arc<StubTranslator>,
        graph: Arc<StubGraphQuery>,
        formatter: Arc<StubFormatter>,
    ) -> Self {
        Self {
            translator,
            graph,
            formatter,
        }
    }

    /// Translator answers `query`, the store answers `result`, the
    /// formatter echoes.
    pub fn answering(query: &str, result: QueryResult) -> Self {
        Self::new(
            StubTranslator::new(Ok(query.to_string())),
            StubGraphQuery::new(Ok(result)),
            StubFormatter::echo(),
        )
    }

    pub fn backends(&self) -> Backends {
        Backends::new(
            self.translator.clone(),
            self.graph.clone(),
            self.formatter.clone(),
        )
    }
}
