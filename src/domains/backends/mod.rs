//! Backends domain module.
//!
//! Thin request/response adapters for the three services a conversation is
//! orchestrated across. Each adapter issues exactly one bounded request per
//! call, never retries, and reports failures as a [`BackendError`] naming the
//! service it came from.
//!
//! ## Architecture
//!
//! - `translator.rs` - natural language to SPARQL
//! - `graph_query.rs` - SPARQL execution against the triple store
//! - `formatter.rs` - presentation of query results
//! - `client.rs` - shared HTTP plumbing and error normalization
//! - `error.rs` - backend error types

mod client;
mod error;
pub mod formatter;
pub mod graph_query;
pub mod translator;

#[cfg(test)]
pub(crate) mod stub;

use std::sync::Arc;
use tracing::info;

pub use error::{BackendError, BackendErrorKind, Service};
pub use formatter::{FormatRequest, Formatter, HttpFormatter, QueryType};
pub use graph_query::{GraphQuery, HttpGraphQuery, QueryResult};
pub use translator::{HttpTranslator, TranslationRequest, Translator};

use crate::core::config::BackendsConfig;

/// The set of backend clients shared by all sessions.
#[derive(Clone)]
pub struct Backends {
    pub translator: Arc<dyn Translator>,
    pub graph: Arc<dyn GraphQuery>,
    pub formatter: Arc<dyn Formatter>,
}

impl Backends {
    pub fn new(
        translator: Arc<dyn Translator>,
        graph: Arc<dyn GraphQuery>,
        formatter: Arc<dyn Formatter>,
    ) -> Self {
        Self {
            translator,
            graph,
            formatter,
        }
    }

    /// Build HTTP clients for the configured endpoints.
    pub fn from_config(config: &BackendsConfig) -> crate::core::Result<Self> {
        let timeout = config.timeout();
        let client_error =
            |e: reqwest::Error| crate::core::Error::config(format!("HTTP client setup failed: {}", e));

        let translator = HttpTranslator::new(&config.translator_url, timeout).map_err(client_error)?;
        let graph = HttpGraphQuery::new(&config.graph_query_url, timeout).map_err(client_error)?;
        let formatter = HttpFormatter::new(&config.formatter_url, timeout).map_err(client_error)?;

        info!("Backend clients ready (timeout {:?})", timeout);

        Ok(Self::new(
            Arc::new(translator),
            Arc::new(graph),
            Arc::new(formatter),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backends_from_default_config() {
        assert!(Backends::from_config(&BackendsConfig::default()).is_ok());
    }
}
