//! Result formatter client.
//!
//! Contract: `POST /format-results {results, queryType, query?}` answers
//! `{formatted}`.

use async_trait::async_trait;
use reqwest::Client;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, instrument};

use super::client::{build_client, decode, endpoint, success_body, transport_error};
use super::error::{BackendError, Service};

/// Presentation hint forwarded to the formatter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum QueryType {
    /// Let the formatter pick a presentation.
    #[default]
    Auto,
    Table,
    Map,
}

impl QueryType {
    pub const VALUES: &'static [&'static str] = &["auto", "table", "map"];
}

/// Request sent to the formatter.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormatRequest {
    pub results: Value,
    pub query_type: QueryType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FormatReply {
    formatted: Value,
}

/// Turns raw query results into a presentable structure.
#[async_trait]
pub trait Formatter: Send + Sync {
    async fn format(&self, request: &FormatRequest) -> Result<Value, BackendError>;
}

/// HTTP implementation of [`Formatter`].
pub struct HttpFormatter {
    client: Client,
    url: String,
}

impl HttpFormatter {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_client(timeout)?,
            url: endpoint(base_url, "format-results"),
        })
    }
}

#[async_trait]
impl Formatter for HttpFormatter {
    #[instrument(skip_all, fields(service = "Formatter", query_type = ?request.query_type))]
    async fn format(&self, request: &FormatRequest) -> Result<Value, BackendError> {
        debug!("POST {}", self.url);
        let response = self
            .client
            .post(&self.url)
            .json(request)
            .send()
            .await
            .map_err(|e| transport_error(Service::Formatter, e))?;

        let body = success_body(Service::Formatter, response).await?;
        let reply: FormatReply = decode(Service::Formatter, &body)?;
        Ok(reply.formatted)
    }
}
