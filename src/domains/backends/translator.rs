//! Natural-language-to-SPARQL translator client.
//!
//! Contract: `POST /messages {question, selectedLocationIds?, threadId}`
//! answers `{query}` on success or `{error}` when the translator refuses.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument, warn};

use super::client::{build_client, decode, endpoint, success_body, transport_error};
use super::error::{BackendError, Service};

/// Request sent to the translator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationRequest {
    pub question: String,

    /// Location context; `None` omits the field entirely.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_location_ids: Option<Vec<String>>,

    pub thread_id: String,
}

#[derive(Debug, Deserialize)]
struct TranslationReply {
    #[serde(default)]
    query: Option<String>,
    #[serde(default)]
    error: Option<serde_json::Value>,
}

/// Turns a natural-language question into a SPARQL query.
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, request: &TranslationRequest) -> Result<String, BackendError>;
}

/// HTTP implementation of [`Translator`].
pub struct HttpTranslator {
    client: Client,
    url: String,
}

impl HttpTranslator {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_client(timeout)?,
            url: endpoint(base_url, "messages"),
        })
    }
}

#[async_trait]
impl Translator for HttpTranslator {
    #[instrument(skip_all, fields(service = "Translator", thread_id = %request.thread_id))]
    async fn translate(&self, request: &TranslationRequest) -> Result<String, BackendError> {
        debug!("POST {}", self.url);
        let response = self
            .client
            .post(&self.url)
            .json(request)
            .send()
            .await
            .map_err(|e| transport_error(Service::Translator, e))?;

        let body = success_body(Service::Translator, response).await?;
        let reply: TranslationReply = decode(Service::Translator, &body)?;

        if let Some(error) = reply.error {
            let detail = match error {
                serde_json::Value::String(message) => message,
                other => other.to_string(),
            };
            warn!("Translator refused question: {}", detail);
            return Err(BackendError::rejected(Service::Translator, detail));
        }

        match reply.query {
            Some(query) if !query.trim().is_empty() => Ok(query),
            _ => Err(BackendError::bad_response(
                Service::Translator,
                "response carries neither 'query' nor 'error'",
            )),
        }
    }
}
