//! Triple store client.
//!
//! Contract: `POST /sparql` with an `application/sparql-query` body answers a
//! SPARQL 1.1 JSON results document, or a non-2xx status when the query
//! fails. The document is flattened into a [`QueryResult`] of scalar rows.

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, instrument};

use super::client::{build_client, decode, endpoint, success_body, transport_error};
use super::error::{BackendError, Service};

const SPARQL_QUERY: &str = "application/sparql-query";
const SPARQL_RESULTS_JSON: &str = "application/sparql-results+json";

const XSD: &str = "http://www.w3.org/2001/XMLSchema#";

/// Tabular result of a SPARQL query.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QueryResult {
    /// Projected variable names, in query order.
    pub columns: Vec<String>,

    /// One mapping of column name to scalar value per solution.
    pub rows: Vec<Map<String, Value>>,

    #[serde(rename = "total-count")]
    pub total_count: usize,

    /// Answer of an `ASK` query.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boolean: Option<bool>,
}

impl QueryResult {
    /// Build a result from rows, deriving the count.
    pub fn from_rows(columns: Vec<String>, rows: Vec<Map<String, Value>>) -> Self {
        Self {
            total_count: rows.len(),
            columns,
            rows,
            boolean: None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SparqlResults {
    #[serde(default)]
    head: SparqlHead,
    #[serde(default)]
    results: Option<SparqlBindings>,
    #[serde(default)]
    boolean: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
struct SparqlHead {
    #[serde(default)]
    vars: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct SparqlBindings {
    bindings: Vec<HashMap<String, SparqlTerm>>,
}

#[derive(Debug, Deserialize)]
struct SparqlTerm {
    #[serde(rename = "type")]
    kind: String,
    value: String,
    #[serde(default)]
    datatype: Option<String>,
}

impl SparqlTerm {
    /// Collapse an RDF term into a JSON scalar.
    fn into_scalar(self) -> Value {
        if self.kind == "bnode" {
            return Value::String(format!("_:{}", self.value));
        }
        let Some(local) = self
            .datatype
            .as_deref()
            .and_then(|dt| dt.strip_prefix(XSD))
        else {
            return Value::String(self.value);
        };

        match local {
            "integer" | "int" | "long" | "short" | "byte" | "nonNegativeInteger"
            | "positiveInteger" | "negativeInteger" | "nonPositiveInteger" | "unsignedInt"
            | "unsignedLong" | "unsignedShort" => match self.value.trim().parse::<i64>() {
                Ok(n) => Value::Number(n.into()),
                Err(_) => Value::String(self.value),
            },
            "decimal" | "double" | "float" => match self
                .value
                .trim()
                .parse::<f64>()
                .ok()
                .and_then(Number::from_f64)
            {
                Some(n) => Value::Number(n),
                None => Value::String(self.value),
            },
            "boolean" => match self.value.trim() {
                "true" | "1" => Value::Bool(true),
                "false" | "0" => Value::Bool(false),
                _ => Value::String(self.value),
            },
            _ => Value::String(self.value),
        }
    }
}

impl From<SparqlResults> for QueryResult {
    fn from(doc: SparqlResults) -> Self {
        let columns = doc.head.vars;
        let rows: Vec<Map<String, Value>> = doc
            .results
            .map(|r| r.bindings)
            .unwrap_or_default()
            .into_iter()
            .map(|binding| {
                let mut row = Map::new();
                for (name, term) in binding {
                    row.insert(name, term.into_scalar());
                }
                row
            })
            .collect();

        Self {
            total_count: rows.len(),
            columns,
            rows,
            boolean: doc.boolean,
        }
    }
}

/// Executes SPARQL queries.
#[async_trait]
pub trait GraphQuery: Send + Sync {
    async fn execute(&self, query: &str) -> Result<QueryResult, BackendError>;
}

/// HTTP implementation of [`GraphQuery`].
pub struct HttpGraphQuery {
    client: Client,
    url: String,
}

impl HttpGraphQuery {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_client(timeout)?,
            url: endpoint(base_url, "sparql"),
        })
    }
}

#[async_trait]
impl GraphQuery for HttpGraphQuery {
    #[instrument(skip_all, fields(service = "GraphQuery"))]
    async fn execute(&self, query: &str) -> Result<QueryResult, BackendError> {
        debug!("POST {} ({} bytes of SPARQL)", self.url, query.len());
        let response = self
            .client
            .post(&self.url)
            .header(CONTENT_TYPE, SPARQL_QUERY)
            .header(ACCEPT, SPARQL_RESULTS_JSON)
            .body(query.to_string())
            .send()
            .await
            .map_err(|e| transport_error(Service::GraphQuery, e))?;

        let body = success_body(Service::GraphQuery, response).await?;
        let doc: SparqlResults = decode(Service::GraphQuery, &body)?;
        if doc.results.is_none() && doc.boolean.is_none() {
            return Err(BackendError::bad_response(
                Service::GraphQuery,
                "results document carries neither 'results' nor 'boolean'",
            ));
        }
        Ok(doc.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::backends::BackendErrorKind;
    use crate::domains::backends::stub::serve;
    use axum::{Json, Router, http::HeaderMap, http::StatusCode, routing::post};
    use serde_json::json;

    fn sample_document() -> Value {
        json!({
            "head": { "vars": ["id", "lat", "lng", "label", "active"] },
            "results": { "bindings": [
                {
                    "id": { "type": "uri", "value": "http://example.org/loc1" },
                    "lat": { "type": "literal", "value": "51.21",
                             "datatype": "http://www.w3.org/2001/XMLSchema#decimal" },
                    "lng": { "type": "literal", "value": "4.40",
                             "datatype": "http://www.w3.org/2001/XMLSchema#double" },
                    "label": { "type": "literal", "value": "Oostende", "xml:lang": "nl" },
                    "active": { "type": "literal", "value": "true",
                                "datatype": "http://www.w3.org/2001/XMLSchema#boolean" }
                },
                {
                    "id": { "type": "bnode", "value": "b0" },
                    "lat": { "type": "literal", "value": "7",
                             "datatype": "http://www.w3.org/2001/XMLSchema#integer" }
                }
            ]}
        })
    }

    #[test]
    fn test_flatten_sparql_results() {
        let doc: SparqlResults = serde_json::from_value(sample_document()).unwrap();
        let result = QueryResult::from(doc);

        assert_eq!(result.columns, vec!["id", "lat", "lng", "label", "active"]);
        assert_eq!(result.total_count, 2);
        let first = &result.rows[0];
        assert_eq!(first["id"], json!("http://example.org/loc1"));
        assert_eq!(first["lat"], json!(51.21));
        assert_eq!(first["lng"], json!(4.4));
        assert_eq!(first["label"], json!("Oostende"));
        assert_eq!(first["active"], json!(true));

        let second = &result.rows[1];
        assert_eq!(second["id"], json!("_:b0"));
        assert_eq!(second["lat"], json!(7));
        assert!(!second.contains_key("lng"));
    }

    #[test]
    fn test_unparseable_numeric_literal_stays_text() {
        let term = SparqlTerm {
            kind: "literal".to_string(),
            value: "n/a".to_string(),
            datatype: Some(format!("{}double", XSD)),
        };
        assert_eq!(term.into_scalar(), json!("n/a"));
    }

    #[test]
    fn test_ask_result_serializes_boolean() {
        let doc: SparqlResults =
            serde_json::from_value(json!({ "head": {}, "boolean": true })).unwrap();
        let value = serde_json::to_value(QueryResult::from(doc)).unwrap();
        assert_eq!(value["boolean"], json!(true));
        assert_eq!(value["total-count"], json!(0));
    }

    #[tokio::test]
    async fn test_execute_sends_sparql_content_type() {
        let app = Router::new().route(
            "/sparql",
            post(|headers: HeaderMap, body: String| async move {
                let content_type = headers
                    .get("content-type")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                if content_type != SPARQL_QUERY || !body.starts_with("SELECT") {
                    return (StatusCode::BAD_REQUEST, Json(json!({})));
                }
                (StatusCode::OK, Json(sample_document()))
            }),
        );
        let base = serve(app).await;
        let client = HttpGraphQuery::new(&base, Duration::from_secs(5)).unwrap();

        let result = client.execute("SELECT * WHERE { ?s ?p ?o }").await.unwrap();
        assert_eq!(result.total_count, 2);
    }

    #[tokio::test]
    async fn test_query_error_status_is_attributed() {
        let app = Router::new().route(
            "/sparql",
            post(|| async { (StatusCode::BAD_REQUEST, "MALFORMED QUERY: Lexical error") }),
        );
        let base = serve(app).await;
        let client = HttpGraphQuery::new(&base, Duration::from_secs(5)).unwrap();

        let err = client.execute("SELEC nonsense").await.unwrap_err();
        assert_eq!(err.service, Service::GraphQuery);
        assert_eq!(err.kind, BackendErrorKind::Rejected);
        assert!(err.detail.contains("MALFORMED QUERY"));
    }

    #[tokio::test]
    async fn test_non_results_document_is_bad_response() {
        let app = Router::new().route("/sparql", post(|| async { Json(json!({ "head": {} })) }));
        let base = serve(app).await;
        let client = HttpGraphQuery::new(&base, Duration::from_secs(5)).unwrap();

        let err = client.execute("SELECT * WHERE {}").await.unwrap_err();
        assert_eq!(err.kind, BackendErrorKind::BadResponse);
    }
}
