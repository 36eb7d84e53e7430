//! Result formatting tool definition.
//!
//! Hands raw results to the formatter together with a presentation hint and
//! returns whatever it produces, untouched.

use rmcp::{handler::server::tool::cached_schema_for_type, model::Tool};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{info, instrument};

use crate::domains::backends::{FormatRequest, QueryType};
use crate::domains::tools::error::ToolError;
use crate::domains::tools::handlers::{ToolContext, ToolOutcome};
use crate::domains::tools::schema::{FieldKind, FieldSpec};

/// Parameters for result formatting.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FormatResultsParams {
    /// Result object as returned by `execute_sparql_query`.
    #[schemars(description = "Results object as returned by execute_sparql_query")]
    pub results: Map<String, Value>,

    /// Presentation hint.
    #[schemars(description = "How to present the results: auto (default), table or map")]
    #[serde(default)]
    pub query_type: Option<QueryType>,

    /// Query that produced the results; defaults to the last translated one.
    #[schemars(description = "Query that produced the results (defaults to the last translated query)")]
    #[serde(default)]
    pub query: Option<String>,
}

pub struct FormatResultsTool;

impl FormatResultsTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "format_sparql_results";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Format SPARQL results for presentation as a table or a map. Pass the results object returned by execute_sparql_query.";

    pub const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::required("results", FieldKind::Object),
        FieldSpec::optional("queryType", FieldKind::Enum(QueryType::VALUES)),
        FieldSpec::optional("query", FieldKind::String),
    ];

    #[instrument(skip_all)]
    pub async fn execute(
        params: FormatResultsParams,
        ctx: &ToolContext<'_>,
    ) -> Result<ToolOutcome, ToolError> {
        let request = FormatRequest {
            results: Value::Object(params.results),
            query_type: params.query_type.unwrap_or_default(),
            query: params
                .query
                .or_else(|| ctx.session.last_translated_query.clone()),
        };

        let formatted = ctx.backends.formatter.format(&request).await?;
        info!("Formatted results as {:?}", request.query_type);

        ToolOutcome::read_only(formatted)
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<FormatResultsParams>(),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }
}
