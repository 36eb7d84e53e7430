//! SPARQL execution tool definition.
//!
//! Runs a query as given, independent of the session, so a previously
//! translated query can be replayed or an ad hoc one tried.

use rmcp::{handler::server::tool::cached_schema_for_type, model::Tool};
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::{info, instrument};

use crate::domains::tools::error::ToolError;
use crate::domains::tools::handlers::{ToolContext, ToolOutcome, require_non_blank};
use crate::domains::tools::schema::{FieldKind, FieldSpec};

/// Parameters for query execution.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ExecuteQueryParams {
    /// SPARQL query text.
    #[schemars(description = "SPARQL query to run against the triple store")]
    pub query: String,
}

pub struct ExecuteQueryTool;

impl ExecuteQueryTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "execute_sparql_query";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Run a SPARQL query against the measurement knowledge graph. Returns the column names, the result rows and the row count.";

    pub const FIELDS: &'static [FieldSpec] = &[FieldSpec::required("query", FieldKind::String)];

    #[instrument(skip_all)]
    pub async fn execute(
        params: ExecuteQueryParams,
        ctx: &ToolContext<'_>,
    ) -> Result<ToolOutcome, ToolError> {
        require_non_blank("query", &params.query)?;

        let results = ctx.backends.graph.execute(&params.query).await?;
        info!("Query returned {} row(s)", results.total_count);

        ToolOutcome::read_only(results)
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<ExecuteQueryParams>(),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::backends::stub::{StubBackends, StubFormatter, StubGraphQuery, StubTranslator, row};
    use crate::domains::backends::{BackendError, BackendErrorKind, QueryResult, Service};
    use crate::domains::session::{SessionState, ThreadId};
    use serde_json::json;

    async fn run(stubs: &StubBackends, query: &str) -> Result<ToolOutcome, ToolError> {
        let backends = stubs.backends();
        let thread_id = ThreadId::parse("t").unwrap();
        let session = SessionState::default();
        let ctx = ToolContext {
            thread_id: &thread_id,
            session: &session,
            backends: &backends,
        };
        ExecuteQueryTool::execute(
            ExecuteQueryParams {
                query: query.to_string(),
            },
            &ctx,
        )
        .await
    }

    #[tokio::test]
    async fn test_execute_returns_rows_and_count() {
        let result = QueryResult::from_rows(
            vec!["v".into()],
            vec![row(&[("v", json!(1))]), row(&[("v", json!(2))])],
        );
        let stubs = StubBackends::answering("unused", result);

        let outcome = run(&stubs, "SELECT ?v WHERE {}").await.unwrap();
        assert_eq!(outcome.result["total-count"], json!(2));
        assert_eq!(outcome.result["rows"], json!([{ "v": 1 }, { "v": 2 }]));
        assert!(outcome.mutation.is_none());
        assert!(stubs.translator.calls().is_empty());
    }

    #[tokio::test]
    async fn test_store_rejection_has_no_partial_result() {
        let stubs = StubBackends::new(
            StubTranslator::new(Ok("unused".into())),
            StubGraphQuery::new(Err(BackendError::rejected(Service::GraphQuery, "HTTP 400"))),
            StubFormatter::echo(),
        );
        let err = run(&stubs, "SELEC").await.unwrap_err();
        assert_eq!(err.service(), Some(Service::GraphQuery));
        assert_eq!(err.backend_kind(), Some(BackendErrorKind::Rejected));
    }
}
