//! NL-to-SPARQL translation tool definition.
//!
//! Sends the question to the translator together with the conversation's
//! selected locations and remembers the resulting query. An empty selection
//! is forwarded as is; whether that is acceptable is the translator's call.

use rmcp::{handler::server::tool::cached_schema_for_type, model::Tool};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::domains::backends::{BackendErrorKind, TranslationRequest};
use crate::domains::session::SessionMutation;
use crate::domains::tools::error::ToolError;
use crate::domains::tools::handlers::{ToolContext, ToolOutcome, require_non_blank};
use crate::domains::tools::schema::{FieldKind, FieldSpec};

/// Parameters for translation.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct TranslateParams {
    /// The user's question in natural language.
    #[schemars(description = "The user's question in natural language")]
    pub question: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Translation<'a> {
    query: &'a str,
    selected_location_ids: &'a [String],
}

pub struct TranslateTool;

impl TranslateTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "translate_nl_to_sparql";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Translate a natural-language question about the selected locations into a SPARQL query. The query is remembered for this conversation and returned.";

    pub const FIELDS: &'static [FieldSpec] = &[FieldSpec::required("question", FieldKind::String)];

    #[instrument(skip_all, fields(thread_id = %ctx.thread_id))]
    pub async fn execute(
        params: TranslateParams,
        ctx: &ToolContext<'_>,
    ) -> Result<ToolOutcome, ToolError> {
        require_non_blank("question", &params.question)?;
        let selected = &ctx.session.selected_location_ids;

        let request = TranslationRequest {
            question: params.question,
            selected_location_ids: Some(selected.clone()),
            thread_id: ctx.thread_id.to_string(),
        };

        let query = match ctx.backends.translator.translate(&request).await {
            Ok(query) => query,
            Err(err) => {
                if err.kind == BackendErrorKind::Rejected && selected.is_empty() {
                    warn!("Translator rejected a question with no locations selected");
                }
                return Err(err.into());
            }
        };

        info!(
            "Translated question over {} location(s) into {} bytes of SPARQL",
            selected.len(),
            query.len()
        );

        ToolOutcome::mutating(
            Translation {
                query: &query,
                selected_location_ids: selected,
            },
            SessionMutation::RecordTranslation(query.clone()),
        )
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<TranslateParams>(),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }
}
