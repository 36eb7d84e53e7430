//! Location selection tool definition.
//!
//! Replaces the locations the conversation is about. Selecting the same set
//! twice leaves the session exactly as after the first call.

use rmcp::{handler::server::tool::cached_schema_for_type, model::Tool};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domains::session::SessionMutation;
use crate::domains::tools::error::ToolError;
use crate::domains::tools::handlers::ToolOutcome;
use crate::domains::tools::schema::{FieldKind, FieldSpec};

/// Parameters for location selection.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SelectLocationsParams {
    /// Identifiers as returned by `discover_locations`, in preference order.
    #[schemars(description = "Identifiers of the locations to select, as returned by discover_locations")]
    pub location_ids: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Selection<'a> {
    selected_location_ids: &'a [String],
    count: usize,
}

pub struct SelectLocationsTool;

impl SelectLocationsTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "select_locations";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Select the measurement locations the following questions are about. Replaces any earlier selection of this conversation and returns the number of selected locations.";

    pub const FIELDS: &'static [FieldSpec] =
        &[FieldSpec::required("locationIds", FieldKind::StringArray)];

    pub fn execute(params: SelectLocationsParams) -> Result<ToolOutcome, ToolError> {
        for (index, id) in params.location_ids.iter().enumerate() {
            if id.trim().is_empty() {
                return Err(ToolError::validation(
                    format!("locationIds[{}]", index),
                    "location identifier must not be empty",
                ));
            }
        }

        info!("Selecting {} location(s)", params.location_ids.len());

        let mutation = SessionMutation::SelectLocations(params.location_ids.clone());
        ToolOutcome::mutating(
            Selection {
                selected_location_ids: &params.location_ids,
                count: params.location_ids.len(),
            },
            mutation,
        )
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<SelectLocationsParams>(),
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
    use serde_json::json;

    fn params(ids: &[&str]) -> SelectLocationsParams {
        SelectLocationsParams {
            location_ids: ids.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_select_reports_count_and_mutation() {
        let outcome = SelectLocationsTool::execute(params(&["A", "B"])).unwrap();
        assert_eq!(
            outcome.result,
            json!({ "selectedLocationIds": ["A", "B"], "count": 2 })
        );
        assert_eq!(
            outcome.mutation,
            Some(SessionMutation::SelectLocations(vec!["A".into(), "B".into()]))
        );
    }

    #[test]
    fn test_select_is_idempotent() {
        let first = SelectLocationsTool::execute(params(&["A", "B"])).unwrap();
        let second = SelectLocationsTool::execute(params(&["A", "B"])).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_identifier_is_rejected() {
        let err = SelectLocationsTool::execute(params(&["A", " ", "C"])).unwrap_err();
        assert_eq!(err.field(), Some("locationIds[1]"));
    }

    #[test]
    fn test_empty_selection_clears() {
        let outcome = SelectLocationsTool::execute(params(&[])).unwrap();
        assert_eq!(outcome.result["count"], json!(0));
        assert_eq!(outcome.mutation, Some(SessionMutation::SelectLocations(vec![])));
    }
}
