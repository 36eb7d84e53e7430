//! Location discovery tool definition.
//!
//! Asks the translator for a query listing the measurement locations of a
//! place, runs it against the triple store and returns the locations with a
//! map hint. Both backend calls are read-only, so a failure of the second
//! needs no compensation for the first. The session is never written.

use rmcp::{handler::server::tool::cached_schema_for_type, model::Tool};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::domains::backends::TranslationRequest;
use crate::domains::prompts::discovery_question;
use crate::domains::tools::error::ToolError;
use crate::domains::tools::geo::{Location, MapView, locations_from_rows};
use crate::domains::tools::handlers::{ToolContext, ToolOutcome, require_non_blank};
use crate::domains::tools::schema::{FieldKind, FieldSpec};

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for location discovery.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DiscoverLocationsParams {
    /// Place to search, e.g. a city, region or water body.
    #[schemars(description = "Place to search for measurement locations (e.g. 'Oostende')")]
    pub location: String,
}

/// Structured output of a discovery.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveredLocations {
    pub location: String,
    pub query: String,
    pub locations: Vec<Location>,
    #[serde(rename = "total-count")]
    pub total_count: usize,
    pub map_view: MapView,
}

// ============================================================================
// Tool Definition
// ============================================================================

pub struct DiscoverLocationsTool;

impl DiscoverLocationsTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "discover_locations";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Find the measurement locations in a place. Returns each location's identifier and coordinates, the number found and a suggested map center and zoom level.";

    pub const FIELDS: &'static [FieldSpec] = &[FieldSpec::required("location", FieldKind::String)];

    #[instrument(skip_all, fields(location = %params.location))]
    pub async fn execute(
        params: DiscoverLocationsParams,
        ctx: &ToolContext<'_>,
    ) -> Result<ToolOutcome, ToolError> {
        require_non_blank("location", &params.location)?;
        let question = discovery_question(&params.location)
            .map_err(|e| ToolError::validation("location", e.to_string()))?;

        let query = ctx
            .backends
            .translator
            .translate(&TranslationRequest {
                question,
                selected_location_ids: None,
                thread_id: ctx.thread_id.to_string(),
            })
            .await?;

        let results = ctx.backends.graph.execute(&query).await?;
        let locations = locations_from_rows(&results.rows);
        let points: Vec<_> = locations.iter().map(Location::coordinate).collect();
        let map_view = MapView::fit(&points);

        info!(
            "Discovered {} location(s) in {} ({} row(s))",
            locations.len(),
            params.location,
            results.total_count
        );

        ToolOutcome::read_only(DiscoveredLocations {
            location: params.location,
            query,
            total_count: locations.len(),
            locations,
            map_view,
        })
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<DiscoverLocationsParams>(),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
