//! Tool Registry - central registration and dispatch for all tools.
//!
//! This module provides:
//! - The closed set of tools with their input declarations
//! - Validation and decoding of raw input into typed parameters
//! - Dispatch of decoded input to the matching handler
//! - Tool metadata for listing

use rmcp::model::Tool;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::warn;

use super::definitions::{
    DiscoverLocationsParams, DiscoverLocationsTool, ExecuteQueryParams, ExecuteQueryTool,
    FormatResultsParams, FormatResultsTool, SelectLocationsParams, SelectLocationsTool,
    SystemPromptParams, SystemPromptTool, TranslateParams, TranslateTool,
};
use super::error::ToolError;
use super::handlers::{ToolContext, ToolOutcome};
use super::schema::{FieldSpec, validate};

// ============================================================================
// Tool Input
// ============================================================================

/// Validated, typed input of one tool call.
#[derive(Debug, Clone)]
pub enum ToolInput {
    SystemPrompt(SystemPromptParams),
    DiscoverLocations(DiscoverLocationsParams),
    SelectLocations(SelectLocationsParams),
    Translate(TranslateParams),
    ExecuteQuery(ExecuteQueryParams),
    FormatResults(FormatResultsParams),
}

impl ToolInput {
    /// Name of the tool this input belongs to.
    pub fn tool_name(&self) -> &'static str {
        match self {
            Self::SystemPrompt(_) => SystemPromptTool::NAME,
            Self::DiscoverLocations(_) => DiscoverLocationsTool::NAME,
            Self::SelectLocations(_) => SelectLocationsTool::NAME,
            Self::Translate(_) => TranslateTool::NAME,
            Self::ExecuteQuery(_) => ExecuteQueryTool::NAME,
            Self::FormatResults(_) => FormatResultsTool::NAME,
        }
    }
}

/// Name, description and input declaration of a registered tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ToolSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub fields: &'static [FieldSpec],
}

const SPECS: &[ToolSpec] = &[
    ToolSpec {
        name: SystemPromptTool::NAME,
        description: SystemPromptTool::DESCRIPTION,
        fields: SystemPromptTool::FIELDS,
    },
    ToolSpec {
        name: DiscoverLocationsTool::NAME,
        description: DiscoverLocationsTool::DESCRIPTION,
        fields: DiscoverLocationsTool::FIELDS,
    },
    ToolSpec {
        name: SelectLocationsTool::NAME,
        description: SelectLocationsTool::DESCRIPTION,
        fields: SelectLocationsTool::FIELDS,
    },
    ToolSpec {
        name: TranslateTool::NAME,
        description: TranslateTool::DESCRIPTION,
        fields: TranslateTool::FIELDS,
    },
    ToolSpec {
        name: ExecuteQueryTool::NAME,
        description: ExecuteQueryTool::DESCRIPTION,
        fields: ExecuteQueryTool::FIELDS,
    },
    ToolSpec {
        name: FormatResultsTool::NAME,
        description: FormatResultsTool::DESCRIPTION,
        fields: FormatResultsTool::FIELDS,
    },
];

// ============================================================================
// Tool Registry
// ============================================================================

/// Tool registry - manages all available tools.
///
/// The set of tools is fixed when the registry is built; a name outside it
/// is an [`ToolError::UnknownTool`].
#[derive(Debug, Clone, Default)]
pub struct ToolRegistry;

impl ToolRegistry {
    /// Create a new tool registry.
    pub fn new() -> Self {
        Self
    }

    /// Get all tool names.
    pub fn tool_names(&self) -> Vec<&'static str> {
        SPECS.iter().map(|spec| spec.name).collect()
    }

    /// Declarations of every registered tool.
    pub fn specs(&self) -> &'static [ToolSpec] {
        SPECS
    }

    /// Look up a tool by name.
    pub fn spec(&self, name: &str) -> Result<&'static ToolSpec, ToolError> {
        SPECS.iter().find(|spec| spec.name == name).ok_or_else(|| {
            warn!("Unknown tool requested: {}", name);
            ToolError::unknown_tool(name)
        })
    }

    /// Validate `input` against the named tool's declaration and decode it.
    pub fn parse(&self, name: &str, input: Value) -> Result<ToolInput, ToolError> {
        let spec = self.spec(name)?;
        validate(spec.fields, &input)?;

        let input = match input {
            Value::Null => Value::Object(Map::new()),
            other => other,
        };

        Ok(match spec.name {
            SystemPromptTool::NAME => ToolInput::SystemPrompt(decode(input)?),
            DiscoverLocationsTool::NAME => ToolInput::DiscoverLocations(decode(input)?),
            SelectLocationsTool::NAME => ToolInput::SelectLocations(decode(input)?),
            TranslateTool::NAME => ToolInput::Translate(decode(input)?),
            ExecuteQueryTool::NAME => ToolInput::ExecuteQuery(decode(input)?),
            FormatResultsTool::NAME => ToolInput::FormatResults(decode(input)?),
            other => return Err(ToolError::unknown_tool(other)),
        })
    }

    /// Run the handler matching `input`.
    pub async fn execute(
        &self,
        input: ToolInput,
        ctx: &ToolContext<'_>,
    ) -> Result<ToolOutcome, ToolError> {
        match input {
            ToolInput::SystemPrompt(params) => SystemPromptTool::execute(params),
            ToolInput::DiscoverLocations(params) => {
                DiscoverLocationsTool::execute(params, ctx).await
            }
            ToolInput::SelectLocations(params) => SelectLocationsTool::execute(params),
            ToolInput::Translate(params) => TranslateTool::execute(params, ctx).await,
            ToolInput::ExecuteQuery(params) => ExecuteQueryTool::execute(params, ctx).await,
            ToolInput::FormatResults(params) => FormatResultsTool::execute(params, ctx).await,
        }
    }

    /// Get all tools as Tool models (metadata).
    ///
    /// This is the single source of truth for tool metadata on every
    /// transport.
    pub fn get_all_tools() -> Vec<Tool> {
        vec![
            SystemPromptTool::to_tool(),
            DiscoverLocationsTool::to_tool(),
            SelectLocationsTool::to_tool(),
            TranslateTool::to_tool(),
            ExecuteQueryTool::to_tool(),
            FormatResultsTool::to_tool(),
        ]
    }
}

/// Decode validated input; a failure here means a field was structurally
/// valid but semantically unusable.
fn decode<T: DeserializeOwned>(input: Value) -> Result<T, ToolError> {
    serde_json::from_value(input).map_err(|e| ToolError::validation("input", e.to_string()))
}
