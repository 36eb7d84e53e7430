//! System prompt tool definition.
//!
//! Hands the chat agent its standing instructions. Pure and idempotent.

use rmcp::{handler::server::tool::cached_schema_for_type, model::Tool};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domains::prompts::SYSTEM_PROMPT;
use crate::domains::tools::error::ToolError;
use crate::domains::tools::handlers::ToolOutcome;
use crate::domains::tools::schema::FieldSpec;

/// The system prompt tool takes no parameters.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct SystemPromptParams {}

#[derive(Debug, Serialize)]
struct SystemPromptResult {
    prompt: &'static str,
}

pub struct SystemPromptTool;

impl SystemPromptTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "get_system_prompt";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Get the instructions for answering measurement questions with these tools. Call this first in every conversation.";

    pub const FIELDS: &'static [FieldSpec] = &[];

    pub fn execute(_params: SystemPromptParams) -> Result<ToolOutcome, ToolError> {
        ToolOutcome::read_only(SystemPromptResult {
            prompt: SYSTEM_PROMPT,
        })
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<SystemPromptParams>(),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }
}
