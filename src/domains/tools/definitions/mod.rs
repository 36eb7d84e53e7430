//! Tool definitions module.
//!
//! This module exports all available tool definitions.
//! Each tool is defined in its own file for better maintainability.

pub mod discover_locations;
pub mod execute_query;
pub mod format_results;
pub mod select_locations;
pub mod system_prompt;
pub mod translate;

pub use discover_locations::{DiscoverLocationsParams, DiscoverLocationsTool};
pub use execute_query::{ExecuteQueryParams, ExecuteQueryTool};
pub use format_results::{FormatResultsParams, FormatResultsTool};
pub use select_locations::{SelectLocationsParams, SelectLocationsTool};
pub use system_prompt::{SystemPromptParams, SystemPromptTool};
pub use translate::{TranslateParams, TranslateTool};
