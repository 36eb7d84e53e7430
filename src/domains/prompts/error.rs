//! Prompt-specific error types.

use thiserror::Error;

/// Errors that can occur while rendering a prompt template.
#[derive(Debug, Error)]
pub enum PromptError {
    /// Required argument is missing or blank.
    #[error("Template '{template}' is missing required argument '{argument}'")]
    MissingArgument {
        template: &'static str,
        argument: String,
    },
}

impl PromptError {
    /// Create a new "missing argument" error.
    pub fn missing_argument(template: &'static str, argument: impl Into<String>) -> Self {
        Self::MissingArgument {
            template,
            argument: argument.into(),
        }
    }
}
