//! Prompts domain module.
//!
//! Static text the server hands out or sends on its own behalf: the system
//! prompt returned by `get_system_prompt` and the fixed question used to
//! discover measurement locations.

mod error;
mod system;
mod templates;

pub use error::PromptError;
pub use system::{DISCOVERY_QUESTION, SYSTEM_PROMPT, discovery_question};
pub use templates::PromptTemplate;
