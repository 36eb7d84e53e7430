//! Session domain module.
//!
//! Per-conversation state keyed by thread identifier. The store holds the
//! locations a conversation has selected and the last query translated for
//! it; it carries no business logic of its own.
//!
//! - `model.rs` - `Session`, `SessionState`, `ThreadId` and mutations
//! - `store.rs` - keyed store with one lock per thread identifier
//! - `error.rs` - session-specific error types

mod error;
mod model;
mod store;

pub use error::SessionError;
pub use model::{Session, SessionMutation, SessionState, ThreadId};
pub use store::SessionStore;
