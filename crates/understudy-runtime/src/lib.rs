//! # Understudy Runtime
//!
//! Harness-side runtime services for the Understudy delegation layer:
//!
//! - [`SessionStore`] - session-scoped key-value storage with an in-memory
//!   implementation for the harness session lifetime
//! - [`ToolRegistry`] - registry of the tools sub-agents can be given
//! - [`ToolDispatcher`] - executes the tool calls an assistant message
//!   requests and returns name-tagged results

mod dispatcher;
mod session_store;
mod tool_registry;

pub use dispatcher::{DispatchedCall, SequentialDispatcher, ToolDispatcher};
pub use session_store::{MemorySessionStore, SessionStore, SessionStoreError};
pub use tool_registry::{RegistryError, ToolRegistry};
