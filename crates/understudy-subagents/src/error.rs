//! Delegation errors.

use thiserror::Error;

use understudy_protocols::error::{ProviderError, ToolError};
use understudy_runtime::SessionStoreError;

#[derive(Debug, Error)]
pub enum DelegationError {
    #[error("Sub-agent not found: {0}")]
    AgentNotFound(String),

    #[error("No sub-agents registered")]
    NoAgentsRegistered,

    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Tool dispatch error: {0}")]
    Dispatch(#[from] ToolError),

    #[error("Session store error: {0}")]
    Store(#[from] SessionStoreError),

    #[error("Registry serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
