//! Session-scoped key-value storage.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

/// Session store error.
#[derive(Debug, thiserror::Error)]
pub enum SessionStoreError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store backend error: {0}")]
    Backend(String),
}

/// Key-value storage scoped to one evaluation session.
///
/// Values are JSON so that anything the harness needs to keep between tool
/// invocations can round-trip through the store.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Get the value stored under `key`.
    async fn get(&self, key: &str) -> Result<Option<serde_json::Value>, SessionStoreError>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: serde_json::Value) -> Result<(), SessionStoreError>;

    /// Get the value stored under `key`, or `default` if absent.
    async fn get_or(
        &self,
        key: &str,
        default: serde_json::Value,
    ) -> Result<serde_json::Value, SessionStoreError> {
        Ok(self.get(key).await?.unwrap_or(default))
    }
}

/// In-memory session store. Lives and dies with the harness session.
pub struct MemorySessionStore {
    entries: RwLock<HashMap<String, serde_json::Value>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self, key: &str) -> Result<Option<serde_json::Value>, SessionStoreError> {
        let entries = self.entries.read().await;
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: serde_json::Value) -> Result<(), SessionStoreError> {
        debug!("Session store set: {}", key);
        self.entries.write().await.insert(key.to_string(), value);
        Ok(())
    }
}
