//! Tool registry for managing available tools.

use std::sync::Arc;

use dashmap::DashMap;
use thiserror::Error;

use understudy_protocols::tool::{Tool, ToolDefinition};

/// Errors from registry operations.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Already registered: {0}")]
    AlreadyRegistered(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

/// Registry of the tools sub-agents can be given.
pub struct ToolRegistry {
    tools: DashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// Create a new tool registry.
    pub fn new() -> Self {
        Self {
            tools: DashMap::new(),
        }
    }

    /// Register a tool.
    ///
    /// Returns an error if a tool with the same ID is already registered.
    pub fn register(&self, tool: Arc<dyn Tool>) -> Result<(), RegistryError> {
        let id = tool.definition().id.clone();

        if self.tools.contains_key(&id) {
            return Err(RegistryError::AlreadyRegistered(id));
        }

        self.tools.insert(id, tool);
        Ok(())
    }

    /// Get a tool by ID.
    pub fn get(&self, id: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(id).map(|t| t.clone())
    }

    /// Check if a tool with the given ID is registered.
    pub fn contains(&self, id: &str) -> bool {
        self.tools.contains_key(id)
    }

    /// List all tool definitions.
    pub fn list(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|t| t.definition().clone()).collect()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
