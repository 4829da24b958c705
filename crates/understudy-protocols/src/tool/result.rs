//! Tool execution result types.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::types::Metadata;

/// Control signal a tool can attach to its result to steer the run loop.
///
/// This is a typed channel distinct from the result's text payload, so the
/// loop never has to infer control flow from tool names or output strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LoopControl {
    /// End the current run, carrying the reason the sub-agent gave.
    EndRun { reason: String },
}

/// Result of a tool execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    /// Whether the execution was successful.
    pub success: bool,

    /// Output content.
    pub content: String,

    /// Error message if execution failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Loop-control signal, if the tool emitted one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub control: Option<LoopControl>,

    /// Additional metadata about the execution.
    #[serde(default)]
    pub metadata: Metadata,
}

impl ToolResult {
    /// Create a successful result with text content.
    pub fn success(content: impl Into<String>) -> Self {
        Self {
            success: true,
            content: content.into(),
            error: None,
            control: None,
            metadata: HashMap::new(),
        }
    }

    /// Create an error result.
    pub fn error(error: impl Into<String>) -> Self {
        let error_msg = error.into();
        Self {
            success: false,
            content: String::new(),
            error: Some(error_msg),
            control: None,
            metadata: HashMap::new(),
        }
    }

    /// Attach a loop-control signal to the result.
    pub fn with_control(mut self, control: LoopControl) -> Self {
        self.control = Some(control);
        self
    }

    /// Add metadata to the result.
    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }
}
