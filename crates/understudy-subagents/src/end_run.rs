//! The end-run tool: how a sub-agent voluntarily finishes a run.

use async_trait::async_trait;
use serde::Deserialize;

use understudy_protocols::error::ToolError;
use understudy_protocols::tool::{LoopControl, Tool, ToolContext, ToolDefinition, ToolResult};

/// Tool id of the end-run capability.
pub const END_RUN_TOOL_ID: &str = "end_run";

#[derive(Debug, Deserialize)]
struct EndRunParams {
    /// Reason for stopping the run.
    stop_reason: String,
}

/// Ends the current run.
///
/// Appended transiently to a sub-agent's capability set for every run
/// invocation; never stored on the entity and never offered during chat.
/// Its result carries a typed [`LoopControl::EndRun`] signal, which is what
/// the run loop actually reacts to.
pub struct EndRunTool {
    definition: ToolDefinition,
}

impl EndRunTool {
    pub fn new() -> Self {
        let definition = ToolDefinition::new(
            END_RUN_TOOL_ID,
            "Use this tool only when you want to end the run. End the run when \
             you have either fulfilled your instructions or you are stuck and \
             don't know what to do.",
        )
        .with_parameters_schema(serde_json::json!({
            "type": "object",
            "properties": {
                "stop_reason": {
                    "type": "string",
                    "description": "Reason for stopping the run"
                }
            },
            "required": ["stop_reason"]
        }));

        Self { definition }
    }
}

impl Default for EndRunTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for EndRunTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(
        &self,
        params: serde_json::Value,
        _ctx: ToolContext,
    ) -> Result<ToolResult, ToolError> {
        let params: EndRunParams = serde_json::from_value(params)
            .map_err(|e| ToolError::InvalidParameters(e.to_string()))?;

        Ok(
            ToolResult::success(format!("Run ended with reason: {}", params.stop_reason))
                .with_control(LoopControl::EndRun {
                    reason: params.stop_reason,
                }),
        )
    }
}
