//! The tool surface the primary agent sees.
//!
//! Three tools are emitted per session: `sub_agent_specs`, `run_sub_agent`
//! and `chat_with_sub_agent`. Their argument shapes are fixed once, at
//! build time, by how many sub-agents are configured: with exactly one
//! sub-agent the run/chat tools take no id and implicitly target it; with
//! more than one they require an explicit `sub_agent_id`.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::info;

use understudy_protocols::error::ToolError;
use understudy_protocols::tool::{Tool, ToolContext, ToolDefinition, ToolResult};

use crate::error::DelegationError;
use crate::run_loop::SubAgentRunner;
use crate::sub_agent::SubAgent;

/// Shape of the emitted tool surface, decided by sub-agent cardinality at
/// build time and never re-evaluated afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceMode {
    /// Exactly one sub-agent: run/chat implicitly target it.
    Single,
    /// Two or more sub-agents: run/chat require an explicit id.
    Multi,
}

/// Register the given sub-agents and emit the tool surface for them.
///
/// Zero sub-agents yields an empty surface and leaves the registry alone.
pub async fn build_sub_agent_tools(
    runner: Arc<SubAgentRunner>,
    agents: Vec<SubAgent>,
) -> Result<Vec<Arc<dyn Tool>>, DelegationError> {
    if agents.is_empty() {
        return Ok(Vec::new());
    }

    runner.registry.init(&agents).await?;

    let mode = if agents.len() == 1 {
        SurfaceMode::Single
    } else {
        SurfaceMode::Multi
    };
    info!(
        "Built sub-agent tool surface: {} agents, {:?} mode",
        agents.len(),
        mode
    );

    Ok(vec![
        Arc::new(SubAgentSpecsTool::new(runner.clone(), mode)),
        Arc::new(RunSubAgentTool::new(runner.clone(), mode)),
        Arc::new(ChatWithSubAgentTool::new(runner, mode)),
    ])
}

fn delegation_failure(e: DelegationError) -> ToolError {
    ToolError::ExecutionFailed(e.to_string())
}

fn invalid_params(e: serde_json::Error) -> ToolError {
    ToolError::InvalidParameters(e.to_string())
}

// Concrete argument shapes, one per mode.

#[derive(Debug, Deserialize)]
struct RunParams {
    instructions: String,
}

#[derive(Debug, Deserialize)]
struct TargetedRunParams {
    sub_agent_id: String,
    instructions: String,
}

#[derive(Debug, Deserialize)]
struct ChatParams {
    question: String,
}

#[derive(Debug, Deserialize)]
struct TargetedChatParams {
    sub_agent_id: String,
    question: String,
}

/// Reports the specifications of the configured sub-agents.
pub struct SubAgentSpecsTool {
    definition: ToolDefinition,
    runner: Arc<SubAgentRunner>,
    mode: SurfaceMode,
}

impl SubAgentSpecsTool {
    pub fn new(runner: Arc<SubAgentRunner>, mode: SurfaceMode) -> Self {
        let description = match mode {
            SurfaceMode::Single => {
                "Show the specification of the sub agent. Use this tool to \
                 learn what the sub agent can be used for."
            }
            SurfaceMode::Multi => {
                "List all available sub agents with their specifications. Use \
                 this tool to find the right sub agent for the task at hand."
            }
        };
        let definition = ToolDefinition::new("sub_agent_specs", description)
            .with_parameters_schema(serde_json::json!({
                "type": "object",
                "properties": {}
            }));

        Self {
            definition,
            runner,
            mode,
        }
    }
}

#[async_trait]
impl Tool for SubAgentSpecsTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(
        &self,
        _params: serde_json::Value,
        _ctx: ToolContext,
    ) -> Result<ToolResult, ToolError> {
        let text = match self.mode {
            SurfaceMode::Single => {
                let agent = self
                    .runner
                    .registry
                    .resolve(None)
                    .await
                    .map_err(delegation_failure)?;
                agent.describe()
            }
            SurfaceMode::Multi => {
                let agents = self
                    .runner
                    .registry
                    .list()
                    .await
                    .map_err(delegation_failure)?;
                agents
                    .iter()
                    .map(SubAgent::describe)
                    .collect::<Vec<_>>()
                    .join("\n")
            }
        };

        Ok(ToolResult::success(text))
    }
}

/// Runs a sub-agent on a set of instructions.
pub struct RunSubAgentTool {
    definition: ToolDefinition,
    runner: Arc<SubAgentRunner>,
    mode: SurfaceMode,
}

impl RunSubAgentTool {
    pub fn new(runner: Arc<SubAgentRunner>, mode: SurfaceMode) -> Self {
        let description = "Runs a sub agent. Note you will not know what the \
                           sub agent did. To know that, you need to chat with it.";
        let schema = match mode {
            SurfaceMode::Single => serde_json::json!({
                "type": "object",
                "properties": {
                    "instructions": {
                        "type": "string",
                        "description": "Instructions for the sub agent"
                    }
                },
                "required": ["instructions"]
            }),
            SurfaceMode::Multi => serde_json::json!({
                "type": "object",
                "properties": {
                    "sub_agent_id": {
                        "type": "string",
                        "description": "ID of the sub agent to run"
                    },
                    "instructions": {
                        "type": "string",
                        "description": "Instructions for the sub agent"
                    }
                },
                "required": ["sub_agent_id", "instructions"]
            }),
        };
        let definition =
            ToolDefinition::new("run_sub_agent", description).with_parameters_schema(schema);

        Self {
            definition,
            runner,
            mode,
        }
    }
}

#[async_trait]
impl Tool for RunSubAgentTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(
        &self,
        params: serde_json::Value,
        ctx: ToolContext,
    ) -> Result<ToolResult, ToolError> {
        let (target, instructions) = match self.mode {
            SurfaceMode::Single => {
                let params: RunParams =
                    serde_json::from_value(params).map_err(invalid_params)?;
                (None, params.instructions)
            }
            SurfaceMode::Multi => {
                let params: TargetedRunParams =
                    serde_json::from_value(params).map_err(invalid_params)?;
                (Some(params.sub_agent_id), params.instructions)
            }
        };

        let mut agent = self
            .runner
            .registry
            .resolve(target.as_deref())
            .await
            .map_err(delegation_failure)?;
        let report = self
            .runner
            .run(&mut agent, &instructions, &ctx)
            .await
            .map_err(delegation_failure)?;

        Ok(ToolResult::success(report.summary(&agent.id)))
    }
}

/// Chats with a sub-agent about what it did.
pub struct ChatWithSubAgentTool {
    definition: ToolDefinition,
    runner: Arc<SubAgentRunner>,
    mode: SurfaceMode,
}

impl ChatWithSubAgentTool {
    pub fn new(runner: Arc<SubAgentRunner>, mode: SurfaceMode) -> Self {
        let description = "Chats with a sub agent that previously was run with \
                           some instructions.";
        let schema = match mode {
            SurfaceMode::Single => serde_json::json!({
                "type": "object",
                "properties": {
                    "question": {
                        "type": "string",
                        "description": "Question to ask the sub agent"
                    }
                },
                "required": ["question"]
            }),
            SurfaceMode::Multi => serde_json::json!({
                "type": "object",
                "properties": {
                    "sub_agent_id": {
                        "type": "string",
                        "description": "ID of the sub agent to chat with"
                    },
                    "question": {
                        "type": "string",
                        "description": "Question to ask the sub agent"
                    }
                },
                "required": ["sub_agent_id", "question"]
            }),
        };
        let definition =
            ToolDefinition::new("chat_with_sub_agent", description).with_parameters_schema(schema);

        Self {
            definition,
            runner,
            mode,
        }
    }
}

#[async_trait]
impl Tool for ChatWithSubAgentTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(
        &self,
        params: serde_json::Value,
        _ctx: ToolContext,
    ) -> Result<ToolResult, ToolError> {
        let (target, question) = match self.mode {
            SurfaceMode::Single => {
                let params: ChatParams =
                    serde_json::from_value(params).map_err(invalid_params)?;
                (None, params.question)
            }
            SurfaceMode::Multi => {
                let params: TargetedChatParams =
                    serde_json::from_value(params).map_err(invalid_params)?;
                (Some(params.sub_agent_id), params.question)
            }
        };

        let mut agent = self
            .runner
            .registry
            .resolve(target.as_deref())
            .await
            .map_err(delegation_failure)?;
        let answer = self
            .runner
            .chat(&mut agent, &question)
            .await
            .map_err(delegation_failure)?;

        Ok(ToolResult::success(answer))
    }
}

#[cfg(test)]
#[path = "surface_tests.rs"]
mod tests;
