//! The step-bounded run protocol.

use std::sync::Arc;

use tracing::{debug, info, warn};

use understudy_protocols::provider::{CompletionRequest, ModelProvider};
use understudy_protocols::tool::{LoopControl, Tool, ToolContext, ToolDefinition};
use understudy_protocols::types::Message;
use understudy_runtime::{ToolDispatcher, ToolRegistry};

use crate::end_run::EndRunTool;
use crate::error::DelegationError;
use crate::registry::SubAgentRegistry;
use crate::sub_agent::SubAgent;

/// Outcome of one run invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunReport {
    /// Number of executed steps (1-based count: one model invocation plus
    /// its tool dispatch is one step).
    pub steps: u32,

    /// Whether the run ended through the end-run tool rather than by
    /// exhausting the step budget.
    pub stopped_early: bool,
}

impl RunReport {
    /// Status line reported back to the primary agent.
    pub fn summary(&self, agent_id: &str) -> String {
        format!(
            "Sub-agent {} ran for {} steps. You can now ask it questions.",
            agent_id, self.steps
        )
    }
}

/// Drives sub-agents: the step-bounded run protocol and the single-turn
/// chat protocol, against injected collaborators.
pub struct SubAgentRunner {
    pub(crate) provider: Arc<dyn ModelProvider>,
    pub(crate) dispatcher: Arc<dyn ToolDispatcher>,
    pub(crate) tools: Arc<ToolRegistry>,
    pub(crate) registry: SubAgentRegistry,
}

impl SubAgentRunner {
    pub fn new(
        provider: Arc<dyn ModelProvider>,
        dispatcher: Arc<dyn ToolDispatcher>,
        tools: Arc<ToolRegistry>,
        registry: SubAgentRegistry,
    ) -> Self {
        Self {
            provider,
            dispatcher,
            tools,
            registry,
        }
    }

    /// The registry this runner reads and writes.
    pub fn registry(&self) -> &SubAgentRegistry {
        &self.registry
    }

    /// Run the sub-agent on the given instructions until it ends the run
    /// itself or its step budget is exhausted.
    ///
    /// The entity is persisted on either terminal path. A provider or
    /// dispatcher failure propagates without persisting, so the failing
    /// run's messages never reach the registry.
    pub async fn run(
        &self,
        agent: &mut SubAgent,
        instructions: &str,
        ctx: &ToolContext,
    ) -> Result<RunReport, DelegationError> {
        debug!("Starting run for sub-agent {}", agent.id);
        agent.messages.push(Message::user(instructions));

        let capabilities = self.capability_set(agent);
        let definitions: Vec<ToolDefinition> = capabilities
            .iter()
            .map(|t| t.definition().clone())
            .collect();

        let mut steps = 0;
        let mut stopped_early = false;

        for _ in 0..agent.max_steps {
            let request = CompletionRequest::new(agent.model.clone(), agent.messages.clone())
                .with_tools(definitions.clone());
            let response = self.provider.complete(request).await?;

            agent.messages.push(response.message.clone());
            steps += 1;

            // A step without tool calls still counts against the budget;
            // only the end-run signal stops the loop before it runs out.
            if response.message.tool_calls.is_empty() {
                continue;
            }

            let results = self
                .dispatcher
                .dispatch(&response.message, &capabilities, ctx)
                .await?;

            for result in &results {
                agent.messages.push(result.message.clone());
            }

            if results
                .iter()
                .any(|r| matches!(r.control, Some(LoopControl::EndRun { .. })))
            {
                info!("Sub-agent {} ended its run after {} steps", agent.id, steps);
                stopped_early = true;
                break;
            }
        }

        if !stopped_early {
            info!(
                "Sub-agent {} exhausted its budget of {} steps",
                agent.id, agent.max_steps
            );
        }

        self.registry.persist(agent).await?;
        Ok(RunReport {
            steps,
            stopped_early,
        })
    }

    /// Resolve the entity's tool names and append the end-run tool, forming
    /// the transient capability set for one run invocation.
    fn capability_set(&self, agent: &SubAgent) -> Vec<Arc<dyn Tool>> {
        let mut capabilities: Vec<Arc<dyn Tool>> = Vec::with_capacity(agent.tools.len() + 1);
        for name in &agent.tools {
            match self.tools.get(name) {
                Some(tool) => capabilities.push(tool),
                None => warn!("Sub-agent {} references unknown tool: {}", agent.id, name),
            }
        }
        capabilities.push(Arc::new(EndRunTool::new()));
        capabilities
    }
}

#[cfg(test)]
#[path = "run_loop_tests.rs"]
mod tests;
