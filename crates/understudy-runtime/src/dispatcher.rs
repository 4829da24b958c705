//! Tool-call dispatch.
//!
//! Executes the tool calls an assistant message requests against a
//! capability set and returns one result per call, in request order, each
//! tagged with the capability id it answers.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use understudy_protocols::error::ToolError;
use understudy_protocols::tool::{LoopControl, Tool, ToolContext};
use understudy_protocols::types::Message;

/// One dispatched tool call's outcome.
#[derive(Debug, Clone)]
pub struct DispatchedCall {
    /// Capability id this result answers.
    pub capability: String,

    /// The tool-result message to append to the conversation.
    pub message: Message,

    /// Loop-control signal lifted out of the tool result, if any.
    pub control: Option<LoopControl>,
}

/// Dispatches the tool calls in an assistant message against a capability set.
#[async_trait]
pub trait ToolDispatcher: Send + Sync {
    /// Execute every tool call in `assistant`, in order, and return the
    /// outcomes in the same order.
    async fn dispatch(
        &self,
        assistant: &Message,
        capabilities: &[Arc<dyn Tool>],
        ctx: &ToolContext,
    ) -> Result<Vec<DispatchedCall>, ToolError>;
}

/// Reference dispatcher: executes calls one at a time, in request order.
///
/// A missing capability or a failing tool becomes an error-text result
/// message rather than a dispatch failure, so one bad call does not abort
/// the whole batch.
pub struct SequentialDispatcher;

impl SequentialDispatcher {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SequentialDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ToolDispatcher for SequentialDispatcher {
    async fn dispatch(
        &self,
        assistant: &Message,
        capabilities: &[Arc<dyn Tool>],
        ctx: &ToolContext,
    ) -> Result<Vec<DispatchedCall>, ToolError> {
        let mut results = Vec::with_capacity(assistant.tool_calls.len());

        for call in &assistant.tool_calls {
            // Later entries shadow earlier ones with the same id, so a
            // transiently appended capability wins over a registry tool that
            // happens to share its name.
            let tool = capabilities
                .iter()
                .rev()
                .find(|t| t.definition().id == call.name);

            let outcome = match tool {
                None => {
                    warn!("Requested tool not in capability set: {}", call.name);
                    DispatchedCall {
                        capability: call.name.clone(),
                        message: Message::tool(
                            &call.id,
                            &call.name,
                            format!("Tool not found: {}", call.name),
                        ),
                        control: None,
                    }
                }
                Some(tool) => {
                    debug!("Dispatching tool call: {} ({})", call.name, call.id);
                    let execution = match tool.validate(&call.arguments) {
                        Ok(()) => tool.execute(call.arguments.clone(), ctx.clone()).await,
                        Err(e) => Err(e),
                    };

                    match execution {
                        Ok(result) => {
                            let text = if result.success {
                                result.content
                            } else {
                                format!(
                                    "Tool error: {}",
                                    result.error.unwrap_or_else(|| "unknown".to_string())
                                )
                            };
                            DispatchedCall {
                                capability: call.name.clone(),
                                message: Message::tool(&call.id, &call.name, text),
                                control: result.control,
                            }
                        }
                        Err(e) => DispatchedCall {
                            capability: call.name.clone(),
                            message: Message::tool(
                                &call.id,
                                &call.name,
                                format!("Tool error: {}", e),
                            ),
                            control: None,
                        },
                    }
                }
            };

            results.push(outcome);
        }

        Ok(results)
    }
}

#[cfg(test)]
#[path = "dispatcher_tests.rs"]
mod tests;
