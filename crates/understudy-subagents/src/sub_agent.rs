//! The sub-agent entity and its construction.

use std::sync::atomic::{AtomicU32, Ordering};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use understudy_protocols::types::{Message, Metadata};

use crate::end_run::END_RUN_TOOL_ID;

/// Default model selector for sub-agents (the free-tier model).
pub const DEFAULT_MODEL: &str = "openai/gpt-4o-mini";

/// Default step budget per run invocation.
pub const DEFAULT_MAX_STEPS: u32 = 10;

/// Base instruction template for a sub-agent. `{submit}` expands to the id
/// of the tool the agent calls to finish a run.
const DEFAULT_AGENT_PROMPT: &str = "\
You are a helpful assistant attempting to carry out the task you are given. \
You have a set of tools available to help with the task, and you will see \
the result of each tool call right after making it. If you need to perform \
multiple actions, you can always send more messages with additional tool \
calls. When you have completed the task, or you are stuck and cannot make \
progress, call the {submit} tool to end the run.";

const AGENT_GUIDANCE: &str = "\
Only attempt tasks which you think you can do with your limited set of \
tools. After running a task, you might be asked questions about it. Only \
answer things that you know that you have done.";

/// Allocates zero-padded sub-agent ids from a monotonic counter.
///
/// The counter only ever advances; ids are never reused. Construction paths
/// that don't pass their own allocator draw from [`IdAllocator::global`],
/// so auto-assigned ids stay unique across every registry in the process.
pub struct IdAllocator {
    next: AtomicU32,
}

impl IdAllocator {
    /// Create a fresh allocator starting at `001`.
    pub fn new() -> Self {
        Self {
            next: AtomicU32::new(1),
        }
    }

    /// Take the next id, advancing the counter.
    pub fn next_id(&self) -> String {
        let n = self.next.fetch_add(1, Ordering::SeqCst);
        format!("{:03}", n)
    }

    /// The process-wide shared allocator.
    pub fn global() -> &'static IdAllocator {
        static GLOBAL: Lazy<IdAllocator> = Lazy::new(IdAllocator::new);
        &GLOBAL
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

/// Configuration for constructing a sub-agent.
#[derive(Debug, Clone)]
pub struct SubAgentConfig {
    /// Explicit id; auto-assigned from the allocator when absent.
    pub id: Option<String>,

    /// Step budget per run invocation.
    pub max_steps: u32,

    /// Model selector.
    pub model: String,

    /// Description shown to the primary agent.
    pub public_description: String,

    /// Description folded into the sub-agent's own instructions.
    pub internal_description: String,

    /// Names of the tools available during runs.
    pub tools: Vec<String>,

    /// Free-form metadata, uninterpreted by the core.
    pub metadata: Metadata,

    /// Override for the base instruction template. `{submit}` expands to
    /// the end-run tool id.
    pub system_prompt: Option<String>,
}

impl Default for SubAgentConfig {
    fn default() -> Self {
        Self {
            id: None,
            max_steps: DEFAULT_MAX_STEPS,
            model: DEFAULT_MODEL.to_string(),
            public_description: String::new(),
            internal_description: String::new(),
            tools: Vec::new(),
            metadata: Metadata::new(),
            system_prompt: None,
        }
    }
}

impl SubAgentConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_max_steps(mut self, max_steps: u32) -> Self {
        self.max_steps = max_steps;
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_public_description(mut self, description: impl Into<String>) -> Self {
        self.public_description = description.into();
        self
    }

    pub fn with_internal_description(mut self, description: impl Into<String>) -> Self {
        self.internal_description = description.into();
        self
    }

    pub fn with_tools(mut self, tools: Vec<String>) -> Self {
        self.tools = tools;
        self
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Build the sub-agent, drawing any auto-assigned id from the
    /// process-wide allocator.
    pub fn build(self) -> SubAgent {
        self.build_with(IdAllocator::global())
    }

    /// Build the sub-agent, drawing any auto-assigned id from `ids`.
    pub fn build_with(self, ids: &IdAllocator) -> SubAgent {
        let id = self.id.unwrap_or_else(|| ids.next_id());

        let template = self
            .system_prompt
            .as_deref()
            .unwrap_or(DEFAULT_AGENT_PROMPT);
        let mut prompt = template.replace("{submit}", END_RUN_TOOL_ID);
        prompt.push_str("\n\n");
        prompt.push_str(AGENT_GUIDANCE);
        prompt.push_str("\n\n");
        prompt.push_str(&self.internal_description);

        SubAgent {
            id,
            max_steps: self.max_steps.max(1),
            model: self.model,
            public_description: self.public_description,
            internal_description: self.internal_description,
            tools: self.tools,
            metadata: self.metadata,
            messages: vec![Message::system(prompt)],
        }
    }
}

/// A bounded, independently-stateful delegate agent.
///
/// The registry owns the canonical copy; any instance held by a caller is a
/// working copy until persisted back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubAgent {
    /// Unique id within the registry's lifetime.
    pub id: String,

    /// Step budget per run invocation. Always at least 1.
    pub max_steps: u32,

    /// Model selector.
    pub model: String,

    /// Description shown to the primary agent.
    #[serde(default)]
    pub public_description: String,

    /// Folded into the seeded system message; never rendered by `describe`.
    #[serde(default)]
    internal_description: String,

    /// Names of the tools available during runs. Never contains the
    /// end-run tool in stored form; that one is appended per invocation.
    #[serde(default)]
    pub tools: Vec<String>,

    /// Free-form metadata, uninterpreted by the core.
    #[serde(default)]
    pub metadata: Metadata,

    /// Conversation history. Seeded with the system message; append-only.
    pub messages: Vec<Message>,
}

impl SubAgent {
    /// Human-readable summary for the primary agent. Does not include the
    /// internal description.
    pub fn describe(&self) -> String {
        let mut summary = format!(
            "ID: {}\nModel: {}\nDescription: {}\nMax Steps: {}",
            self.id, self.model, self.public_description, self.max_steps
        );
        if !self.tools.is_empty() {
            summary.push_str(&format!("\nTools: {}", self.tools.join(", ")));
        }
        summary
    }
}

#[cfg(test)]
#[path = "sub_agent_tests.rs"]
mod tests;
