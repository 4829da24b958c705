//! # Understudy Sub-Agents
//!
//! The delegation core: lets a primary agent drive bounded subordinate
//! agents through a small tool surface.
//!
//! A [`SubAgent`] bundles identity, step budget, model selector, tool names
//! and conversation history. [`SubAgentRegistry`] keeps the canonical copy
//! of every configured sub-agent in the harness session store.
//! [`SubAgentRunner`] executes the step-bounded run protocol and the
//! single-turn chat protocol. [`build_sub_agent_tools`] emits the tools the
//! primary agent sees (`sub_agent_specs`, `run_sub_agent`,
//! `chat_with_sub_agent`), shaped by how many sub-agents are configured.

mod chat;
mod config;
mod end_run;
mod error;
mod registry;
mod run_loop;
mod sub_agent;
mod surface;

pub use config::DelegationConfig;
pub use end_run::{EndRunTool, END_RUN_TOOL_ID};
pub use error::DelegationError;
pub use registry::{SubAgentRegistry, SUB_AGENTS_KEY};
pub use run_loop::{RunReport, SubAgentRunner};
pub use sub_agent::{
    IdAllocator, SubAgent, SubAgentConfig, DEFAULT_MAX_STEPS, DEFAULT_MODEL,
};
pub use surface::{build_sub_agent_tools, SurfaceMode};
