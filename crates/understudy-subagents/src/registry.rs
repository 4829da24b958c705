//! The sub-agent registry: canonical entity state in the session store.

use std::sync::Arc;

use tracing::debug;

use understudy_runtime::SessionStore;

use crate::error::DelegationError;
use crate::sub_agent::SubAgent;

/// Fixed session-store key under which the registry lives.
pub const SUB_AGENTS_KEY: &str = "sub_agents";

/// Mapping id -> sub-agent, held in the session store as an ordered JSON
/// array (array order is registration order, which is what makes "the
/// default agent" - the first registered - well-defined).
///
/// Every persist writes the full collection back; an entity a caller holds
/// in memory is a working copy until persisted. The read-modify-write is
/// not synchronized across concurrent invocations, which matches the
/// single-caller-at-a-time discipline this layer assumes.
#[derive(Clone)]
pub struct SubAgentRegistry {
    store: Arc<dyn SessionStore>,
}

impl SubAgentRegistry {
    /// Create a registry over the given session store.
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// Replace the whole registry with the given collection, in order.
    pub async fn init(&self, agents: &[SubAgent]) -> Result<(), DelegationError> {
        debug!("Writing {} sub-agents to the registry", agents.len());
        let value = serde_json::to_value(agents)?;
        self.store.set(SUB_AGENTS_KEY, value).await?;
        Ok(())
    }

    /// Load the whole registry, empty if never initialized.
    pub async fn list(&self) -> Result<Vec<SubAgent>, DelegationError> {
        let value = self
            .store
            .get_or(SUB_AGENTS_KEY, serde_json::Value::Array(Vec::new()))
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Resolve a sub-agent by id, or the first-registered one when no id is
    /// given. Unknown ids and an empty registry are explicit errors, never
    /// a silently different agent.
    pub async fn resolve(&self, id: Option<&str>) -> Result<SubAgent, DelegationError> {
        let agents = self.list().await?;
        match id {
            None => agents
                .into_iter()
                .next()
                .ok_or(DelegationError::NoAgentsRegistered),
            Some(id) => agents
                .into_iter()
                .find(|a| a.id == id)
                .ok_or_else(|| DelegationError::AgentNotFound(id.to_string())),
        }
    }

    /// Write a sub-agent's state back: read the full collection, replace
    /// (or append) the entry with this id, write the full collection back.
    pub async fn persist(&self, agent: &SubAgent) -> Result<(), DelegationError> {
        let mut agents = self.list().await?;
        match agents.iter_mut().find(|a| a.id == agent.id) {
            Some(slot) => *slot = agent.clone(),
            None => agents.push(agent.clone()),
        }
        self.init(&agents).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use understudy_protocols::types::Message;
    use understudy_runtime::MemorySessionStore;

    use crate::sub_agent::{IdAllocator, SubAgentConfig};

    fn registry() -> SubAgentRegistry {
        SubAgentRegistry::new(Arc::new(MemorySessionStore::new()))
    }

    fn agent(id: &str, description: &str) -> SubAgent {
        SubAgentConfig::new()
            .with_id(id)
            .with_public_description(description)
            .build_with(&IdAllocator::new())
    }

    #[tokio::test]
    async fn test_list_empty() {
        let registry = registry();
        assert!(registry.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_init_and_list_preserves_order() {
        let registry = registry();
        registry
            .init(&[agent("b", "second"), agent("a", "first")])
            .await
            .unwrap();

        let agents = registry.list().await.unwrap();
        assert_eq!(agents.len(), 2);
        assert_eq!(agents[0].id, "b");
        assert_eq!(agents[1].id, "a");
    }

    #[tokio::test]
    async fn test_resolve_default_is_first_registered() {
        let registry = registry();
        registry
            .init(&[agent("zz", "first in, wins"), agent("aa", "second")])
            .await
            .unwrap();

        let resolved = registry.resolve(None).await.unwrap();
        assert_eq!(resolved.id, "zz");
    }

    #[tokio::test]
    async fn test_resolve_by_id() {
        let registry = registry();
        registry
            .init(&[agent("one", ""), agent("two", "")])
            .await
            .unwrap();

        let resolved = registry.resolve(Some("two")).await.unwrap();
        assert_eq!(resolved.id, "two");
    }

    #[tokio::test]
    async fn test_resolve_unknown_id_is_error() {
        let registry = registry();
        registry.init(&[agent("one", "")]).await.unwrap();

        let result = registry.resolve(Some("missing")).await;
        assert!(matches!(
            result,
            Err(DelegationError::AgentNotFound(id)) if id == "missing"
        ));
    }

    #[tokio::test]
    async fn test_resolve_default_on_empty_registry() {
        let registry = registry();
        let result = registry.resolve(None).await;
        assert!(matches!(result, Err(DelegationError::NoAgentsRegistered)));
    }

    #[tokio::test]
    async fn test_persist_replaces_existing_entry() {
        let registry = registry();
        registry
            .init(&[agent("one", ""), agent("two", "")])
            .await
            .unwrap();

        let mut copy = registry.resolve(Some("one")).await.unwrap();
        copy.messages.push(Message::user("hello"));
        registry.persist(&copy).await.unwrap();

        let reloaded = registry.resolve(Some("one")).await.unwrap();
        assert_eq!(reloaded.messages.len(), 2);
        // Order and the other entry are untouched.
        let agents = registry.list().await.unwrap();
        assert_eq!(agents[0].id, "one");
        assert_eq!(agents[1].id, "two");
        assert_eq!(agents[1].messages.len(), 1);
    }

    #[tokio::test]
    async fn test_persist_appends_unknown_entry() {
        let registry = registry();
        registry.init(&[agent("one", "")]).await.unwrap();

        registry.persist(&agent("late", "")).await.unwrap();

        let agents = registry.list().await.unwrap();
        assert_eq!(agents.len(), 2);
        assert_eq!(agents[1].id, "late");
    }

    #[tokio::test]
    async fn test_unpersisted_copy_is_invisible() {
        let registry = registry();
        registry.init(&[agent("one", "")]).await.unwrap();

        let mut copy = registry.resolve(Some("one")).await.unwrap();
        copy.messages.push(Message::user("never persisted"));

        let reloaded = registry.resolve(Some("one")).await.unwrap();
        assert_eq!(reloaded.messages.len(), 1);
    }
}
