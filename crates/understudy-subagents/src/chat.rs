//! The single-turn chat protocol.

use tracing::debug;

use understudy_protocols::provider::CompletionRequest;
use understudy_protocols::types::Message;

use crate::error::DelegationError;
use crate::run_loop::SubAgentRunner;
use crate::sub_agent::SubAgent;

impl SubAgentRunner {
    /// Ask the sub-agent a question over its accumulated history.
    ///
    /// Exactly two messages are appended (the question and the answer); no
    /// tools are offered and the step budget is untouched. The entity is
    /// persisted before the answer text is returned.
    pub async fn chat(
        &self,
        agent: &mut SubAgent,
        question: &str,
    ) -> Result<String, DelegationError> {
        debug!("Chat turn with sub-agent {}", agent.id);
        agent.messages.push(Message::user(question));

        let request = CompletionRequest::new(agent.model.clone(), agent.messages.clone());
        let response = self.provider.complete(request).await?;

        agent.messages.push(response.message.clone());
        self.registry.persist(agent).await?;

        Ok(response.message.content)
    }
}
