//! Model provider protocol: the language-model invocation collaborator.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::ProviderError;
use crate::tool::ToolDefinition;
use crate::types::{Message, Metadata, StopReason, Usage};

/// Request for a completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// Model selector to use.
    pub model: String,

    /// Messages in the conversation.
    pub messages: Vec<Message>,

    /// Tools offered for this turn. Empty means no tools.
    #[serde(default)]
    pub tools: Vec<ToolDefinition>,

    /// Maximum tokens to generate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Temperature for sampling.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Additional metadata.
    #[serde(default)]
    pub metadata: Metadata,
}

impl CompletionRequest {
    /// Create a new completion request.
    pub fn new(model: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            model: model.into(),
            messages,
            tools: Vec::new(),
            max_tokens: None,
            temperature: None,
            metadata: HashMap::new(),
        }
    }

    /// Set the tools offered for this turn.
    pub fn with_tools(mut self, tools: Vec<ToolDefinition>) -> Self {
        self.tools = tools;
        self
    }

    /// Set max tokens.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

/// Response from a completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    /// Model that produced the response.
    pub model: String,

    /// The assistant's response message, including any requested tool calls.
    pub message: Message,

    /// Reason for stopping.
    pub stop_reason: StopReason,

    /// Token usage.
    #[serde(default)]
    pub usage: Usage,
}

/// Core trait for language-model invocation clients.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Returns the provider ID.
    fn id(&self) -> &str;

    /// Generate a completion (non-streaming).
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completion_request_new() {
        let request = CompletionRequest::new("openai/gpt-4o-mini", vec![Message::user("hi")]);
        assert_eq!(request.model, "openai/gpt-4o-mini");
        assert_eq!(request.messages.len(), 1);
        assert!(request.tools.is_empty());
        assert!(request.max_tokens.is_none());
    }

    #[test]
    fn test_completion_request_with_tools() {
        let request = CompletionRequest::new("m", vec![])
            .with_tools(vec![ToolDefinition::new("lookup", "Look something up")]);
        assert_eq!(request.tools.len(), 1);
        assert_eq!(request.tools[0].id, "lookup");
    }

    #[test]
    fn test_completion_request_with_max_tokens() {
        let request = CompletionRequest::new("m", vec![]).with_max_tokens(512);
        assert_eq!(request.max_tokens, Some(512));
    }

    #[test]
    fn test_completion_response_roundtrip() {
        let response = CompletionResponse {
            model: "m".to_string(),
            message: Message::assistant("hello"),
            stop_reason: StopReason::EndTurn,
            usage: Usage::default(),
        };
        let json = serde_json::to_string(&response).unwrap();
        let back: CompletionResponse = serde_json::from_str(&json).unwrap();
        assert_eq!(back.message.content, "hello");
        assert_eq!(back.stop_reason, StopReason::EndTurn);
    }
}
