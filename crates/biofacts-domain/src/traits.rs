//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and infrastructure.
//! Infrastructure implementations live in other crates.

use crate::training::ChatMessage;
use std::future::Future;

/// A single chat-completion request
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// Conversation sent to the model
    pub messages: Vec<ChatMessage>,

    /// Sampling temperature
    pub temperature: f32,

    /// Output token ceiling
    pub max_tokens: u32,
}

impl CompletionRequest {
    /// Build a system + user request
    pub fn new(
        system: impl Into<String>,
        user: impl Into<String>,
        temperature: f32,
        max_tokens: u32,
    ) -> Self {
        Self {
            messages: vec![ChatMessage::system(system), ChatMessage::user(user)],
            temperature,
            max_tokens,
        }
    }

    /// Content of the last user message, empty if there is none
    pub fn user_content(&self) -> &str {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == crate::training::ChatRole::User)
            .map(|m| m.content.as_str())
            .unwrap_or("")
    }
}

/// Trait for hosted text-generation providers
///
/// Implemented by the infrastructure layer (biofacts-llm)
pub trait LlmProvider {
    /// Error type for LLM operations
    type Error;

    /// Send a request and return the generated text
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl Future<Output = Result<String, Self::Error>> + Send;

    /// Label recorded as the `extraction_source` of produced facts
    fn source_label(&self) -> String;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_messages() {
        let request = CompletionRequest::new("be terse", "extract", 0.3, 4000);
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.user_content(), "extract");
        assert_eq!(request.max_tokens, 4000);
    }
}
