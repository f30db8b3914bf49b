//! Biofacts LLM Provider Layer
//!
//! Implementations of the `LlmProvider` trait from `biofacts-domain`.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic mock for testing
//! - `OpenAiProvider`: Hosted chat-completions API
//!
//! # Examples
//!
//! ```
//! use biofacts_domain::{CompletionRequest, LlmProvider};
//! use biofacts_llm::MockProvider;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let provider = MockProvider::new("Hello from LLM!");
//! let request = CompletionRequest::new("system", "test prompt", 0.3, 100);
//! let result = provider.complete(&request).await.unwrap();
//! assert_eq!(result, "Hello from LLM!");
//! # }
//! ```

#![warn(missing_docs)]

pub mod openai;

use biofacts_domain::{CompletionRequest, LlmProvider as LlmProviderTrait};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;

pub use openai::OpenAiProvider;

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Credentials rejected by the provider
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Invalid response from LLM
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

impl LlmError {
    /// Whether another attempt could plausibly succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, LlmError::Communication(_) | LlmError::RateLimitExceeded)
    }
}

#[derive(Debug, Clone)]
enum MockReply {
    Text(String),
    Error,
}

/// Mock LLM provider for deterministic testing
///
/// Returns pre-configured responses without making any network calls.
/// Scripted replies are keyed by a substring of the last user message and
/// checked in the order they were added; the first match wins.
///
/// # Examples
///
/// ```
/// use biofacts_domain::{CompletionRequest, LlmProvider};
/// use biofacts_llm::MockProvider;
///
/// # #[tokio::main]
/// # async fn main() {
/// let mut provider = MockProvider::new("[]");
/// provider.add_response("category: education", r#"[{"fact": "PhD"}]"#);
///
/// let request = CompletionRequest::new("sys", "for the category: education", 0.3, 100);
/// assert_eq!(provider.complete(&request).await.unwrap(), r#"[{"fact": "PhD"}]"#);
///
/// let request = CompletionRequest::new("sys", "something else", 0.3, 100);
/// assert_eq!(provider.complete(&request).await.unwrap(), "[]");
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    replies: Arc<Mutex<Vec<(String, MockReply)>>>,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            replies: Arc::new(Mutex::new(Vec::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Reply with `response` when the user message contains `needle`
    pub fn add_response(&mut self, needle: impl Into<String>, response: impl Into<String>) {
        lock(&self.replies).push((needle.into(), MockReply::Text(response.into())));
    }

    /// Fail with a communication error when the user message contains `needle`
    pub fn add_error(&mut self, needle: impl Into<String>) {
        lock(&self.replies).push((needle.into(), MockReply::Error));
    }

    /// Get the number of times complete was called
    pub fn call_count(&self) -> usize {
        lock(&self.requests).len()
    }

    /// Every request received so far, oldest first
    pub fn requests(&self) -> Vec<CompletionRequest> {
        lock(&self.requests).clone()
    }

    /// Forget recorded requests
    pub fn reset_call_count(&self) {
        lock(&self.requests).clear();
    }

    fn reply_for(&self, user_content: &str) -> MockReply {
        lock(&self.replies)
            .iter()
            .find(|(needle, _)| user_content.contains(needle.as_str()))
            .map(|(_, reply)| reply.clone())
            .unwrap_or_else(|| MockReply::Text(self.default_response.clone()))
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("[]")
    }
}

impl LlmProviderTrait for MockProvider {
    type Error = LlmError;

    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        lock(&self.requests).push(request.clone());

        match self.reply_for(request.user_content()) {
            MockReply::Text(text) => Ok(text),
            MockReply::Error => Err(LlmError::Communication("Mock network error".to_string())),
        }
    }

    fn source_label(&self) -> String {
        "mock".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(user: &str) -> CompletionRequest {
        CompletionRequest::new("system", user, 0.3, 100)
    }

    #[tokio::test]
    async fn test_mock_provider_default() {
        let provider = MockProvider::new("Test response");
        let result = provider.complete(&request("any prompt")).await;
        assert_eq!(result.unwrap(), "Test response");
    }

    #[tokio::test]
    async fn test_mock_provider_specific_responses() {
        let mut provider = MockProvider::default();
        provider.add_response("hello", "world");
        provider.add_response("foo", "bar");

        assert_eq!(provider.complete(&request("say hello")).await.unwrap(), "world");
        assert_eq!(provider.complete(&request("foo!")).await.unwrap(), "bar");
        assert_eq!(provider.complete(&request("unknown")).await.unwrap(), "[]");
    }

    #[tokio::test]
    async fn test_mock_provider_first_match_wins() {
        let mut provider = MockProvider::default();
        provider.add_response("education", "first");
        provider.add_response("edu", "second");

        assert_eq!(provider.complete(&request("education")).await.unwrap(), "first");
    }

    #[tokio::test]
    async fn test_mock_provider_records_requests() {
        let provider = MockProvider::new("test");

        assert_eq!(provider.call_count(), 0);
        provider.complete(&request("prompt1")).await.unwrap();
        provider.complete(&request("prompt2")).await.unwrap();
        assert_eq!(provider.call_count(), 2);
        assert_eq!(provider.requests()[1].user_content(), "prompt2");

        provider.reset_call_count();
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_mock_provider_error() {
        let mut provider = MockProvider::default();
        provider.add_error("bad prompt");

        let result = provider.complete(&request("a bad prompt")).await;
        assert!(matches!(result, Err(LlmError::Communication(_))));
        // Failed calls are still counted
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn test_mock_provider_clone_shares_state() {
        let provider1 = MockProvider::new("test");
        let provider2 = provider1.clone();

        provider1.complete(&request("test")).await.unwrap();

        assert_eq!(provider1.call_count(), 1);
        assert_eq!(provider2.call_count(), 1);
    }

    #[test]
    fn test_transient_errors() {
        assert!(LlmError::Communication("x".into()).is_transient());
        assert!(LlmError::RateLimitExceeded.is_transient());
        assert!(!LlmError::Authentication("x".into()).is_transient());
        assert!(!LlmError::InvalidResponse("x".into()).is_transient());
    }
}
