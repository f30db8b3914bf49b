//! OpenAI-compatible chat-completions provider
//!
//! Talks to any endpoint that implements `POST /chat/completions` with the
//! OpenAI request and response shapes.
//!
//! # Features
//!
//! - Async HTTP communication with bearer authentication
//! - Configurable endpoint, model and request timeout
//! - Optional retries with exponential backoff (off by default)
//!
//! # Examples
//!
//! ```no_run
//! use biofacts_llm::OpenAiProvider;
//!
//! let provider = OpenAiProvider::new("sk-...", "gpt-4o-mini")
//!     .expect("client builds")
//!     .with_endpoint("https://api.openai.com/v1");
//! ```

use crate::LlmError;
use biofacts_domain::{ChatMessage, CompletionRequest, LlmProvider as LlmProviderTrait};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Default API base URL
pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1";

/// Default model
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Default timeout for a single request (seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Default number of attempts per request (a single attempt, no retry)
pub const DEFAULT_MAX_ATTEMPTS: u32 = 1;

/// Hosted chat-completions provider
#[derive(Clone)]
pub struct OpenAiProvider {
    endpoint: String,
    model: String,
    api_key: String,
    client: reqwest::Client,
    max_attempts: u32,
}

impl std::fmt::Debug for OpenAiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiProvider")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("api_key", &"<redacted>")
            .field("max_attempts", &self.max_attempts)
            .finish_non_exhaustive()
    }
}

/// Request body for the chat-completions API
#[derive(Debug, Serialize)]
struct ChatCompletionBody<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
}

/// Response from the chat-completions API
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiProvider {
    /// Create a provider against the default endpoint
    ///
    /// # Errors
    ///
    /// Returns `LlmError::Other` if the HTTP client cannot be constructed.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self, LlmError> {
        Self::with_timeout(api_key, model, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a provider with a specific request timeout
    pub fn with_timeout(
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LlmError::Other(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: model.into(),
            api_key: api_key.into(),
            client,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        })
    }

    /// Point the provider at a different API base URL
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the number of attempts for transient failures (minimum 1)
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Model identifier sent with each request
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send one request, retrying transient failures up to `max_attempts`
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The endpoint is unreachable or times out
    /// - The API key is rejected
    /// - The model does not exist
    /// - The response body is not a chat completion
    pub async fn generate(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        let url = format!("{}/chat/completions", self.endpoint);
        let body = ChatCompletionBody {
            model: &self.model,
            messages: &request.messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        let mut attempts = 0;
        loop {
            attempts += 1;
            match self.send_once(&url, &body).await {
                Ok(content) => return Ok(content),
                Err(e) if e.is_transient() && attempts < self.max_attempts => {
                    // Exponential backoff: 1s, 2s, 4s, etc.
                    let delay = Duration::from_secs(2u64.pow(attempts - 1));
                    warn!("Attempt {} failed ({}), retrying in {:?}", attempts, e, delay);
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn send_once(&self, url: &str, body: &ChatCompletionBody<'_>) -> Result<String, LlmError> {
        debug!("POST {} (model {})", url, self.model);

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| LlmError::Communication(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(classify_status(status, &self.model, error_text));
        }

        let completion = response
            .json::<ChatCompletionResponse>()
            .await
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        first_choice_content(completion)
    }
}

/// Map a non-success HTTP status to an error
fn classify_status(status: reqwest::StatusCode, model: &str, body: String) -> LlmError {
    match status {
        reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN => {
            LlmError::Authentication(format!("HTTP {}: {}", status, body))
        }
        reqwest::StatusCode::NOT_FOUND => LlmError::ModelNotAvailable(model.to_string()),
        reqwest::StatusCode::TOO_MANY_REQUESTS => LlmError::RateLimitExceeded,
        _ => LlmError::Communication(format!("HTTP {}: {}", status, body)),
    }
}

fn first_choice_content(completion: ChatCompletionResponse) -> Result<String, LlmError> {
    completion
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| LlmError::InvalidResponse("Response contained no message content".to_string()))
}

impl LlmProviderTrait for OpenAiProvider {
    type Error = LlmError;

    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        self.generate(request).await
    }

    fn source_label(&self) -> String {
        format!("openai:{}", self.model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_openai_provider_creation() {
        let provider = OpenAiProvider::new("key", "gpt-4o-mini").unwrap();
        assert_eq!(provider.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(provider.model(), "gpt-4o-mini");
        assert_eq!(provider.max_attempts, DEFAULT_MAX_ATTEMPTS);
        assert_eq!(provider.source_label(), "openai:gpt-4o-mini");
    }

    #[test]
    fn test_with_endpoint_trims_trailing_slash() {
        let provider = OpenAiProvider::new("key", "m")
            .unwrap()
            .with_endpoint("http://localhost:8000/v1/");
        assert_eq!(provider.endpoint, "http://localhost:8000/v1");
    }

    #[test]
    fn test_with_max_attempts_floor() {
        let provider = OpenAiProvider::new("key", "m").unwrap().with_max_attempts(0);
        assert_eq!(provider.max_attempts, 1);

        let provider = OpenAiProvider::new("key", "m").unwrap().with_max_attempts(4);
        assert_eq!(provider.max_attempts, 4);
    }

    #[test]
    fn test_request_body_shape() {
        let request = CompletionRequest::new("sys", "user text", 0.3, 4000);
        let body = ChatCompletionBody {
            model: "gpt-4o-mini",
            messages: &request.messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "gpt-4o-mini");
        assert_eq!(json["max_tokens"], 4000);
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "user text");
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let provider = OpenAiProvider::new("sk-secret-value", "gpt-4o-mini").unwrap();
        let debug = format!("{:?}", provider);
        assert!(!debug.contains("sk-secret-value"));
        assert!(debug.contains("<redacted>"));
        assert!(debug.contains("gpt-4o-mini"));
    }

    #[test]
    fn test_first_choice_content() {
        let completion: ChatCompletionResponse = serde_json::from_str(
            r#"{"id":"x","choices":[{"index":0,"message":{"role":"assistant","content":"[]"}}]}"#,
        )
        .unwrap();
        assert_eq!(first_choice_content(completion).unwrap(), "[]");

        let empty: ChatCompletionResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(matches!(first_choice_content(empty), Err(LlmError::InvalidResponse(_))));

        let null_content: ChatCompletionResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":null}}]}"#).unwrap();
        assert!(matches!(
            first_choice_content(null_content),
            Err(LlmError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_classify_status() {
        assert!(matches!(
            classify_status(StatusCode::UNAUTHORIZED, "m", String::new()),
            LlmError::Authentication(_)
        ));
        assert!(matches!(
            classify_status(StatusCode::NOT_FOUND, "m", String::new()),
            LlmError::ModelNotAvailable(ref name) if name == "m"
        ));
        assert!(matches!(
            classify_status(StatusCode::TOO_MANY_REQUESTS, "m", String::new()),
            LlmError::RateLimitExceeded
        ));
        assert!(matches!(
            classify_status(StatusCode::BAD_GATEWAY, "m", "down".to_string()),
            LlmError::Communication(ref msg) if msg.contains("down")
        ));
    }

    #[tokio::test]
    async fn test_openai_error_handling() {
        // Use an invalid endpoint to trigger a transport error
        let provider = OpenAiProvider::new("key", "gpt-4o-mini")
            .unwrap()
            .with_endpoint("http://localhost:99999");

        let request = CompletionRequest::new("sys", "test", 0.3, 10);
        let result = provider.generate(&request).await;

        match result {
            Err(LlmError::Communication(_)) => {} // Expected
            other => panic!("Expected Communication error, got {:?}", other),
        }
    }

    // Integration test (requires OPENAI_API_KEY and network access)
    #[tokio::test]
    #[ignore]
    async fn test_openai_generate_integration() {
        let Ok(key) = std::env::var("OPENAI_API_KEY") else {
            return;
        };
        let provider = OpenAiProvider::new(key, DEFAULT_MODEL).unwrap();
        let request = CompletionRequest::new("Be brief.", "Say 'hello' and nothing else", 0.0, 10);
        let response = provider.generate(&request).await.unwrap();
        assert!(!response.is_empty());
    }
}
