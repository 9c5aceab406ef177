//! OpenAI chat-completions client
//!
//! Implements [`LlmClient`] against `POST {base_url}/chat/completions`. Any
//! OpenAI-compatible server works by pointing `base_url` at it.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde_json::{Value, json};

use crate::llm::client::{LlmClient, LlmError};
use crate::llm::types::{CompletionRequest, CompletionResponse, StopReason, Usage};

/// Default API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default model to use
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Environment variable holding the API key
pub const DEFAULT_API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Configuration for the OpenAI client
#[derive(Debug, Clone, PartialEq)]
pub struct OpenAiConfig {
    pub model: String,
    pub base_url: String,
    pub api_key_env: String,
    pub temperature: f32,
    pub timeout: Duration,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            temperature: 0.0,
            timeout: Duration::from_secs(60),
        }
    }
}

impl OpenAiConfig {
    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

/// OpenAI API client
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    config: OpenAiConfig,
    usage: Arc<Mutex<Usage>>,
}

impl OpenAiClient {
    /// Create a new client, reading the key from `config.api_key_env`
    pub fn new(config: OpenAiConfig) -> Result<Self, LlmError> {
        let api_key = std::env::var(&config.api_key_env).map_err(|_| LlmError::MissingApiKey {
            env_var: config.api_key_env.clone(),
        })?;

        Self::with_api_key(api_key, config)
    }

    /// Create a client with an explicit API key
    pub fn with_api_key(api_key: String, config: OpenAiConfig) -> Result<Self, LlmError> {
        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            api_key,
            config,
            usage: Arc::new(Mutex::new(Usage::default())),
        })
    }

    /// Build the request body for the chat-completions endpoint
    fn build_request(&self, request: &CompletionRequest) -> Value {
        let mut body = json!({
            "model": self.config.model,
            "messages": request.messages,
            "temperature": self.config.temperature
        });

        if let Some(max_tokens) = request.max_tokens {
            body["max_tokens"] = json!(max_tokens);
        }

        body
    }

    /// Parse the API response into a CompletionResponse
    fn parse_response(&self, body: Value) -> Result<CompletionResponse, LlmError> {
        let choice = body["choices"]
            .get(0)
            .ok_or_else(|| LlmError::InvalidResponse("response has no choices".to_string()))?;

        let content = choice["message"]["content"]
            .as_str()
            .ok_or_else(|| LlmError::InvalidResponse("choice has no message content".to_string()))?
            .trim()
            .to_string();

        let stop_reason = choice["finish_reason"]
            .as_str()
            .map(StopReason::from_finish_reason)
            .unwrap_or_default();

        let usage = match body.get("usage") {
            Some(u) => Usage::new(
                u["prompt_tokens"].as_u64().unwrap_or(0),
                u["completion_tokens"].as_u64().unwrap_or(0),
            ),
            None => Usage::default(),
        };

        // Track cumulative usage
        self.usage.lock().unwrap_or_else(|e| e.into_inner()).add(&usage);

        Ok(CompletionResponse {
            content,
            stop_reason,
            usage,
        })
    }

    /// Send a request to the API
    async fn send_request(&self, body: Value) -> Result<Value, LlmError> {
        let url = self.config.completions_url();
        debug!("POST {} model={}", url, body["model"]);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();

        // Handle rate limiting
        if status.as_u16() == 429 {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|h| h.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(60);
            return Err(LlmError::RateLimited {
                retry_after: Duration::from_secs(retry_after),
            });
        }

        // Handle other errors
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(LlmError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))
    }

    /// Get cumulative token usage
    pub fn total_usage(&self) -> Usage {
        *self.usage.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl LlmClient for OpenAiClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let body = self.build_request(&request);
        let response = self.send_request(body).await?;
        self.parse_response(response)
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    fn is_ready(&self) -> bool {
        !self.api_key.is_empty()
    }
}

impl std::fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("model", &self.config.model)
            .field("base_url", &self.config.base_url)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::types::Message;

    fn client() -> OpenAiClient {
        OpenAiClient::with_api_key("test-key".to_string(), OpenAiConfig::default()).unwrap()
    }

    #[test]
    fn test_config_default() {
        let config = OpenAiConfig::default();
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.api_key_env, "OPENAI_API_KEY");
        assert_eq!(config.temperature, 0.0);
        assert_eq!(config.timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_completions_url_tolerates_trailing_slash() {
        let config = OpenAiConfig {
            base_url: "http://localhost:1234/v1/".to_string(),
            ..Default::default()
        };
        assert_eq!(config.completions_url(), "http://localhost:1234/v1/chat/completions");
    }

    #[test]
    fn test_client_without_api_key() {
        let config = OpenAiConfig {
            api_key_env: "REASONER_TEST_KEY_THAT_IS_NEVER_SET".to_string(),
            ..Default::default()
        };
        let err = OpenAiClient::new(config).unwrap_err();
        assert!(matches!(err, LlmError::MissingApiKey { .. }));
    }

    #[test]
    fn test_client_with_api_key() {
        let client = client();
        assert!(client.is_ready());
        assert_eq!(client.model(), DEFAULT_MODEL);
    }

    #[test]
    fn test_build_request_basic() {
        let body = client().build_request(&CompletionRequest::prompt("Hello"));

        assert_eq!(body["model"], DEFAULT_MODEL);
        assert_eq!(body["temperature"], 0.0);
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "Hello");
        assert!(body.get("max_tokens").is_none());
    }

    #[test]
    fn test_build_request_uses_config() {
        let config = OpenAiConfig {
            model: "gpt-4o".to_string(),
            temperature: 0.5,
            ..Default::default()
        };
        let client = OpenAiClient::with_api_key("test-key".to_string(), config).unwrap();

        let body = client.build_request(&CompletionRequest::prompt("Hello").with_max_tokens(100));

        assert_eq!(body["model"], "gpt-4o");
        assert_eq!(body["temperature"], 0.5);
        assert_eq!(body["max_tokens"], 100);
    }

    #[test]
    fn test_build_request_keeps_message_order() {
        let request = CompletionRequest::prompt("Hi").with_message(Message::user("Again"));

        let body = client().build_request(&request);
        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1]["role"], "user");
        assert_eq!(messages[1]["content"], "Again");
    }

    #[test]
    fn test_parse_response_trims_content() {
        let response = client()
            .parse_response(json!({
                "choices": [{
                    "message": { "role": "assistant", "content": "  Answer: 5 \n" },
                    "finish_reason": "stop"
                }],
                "usage": { "prompt_tokens": 12, "completion_tokens": 3 }
            }))
            .unwrap();

        assert_eq!(response.content, "Answer: 5");
        assert_eq!(response.stop_reason, StopReason::Stop);
        assert_eq!(response.usage, Usage::new(12, 3));
    }

    #[test]
    fn test_parse_response_length_finish() {
        let response = client()
            .parse_response(json!({
                "choices": [{ "message": { "content": "Reasoning: ..." }, "finish_reason": "length" }]
            }))
            .unwrap();
        assert!(response.stop_reason.is_truncated());
        assert_eq!(response.usage.total(), 0);
    }

    #[test]
    fn test_parse_response_without_choices() {
        let err = client().parse_response(json!({ "choices": [] })).unwrap_err();
        assert!(matches!(err, LlmError::InvalidResponse(_)));
    }

    #[test]
    fn test_parse_response_null_content() {
        let err = client()
            .parse_response(json!({ "choices": [{ "message": { "content": null } }] }))
            .unwrap_err();
        assert!(err.to_string().contains("no message content"));
    }

    #[test]
    fn test_total_usage_accumulation() {
        let client = client();
        for (input, output) in [(100, 50), (200, 100)] {
            client
                .parse_response(json!({
                    "choices": [{ "message": { "content": "ok" } }],
                    "usage": { "prompt_tokens": input, "completion_tokens": output }
                }))
                .unwrap();
        }

        assert_eq!(client.total_usage(), Usage::new(300, 150));
    }

    #[test]
    fn test_debug_impl_hides_key() {
        let debug_str = format!("{:?}", client());
        assert!(debug_str.contains("OpenAiClient"));
        assert!(debug_str.contains(DEFAULT_MODEL));
        assert!(!debug_str.contains("test-key"));
    }

    #[test]
    fn test_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<OpenAiClient>();
    }

    #[test]
    fn test_empty_api_key_not_ready() {
        let client = OpenAiClient::with_api_key(String::new(), OpenAiConfig::default()).unwrap();
        assert!(!client.is_ready());
    }
}
