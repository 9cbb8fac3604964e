//! HTTP client for OpenAI-compatible chat gateways (OpenRouter, vLLM, etc.)

use crate::config::LlmConfig;
use crate::error::{AlmanacError, Result};
use crate::llm::ChatModel;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Chat message for completion requests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// OpenAI-compatible chat client routed through a configurable gateway.
///
/// Sends the `HTTP-Referer` and `X-Title` headers OpenRouter expects;
/// other compatible backends ignore them.
pub struct OpenRouterClient {
    http_client: reqwest::Client,
    config: LlmConfig,
}

impl OpenRouterClient {
    /// Create new client from configuration
    pub fn new(config: LlmConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(AlmanacError::Http)?;

        Ok(Self {
            http_client,
            config,
        })
    }

    /// Generate a chat completion for a list of messages
    pub async fn chat_completion(&self, messages: Vec<ChatMessage>) -> Result<String> {
        #[derive(Serialize)]
        struct ChatRequest {
            model: String,
            messages: Vec<ChatMessage>,
            temperature: f32,
            max_tokens: u32,
        }

        #[derive(Deserialize)]
        struct ChatResponse {
            choices: Vec<ChatChoice>,
        }

        #[derive(Deserialize)]
        struct ChatChoice {
            message: ChatMessage,
        }

        let request = ChatRequest {
            model: self.config.model.clone(),
            messages,
            temperature: self.config.temperature,
            max_tokens: 512,
        };

        let url = format!("{}/chat/completions", self.config.url);

        let mut req = self
            .http_client
            .post(&url)
            .header("HTTP-Referer", &self.config.referer)
            .header("X-Title", &self.config.title)
            .json(&request);

        if let Some(ref api_key) = self.config.api_key {
            req = req.header("Authorization", format!("Bearer {}", api_key));
        }

        let response = req.send().await.map_err(AlmanacError::Http)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AlmanacError::ExternalError(format!(
                "LLM service error (HTTP {}): {}",
                status, body
            )));
        }

        let chat_response: ChatResponse = response.json().await.map_err(AlmanacError::Http)?;

        let content = chat_response
            .choices
            .first()
            .ok_or_else(|| AlmanacError::Llm("No response from LLM".to_string()))?
            .message
            .content
            .clone();

        Ok(content)
    }
}

#[async_trait]
impl ChatModel for OpenRouterClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        tracing::debug!(model = %self.config.model, "chat completion request");
        self.chat_completion(vec![ChatMessage::user(prompt)]).await
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}
