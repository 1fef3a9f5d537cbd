//! OpenAI-compatible `/chat/completions` client.

use crate::error::ApiError;
use crate::provider::{ChatBackend, ChatRequest, CompletionOptions};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Serialize, Deserialize)]
struct WireMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct CompletionBody {
    model: String,
    messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: WireMessage,
}

pub struct OpenAiClient {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
    default_options: CompletionOptions,
}

impl OpenAiClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: String,
        timeout: Duration,
        default_options: CompletionOptions,
    ) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::ProviderError(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            base_url: base_url.into(),
            api_key,
            client,
            default_options,
        })
    }
}

#[async_trait]
impl ChatBackend for OpenAiClient {
    fn name(&self) -> &str {
        "openai"
    }

    async fn chat(&self, request: ChatRequest) -> Result<String, ApiError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = CompletionBody {
            model: request.model,
            temperature: request
                .options
                .temperature
                .or(self.default_options.temperature),
            max_tokens: request.options.max_tokens.or(self.default_options.max_tokens),
            messages: request
                .messages
                .into_iter()
                .map(|m| WireMessage {
                    role: m.role.as_str().to_string(),
                    content: m.content,
                })
                .collect(),
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ApiError::ProviderError(format!("OpenAI request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(ApiError::ProviderError(format!(
                "OpenAI API returned {}: {}",
                status, text
            )));
        }

        let parsed: CompletionResponse = response.json().await.map_err(|e| {
            ApiError::ProviderError(format!("Invalid chat completion response: {}", e))
        })?;
        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| ApiError::ProviderError("Chat completion returned no choices".to_string()))
    }
}
