//! Ollama `/api/chat` client.

use crate::error::ApiError;
use crate::provider::{ChatBackend, ChatRequest, CompletionOptions};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct OllamaChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct OllamaChatRequest {
    model: String,
    messages: Vec<OllamaChatMessage>,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<OllamaChatOptions>,
}

#[derive(Debug, Serialize)]
struct OllamaChatOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct OllamaChatResponse {
    message: OllamaChatMessage,
}

pub struct OllamaClient {
    base_url: String,
    client: reqwest::Client,
    default_options: CompletionOptions,
}

impl OllamaClient {
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        default_options: CompletionOptions,
    ) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::ProviderError(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            base_url: base_url.into(),
            client,
            default_options,
        })
    }

    fn build_body(&self, request: ChatRequest) -> OllamaChatRequest {
        let temperature = request
            .options
            .temperature
            .or(self.default_options.temperature);
        let num_predict = request.options.max_tokens.or(self.default_options.max_tokens);
        let options = if temperature.is_some() || num_predict.is_some() {
            Some(OllamaChatOptions {
                temperature,
                num_predict,
            })
        } else {
            None
        };

        OllamaChatRequest {
            model: request.model,
            messages: request
                .messages
                .into_iter()
                .map(|m| OllamaChatMessage {
                    role: m.role.as_str().to_string(),
                    content: m.content,
                })
                .collect(),
            stream: false,
            options,
        }
    }
}

#[async_trait]
impl ChatBackend for OllamaClient {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn chat(&self, request: ChatRequest) -> Result<String, ApiError> {
        let url = format!("{}/api/chat", self.base_url);
        let body = self.build_body(request);

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| ApiError::ProviderError(format!("Ollama request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::ProviderError(format!(
                "Ollama API returned {}: {}",
                status, body
            )));
        }

        let parsed: OllamaChatResponse = response.json().await.map_err(|e| {
            ApiError::ProviderError(format!("Invalid Ollama chat response: {}", e))
        })?;
        Ok(parsed.message.content)
    }
}
