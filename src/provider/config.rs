use crate::error::ApiError;
use crate::provider::clients::{OllamaClient, OpenAiClient};
use crate::provider::{ChatBackend, CompletionOptions};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_OLLAMA_ENDPOINT: &str = "http://localhost:11434";
pub const DEFAULT_OPENAI_ENDPOINT: &str = "https://api.openai.com/v1";

fn default_timeout_secs() -> u64 {
    300
}

/// Chat backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Provider type.
    #[serde(default)]
    pub provider_type: ProviderType,

    /// Base URL; provider default when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// API key optional and can be loaded from environment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Whole-request timeout; the only bound on a blocked pipeline.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Default completion options for every request.
    #[serde(default)]
    pub default_options: CompletionOptions,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            provider_type: ProviderType::default(),
            endpoint: None,
            api_key: None,
            timeout_secs: default_timeout_secs(),
            default_options: CompletionOptions::default(),
        }
    }
}

/// Provider type enumeration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProviderType {
    #[default]
    #[serde(rename = "ollama")]
    Ollama,
    #[serde(rename = "openai")]
    OpenAI,
}

impl ProviderConfig {
    fn endpoint_has_scheme(endpoint: &str) -> bool {
        endpoint.starts_with("http://") || endpoint.starts_with("https://")
    }

    /// Endpoint with the provider default applied and trailing slashes removed.
    pub fn resolved_endpoint(&self) -> String {
        let endpoint = match (&self.endpoint, self.provider_type) {
            (Some(endpoint), _) => endpoint.trim().to_string(),
            (None, ProviderType::Ollama) => DEFAULT_OLLAMA_ENDPOINT.to_string(),
            (None, ProviderType::OpenAI) => DEFAULT_OPENAI_ENDPOINT.to_string(),
        };
        endpoint.trim_end_matches('/').to_string()
    }

    /// Validate provider configuration.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(endpoint) = &self.endpoint {
            let endpoint = endpoint.trim();
            if !Self::endpoint_has_scheme(endpoint) || endpoint.chars().any(char::is_whitespace) {
                return Err(format!("Invalid endpoint URL: {}", endpoint));
            }
        }

        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than zero".to_string());
        }

        if let Some(temp) = self.default_options.temperature {
            if !(0.0..=2.0).contains(&temp) {
                return Err(format!(
                    "Temperature must be between 0.0 and 2.0, got {}",
                    temp
                ));
            }
        }

        Ok(())
    }

    /// Build the chat backend described by this configuration.
    pub fn build_client(&self) -> Result<Arc<dyn ChatBackend>, ApiError> {
        self.validate().map_err(ApiError::ConfigError)?;
        let timeout = Duration::from_secs(self.timeout_secs);
        let endpoint = self.resolved_endpoint();

        match self.provider_type {
            ProviderType::Ollama => Ok(Arc::new(OllamaClient::new(
                endpoint,
                timeout,
                self.default_options.clone(),
            )?)),
            ProviderType::OpenAI => {
                let api_key = self
                    .api_key
                    .clone()
                    .or_else(|| std::env::var("OPENAI_API_KEY").ok())
                    .ok_or_else(|| {
                        ApiError::ProviderNotConfigured(
                            "OpenAI API key required (set in config or OPENAI_API_KEY env var)"
                                .to_string(),
                        )
                    })?;
                Ok(Arc::new(OpenAiClient::new(
                    endpoint,
                    api_key,
                    timeout,
                    self.default_options.clone(),
                )?))
            }
        }
    }
}
