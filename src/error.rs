//! Error types shared across routing, providers, search and workflows.
//!
//! `ApiError` carries hard failures only. Reportable conditions that the caller
//! is expected to render (a missing tool, a missing workflow skill) travel as
//! [`crate::orchestrator::Reply::Failure`] instead.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Agent not found: {0}")]
    AgentNotFound(String),

    #[error("Failed to parse skill '{name}': {reason}")]
    SkillParse { name: String, reason: String },

    #[error("Provider not configured: {0}")]
    ProviderNotConfigured(String),

    #[error("Provider error: {0}")]
    ProviderError(String),

    #[error("Search error: {0}")]
    SearchError(String),

    #[error("Workflow '{workflow}' failed during {stage}: {reason}")]
    WorkflowError {
        workflow: String,
        stage: String,
        reason: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    pub fn workflow(workflow: &str, stage: &str, reason: impl Into<String>) -> Self {
        ApiError::WorkflowError {
            workflow: workflow.to_string(),
            stage: stage.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::ProviderError(err.to_string())
    }
}
