//! Model Provider
//!
//! Chat-completion backends. Each agent names a model; one `ChatBackend`
//! carries every agent's single request/response exchange.

pub mod clients;
pub mod config;
pub mod types;

pub use clients::{OllamaClient, OpenAiClient};
pub use config::{ProviderConfig, ProviderType};
pub use types::{ChatBackend, ChatMessage, ChatRequest, CompletionOptions, MessageRole};
