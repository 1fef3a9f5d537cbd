//! HTTP chat clients.

mod ollama;
mod openai;

pub use ollama::OllamaClient;
pub use openai::OpenAiClient;
