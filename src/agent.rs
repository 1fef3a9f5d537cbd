//! Agent Registry
//!
//! Static table of agent definitions loaded once from YAML. Declaration order
//! is preserved and is the iteration order used for routing tie-breaks.

pub mod config;
pub mod prompt;
pub mod registry;
pub mod validation;

pub use config::AgentConfig;
pub use prompt::{load_prompt, resolve_prompt_path};
pub use registry::{Agent, AgentRegistry, ValidationResult};
pub use validation::validate_agent_config;
