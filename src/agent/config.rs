//! Agent configuration shape as written in the agents file.

use serde::{Deserialize, Serialize};

/// One entry under the `agents:` mapping.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Case-insensitive substrings that route a query to this agent
    #[serde(default)]
    pub triggers: Vec<String>,

    /// Skills loaded into the system prompt when no explicit list is given
    #[serde(default)]
    pub skills: Vec<String>,

    /// Backend model identifier
    #[serde(default)]
    pub model: String,

    /// Inline system prompt template
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,

    /// System prompt file (absolute, `~/`, `./`, or relative to the agents file)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt_path: Option<String>,
}
