//! Agent configuration validation.

use super::config::AgentConfig;

/// Validate one agent entry before it is registered.
pub fn validate_agent_config(name: &str, agent: &AgentConfig) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("Agent name cannot be empty".to_string());
    }

    if agent.model.trim().is_empty() {
        return Err(format!("Agent '{}' has no model", name));
    }

    if let Some(ref prompt) = agent.system_prompt {
        if prompt.trim().is_empty() {
            return Err(format!(
                "Agent '{}': system_prompt cannot be empty if provided",
                name
            ));
        }
    }

    if let Some(ref prompt_path) = agent.system_prompt_path {
        if prompt_path.trim().is_empty() {
            return Err(format!(
                "Agent '{}': system_prompt_path cannot be empty if provided",
                name
            ));
        }
    }

    if agent.system_prompt.is_none() && agent.system_prompt_path.is_none() {
        return Err(format!(
            "Agent '{}' requires either system_prompt or system_prompt_path",
            name
        ));
    }

    Ok(())
}
