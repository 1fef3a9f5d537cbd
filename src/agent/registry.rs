//! Agent registry: ordered, immutable table of agent definitions.

use crate::agent::config::AgentConfig;
use crate::agent::prompt::{load_prompt, resolve_prompt_path};
use crate::agent::validation::validate_agent_config;
use crate::error::ApiError;
use crate::skill::SkillStore;
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

/// A resolved agent definition.
#[derive(Debug, Clone, PartialEq)]
pub struct Agent {
    pub name: String,
    pub triggers: Vec<String>,
    pub skills: Vec<String>,
    pub model: String,
    /// Prompt template text, already read from disk when configured by path
    pub system_prompt: String,
}

impl Agent {
    /// True when any trigger occurs in the query, case-insensitively.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.triggers
            .iter()
            .filter(|t| !t.trim().is_empty())
            .any(|t| query.contains(&t.to_lowercase()))
    }

    /// True when the agent declares the named skill.
    pub fn declares_skill(&self, skill: &str) -> bool {
        self.skills.iter().any(|s| s == skill)
    }
}

#[derive(Debug, Deserialize)]
struct AgentsFile {
    #[serde(default)]
    agents: serde_yaml::Mapping,
}

/// Agent registry
///
/// Built once at startup and never mutated afterwards. Iteration follows the
/// declaration order of the agents file.
#[derive(Debug, Clone, Default)]
pub struct AgentRegistry {
    agents: Vec<Agent>,
}

impl AgentRegistry {
    /// Build a registry from already-resolved agents.
    ///
    /// Fails on duplicate names.
    pub fn from_agents(agents: Vec<Agent>) -> Result<Self, ApiError> {
        let mut registry = Self::default();
        for agent in agents {
            registry.register(agent)?;
        }
        Ok(registry)
    }

    /// Load the `agents:` mapping from a YAML file.
    ///
    /// Relative `system_prompt_path` entries resolve against the file's directory.
    pub fn load_from_file(path: &Path) -> Result<Self, ApiError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ApiError::ConfigError(format!(
                "Failed to read agents file {}: {}",
                path.display(),
                e
            ))
        })?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        let registry = Self::load_from_str(&content, base_dir)?;
        info!(
            path = %path.display(),
            agents = registry.len(),
            "Loaded agent registry"
        );
        Ok(registry)
    }

    /// Parse agents YAML text.
    pub fn load_from_str(content: &str, base_dir: &Path) -> Result<Self, ApiError> {
        let file: AgentsFile = serde_yaml::from_str(content)
            .map_err(|e| ApiError::ConfigError(format!("Invalid agents file: {}", e)))?;

        let mut registry = Self::default();
        for (key, value) in file.agents {
            let name = key
                .as_str()
                .ok_or_else(|| {
                    ApiError::ConfigError(format!("Agent name must be a string, got {:?}", key))
                })?
                .to_string();
            let config: AgentConfig = serde_yaml::from_value(value).map_err(|e| {
                ApiError::ConfigError(format!("Invalid definition for agent '{}': {}", name, e))
            })?;
            registry.register(resolve_agent(name, config, base_dir)?)?;
        }
        Ok(registry)
    }

    fn register(&mut self, agent: Agent) -> Result<(), ApiError> {
        if self.get(&agent.name).is_some() {
            return Err(ApiError::ConfigError(format!(
                "Duplicate agent definition: {}",
                agent.name
            )));
        }
        debug!(agent = %agent.name, triggers = agent.triggers.len(), "Registered agent");
        self.agents.push(agent);
        Ok(())
    }

    /// Get an agent by name
    pub fn get(&self, name: &str) -> Option<&Agent> {
        self.agents.iter().find(|a| a.name == name)
    }

    /// Get an agent by name or return an error
    pub fn get_or_error(&self, name: &str) -> Result<&Agent, ApiError> {
        self.get(name)
            .ok_or_else(|| ApiError::AgentNotFound(name.to_string()))
    }

    /// Agents in declaration order
    pub fn iter(&self) -> std::slice::Iter<'_, Agent> {
        self.agents.iter()
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Fail unless the named default agent is registered.
    pub fn ensure_default(&self, default_agent: &str) -> Result<(), ApiError> {
        if self.get(default_agent).is_none() {
            return Err(ApiError::ConfigError(format!(
                "Default agent '{}' is not defined",
                default_agent
            )));
        }
        Ok(())
    }

    /// Check an agent's definition against the skill store.
    pub fn validate_agent(&self, name: &str, skills: &SkillStore) -> ValidationResult {
        let mut result = ValidationResult::new(name.to_string());

        let agent = match self.get(name) {
            Some(a) => a,
            None => {
                result.add_error("Agent not found in registry".to_string());
                return result;
            }
        };

        result.add_check("Model is set", !agent.model.trim().is_empty());
        result.add_check(
            "System prompt is not empty",
            !agent.system_prompt.trim().is_empty(),
        );

        if agent.triggers.is_empty() {
            result.add_warning(
                "No triggers; reachable only as default or through a skill".to_string(),
            );
        }
        if agent.triggers.iter().any(|t| t.trim().is_empty()) {
            result.add_warning("Blank trigger entries are ignored".to_string());
        }

        for skill_name in &agent.skills {
            match skills.load(skill_name) {
                Ok(Some(_)) => result.add_check(&format!("Skill '{}' resolves", skill_name), true),
                Ok(None) => result.add_error(format!(
                    "Skill '{}' not found at {}",
                    skill_name,
                    skills.skill_path(skill_name).display()
                )),
                Err(e) => result.add_error(format!("Skill '{}' is invalid: {}", skill_name, e)),
            }
        }

        result
    }
}

fn resolve_agent(name: String, config: AgentConfig, base_dir: &Path) -> Result<Agent, ApiError> {
    validate_agent_config(&name, &config).map_err(ApiError::ConfigError)?;

    let system_prompt = match (config.system_prompt, config.system_prompt_path) {
        (Some(prompt), _) => prompt,
        (None, Some(path)) => load_prompt(&resolve_prompt_path(&path, base_dir)?)?,
        (None, None) => {
            return Err(ApiError::ConfigError(format!(
                "Agent '{}' requires either system_prompt or system_prompt_path",
                name
            )))
        }
    };

    Ok(Agent {
        name,
        triggers: config.triggers,
        skills: config.skills,
        model: config.model,
        system_prompt,
    })
}

/// Validation result for an agent definition
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub agent: String,
    pub checks: Vec<(String, bool)>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    pub fn new(agent: String) -> Self {
        Self {
            agent,
            checks: Vec::new(),
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn add_check(&mut self, description: &str, passed: bool) {
        self.checks.push((description.to_string(), passed));
    }

    pub fn add_error(&mut self, error: String) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: String) {
        self.warnings.push(warning);
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty() && self.checks.iter().all(|(_, passed)| *passed)
    }

    pub fn total_checks(&self) -> usize {
        self.checks.len()
    }

    pub fn passed_checks(&self) -> usize {
        self.checks.iter().filter(|(_, passed)| *passed).count()
    }
}
