//! Query routing.
//!
//! Priority, first match wins:
//! 1. agent triggers, agents in registry declaration order
//! 2. skill triggers, skills in sorted directory order; a skill with
//!    `requires_tool` selects a workflow, otherwise the first agent declaring
//!    the skill is selected
//! 3. the default agent

use crate::agent::AgentRegistry;
use crate::skill::Skill;
use serde::Serialize;
use std::fmt;

/// Routing decision for one query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum Selection {
    Agent(String),
    Workflow(String),
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::Agent(name) => write!(f, "agent:{}", name),
            Selection::Workflow(name) => write!(f, "workflow:{}", name),
        }
    }
}

/// Select an agent or workflow for `query`.
///
/// A trigger-matched skill that neither requires a tool nor belongs to any
/// agent does not stop the scan; later skills are still considered.
pub fn select(
    query: &str,
    agents: &AgentRegistry,
    skills: &[Skill],
    default_agent: &str,
) -> Selection {
    if let Some(agent) = agents.iter().find(|a| a.matches(query)) {
        return Selection::Agent(agent.name.clone());
    }

    for skill in skills.iter().filter(|s| s.matches(query)) {
        if skill.requires_tool().is_some() {
            return Selection::Workflow(skill.name.clone());
        }
        if let Some(agent) = agents.iter().find(|a| a.declares_skill(&skill.name)) {
            return Selection::Agent(agent.name.clone());
        }
    }

    Selection::Agent(default_agent.to_string())
}
