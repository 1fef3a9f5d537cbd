//! Tool and runtime capability contracts.

use crate::error::ApiError;
use crate::orchestrator::Reply;
use crate::skill::Skill;
use async_trait::async_trait;
use std::collections::HashMap;

/// Arguments to a tool execution.
#[derive(Debug, Clone, Default)]
pub struct ToolRequest {
    pub query: String,
    pub skills: Vec<Skill>,
    /// Free-form keyword arguments
    pub extra: HashMap<String, String>,
}

impl ToolRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }

    pub fn with_skills(mut self, skills: Vec<Skill>) -> Self {
        self.skills = skills;
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// First skill carrying the given name.
    pub fn skill(&self, name: &str) -> Option<&Skill> {
        self.skills.iter().find(|s| s.name == name)
    }
}

/// Narrow view of the orchestrator handed to tools at call time.
#[async_trait]
pub trait AgentRuntime: Send + Sync {
    /// Run one agent exchange. `skills: None` loads the agent's declared skills.
    async fn invoke_agent(
        &self,
        agent: &str,
        query: &str,
        skills: Option<&[Skill]>,
        context: Option<&str>,
    ) -> Result<String, ApiError>;

    /// Run a registered tool. An unknown tool is a `Reply::Failure`.
    async fn execute_tool(&self, tool: &str, request: ToolRequest) -> Result<Reply, ApiError>;
}

/// A registered tool.
#[async_trait]
pub trait Tool: Send + Sync {
    async fn execute(
        &self,
        runtime: &dyn AgentRuntime,
        request: ToolRequest,
    ) -> Result<Reply, ApiError>;
}
