//! Orchestrator
//!
//! Owns the agent registry, skill store, tool registry and chat backend, and
//! routes each query either to a single agent exchange or to a workflow tool.
//! Tools call back in through [`AgentRuntime`]; every call is awaited in turn.

pub mod invoker;
pub mod reply;
pub mod selector;

pub use reply::Reply;
pub use selector::{select, Selection};

use crate::agent::AgentRegistry;
use crate::config::SkillmuxConfig;
use crate::error::ApiError;
use crate::provider::ChatBackend;
use crate::skill::{Skill, SkillStore};
use crate::tool::{AgentRuntime, Tool, ToolRegistry, ToolRequest};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct Orchestrator {
    agents: AgentRegistry,
    skills: SkillStore,
    tools: ToolRegistry,
    backend: Arc<dyn ChatBackend>,
    workflows: HashMap<String, Vec<String>>,
    default_agent: String,
}

impl Orchestrator {
    /// Create an orchestrator; fails when the default agent is not registered.
    pub fn new(
        agents: AgentRegistry,
        skills: SkillStore,
        backend: Arc<dyn ChatBackend>,
        default_agent: impl Into<String>,
    ) -> Result<Self, ApiError> {
        let default_agent = default_agent.into();
        agents.ensure_default(&default_agent)?;
        Ok(Self {
            agents,
            skills,
            tools: ToolRegistry::new(),
            backend,
            workflows: HashMap::new(),
            default_agent,
        })
    }

    /// Build from loaded configuration with the configured provider client.
    pub fn from_config(config: &SkillmuxConfig, workspace_root: &Path) -> Result<Self, ApiError> {
        let backend = config.provider.build_client()?;
        Self::from_config_with_backend(config, workspace_root, backend)
    }

    /// Build from loaded configuration with an explicit backend.
    pub fn from_config_with_backend(
        config: &SkillmuxConfig,
        workspace_root: &Path,
        backend: Arc<dyn ChatBackend>,
    ) -> Result<Self, ApiError> {
        let agents = AgentRegistry::load_from_file(&config.resolved_agents_path(workspace_root))?;
        let skills = SkillStore::new(config.resolved_skills_dir(workspace_root));
        Ok(Self::new(agents, skills, backend, config.default_agent.clone())?
            .with_workflows(config.workflows.clone()))
    }

    /// Extension skill lists keyed by workflow skill name.
    pub fn with_workflows(mut self, workflows: HashMap<String, Vec<String>>) -> Self {
        self.workflows = workflows;
        self
    }

    /// Register a tool. Setup only; runs never mutate the registry.
    pub fn register_tool(&mut self, name: impl Into<String>, tool: Arc<dyn Tool>) {
        let name = name.into();
        debug!(tool = %name, "Registered tool");
        self.tools.register(name, tool);
    }

    pub fn agents(&self) -> &AgentRegistry {
        &self.agents
    }

    pub fn skills(&self) -> &SkillStore {
        &self.skills
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    pub fn default_agent(&self) -> &str {
        &self.default_agent
    }

    /// Route a query against the current skill directory contents.
    pub fn select(&self, query: &str) -> Selection {
        select(query, &self.agents, &self.skills.list(), &self.default_agent)
    }

    /// Route and run a query.
    pub async fn orchestrate(&self, query: &str) -> Result<Reply, ApiError> {
        let selection = self.select(query);
        info!(selection = %selection, "Routed query");

        match selection {
            Selection::Workflow(skill_name) => self.run_workflow(&skill_name, query).await,
            Selection::Agent(agent) => self
                .invoke_agent(&agent, query, None, None)
                .await
                .map(Reply::Text),
        }
    }

    async fn run_workflow(&self, skill_name: &str, query: &str) -> Result<Reply, ApiError> {
        let skill = match self.skills.load(skill_name) {
            Ok(Some(skill)) => skill,
            Ok(None) => {
                return Ok(Reply::Failure(format!(
                    "Error: Skill '{}' not found",
                    skill_name
                )))
            }
            Err(e) => return Ok(Reply::Failure(format!("Error: {}", e))),
        };

        let tool_name = match skill.requires_tool() {
            Some(tool) => tool.to_string(),
            None => {
                return Ok(Reply::Failure(format!(
                    "Error: Workflow '{}' does not declare a required tool",
                    skill_name
                )))
            }
        };

        if !self.tools.contains(&tool_name) {
            warn!(workflow = %skill_name, tool = %tool_name, "Workflow tool not registered");
            return Ok(Reply::Failure(format!(
                "Error: Workflow '{}' requires tool '{}' which is not registered",
                skill_name, tool_name
            )));
        }

        let extension = self
            .workflows
            .get(skill_name)
            .map(|v| v.as_slice())
            .unwrap_or(&[]);
        let mut skills = vec![skill];
        skills.extend(self.skills.load_many(extension));

        info!(
            workflow = %skill_name,
            tool = %tool_name,
            skills = skills.len(),
            "Running workflow"
        );
        self.execute_tool(&tool_name, ToolRequest::new(query).with_skills(skills))
            .await
    }
}

#[async_trait]
impl AgentRuntime for Orchestrator {
    async fn invoke_agent(
        &self,
        agent: &str,
        query: &str,
        skills: Option<&[Skill]>,
        context: Option<&str>,
    ) -> Result<String, ApiError> {
        let agent = self.agents.get_or_error(agent)?;

        let declared;
        let skills = match skills {
            Some(skills) => skills,
            None => {
                declared = self.skills.load_many(&agent.skills);
                declared.as_slice()
            }
        };

        let request = invoker::build_request(agent, query, skills, context);
        debug!(
            agent = %agent.name,
            model = %request.model,
            skills = skills.len(),
            system_prompt_len = request.messages[0].content.len(),
            has_context = context.is_some(),
            "Invoking agent"
        );

        let response = self.backend.chat(request).await?;
        debug!(agent = %agent.name, response_len = response.len(), "Agent responded");
        Ok(response)
    }

    async fn execute_tool(&self, tool: &str, request: ToolRequest) -> Result<Reply, ApiError> {
        match self.tools.get(tool) {
            Some(handle) => handle.execute(self, request).await,
            None => {
                warn!(tool = %tool, "Tool not found");
                Ok(Reply::Failure(format!("Error: Tool '{}' not found", tool)))
            }
        }
    }
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("agents", &self.agents.len())
            .field("skills_dir", &self.skills.root())
            .field("tools", &self.tools)
            .field("backend", &self.backend.name())
            .field("default_agent", &self.default_agent)
            .finish()
    }
}
