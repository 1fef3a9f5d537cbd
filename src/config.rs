//! Configuration
//!
//! Layered configuration for routing, provider access, search and the daily
//! summary workflow. Sources merge in this order (later wins): built-in
//! defaults, global file, workspace file, `SKILLMUX__*` environment.

mod facade;
pub mod merge;
pub mod sources;
pub mod xdg;

pub use facade::ConfigLoader;

use crate::logging::LoggingConfig;
use crate::provider::ProviderConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Skill name of the built-in note workflow.
pub const NOTE_WORKFLOW_SKILL: &str = "obsidian-integration";

fn default_agents_path() -> PathBuf {
    PathBuf::from("agents/agents.yaml")
}

fn default_skills_dir() -> PathBuf {
    PathBuf::from(".claude/skills")
}

fn default_agent_name() -> String {
    "general_agent".to_string()
}

fn default_workflows() -> HashMap<String, Vec<String>> {
    let mut workflows = HashMap::new();
    workflows.insert(
        NOTE_WORKFLOW_SKILL.to_string(),
        vec![
            "daily-summary".to_string(),
            "markdown-processing".to_string(),
            "open-research".to_string(),
            "web-search".to_string(),
        ],
    );
    workflows
}

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillmuxConfig {
    /// Agent definitions file (YAML, `agents:` mapping)
    #[serde(default = "default_agents_path")]
    pub agents_path: PathBuf,

    /// Root of the `<name>/SKILL.md` hierarchy
    #[serde(default = "default_skills_dir")]
    pub skills_dir: PathBuf,

    /// Agent used when no trigger matches
    #[serde(default = "default_agent_name")]
    pub default_agent: String,

    /// Extra skills loaded for each workflow's sub-agents, keyed by workflow skill
    #[serde(default = "default_workflows")]
    pub workflows: HashMap<String, Vec<String>>,

    #[serde(default)]
    pub provider: ProviderConfig,

    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub daily_summary: DailySummaryConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for SkillmuxConfig {
    fn default() -> Self {
        Self {
            agents_path: default_agents_path(),
            skills_dir: default_skills_dir(),
            default_agent: default_agent_name(),
            workflows: default_workflows(),
            provider: ProviderConfig::default(),
            search: SearchConfig::default(),
            daily_summary: DailySummaryConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl SkillmuxConfig {
    /// Agents file resolved against the workspace root.
    pub fn resolved_agents_path(&self, workspace_root: &Path) -> PathBuf {
        workspace_root.join(&self.agents_path)
    }

    /// Skills directory resolved against the workspace root.
    pub fn resolved_skills_dir(&self, workspace_root: &Path) -> PathBuf {
        workspace_root.join(&self.skills_dir)
    }

    /// Extension skill list for a workflow; empty when none is configured.
    pub fn workflow_extension(&self, workflow: &str) -> &[String] {
        self.workflows
            .get(workflow)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }
}

fn default_max_results() -> usize {
    5
}

fn default_search_endpoint() -> String {
    crate::search::DEFAULT_DUCKDUCKGO_ENDPOINT.to_string()
}

fn default_search_timeout() -> u64 {
    20
}

/// Web search backend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    #[serde(default = "default_search_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_search_timeout")]
    pub timeout_secs: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_results: default_max_results(),
            endpoint: default_search_endpoint(),
            timeout_secs: default_search_timeout(),
        }
    }
}

fn default_research_marker() -> String {
    "#open-research".to_string()
}

fn default_summary_marker() -> String {
    "Daily Summary".to_string()
}

/// Daily summary workflow settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailySummaryConfig {
    /// Note root scanned and written to; `None` means the workspace root
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vault_path: Option<PathBuf>,

    /// Substring marking a line that needs research
    #[serde(default = "default_research_marker")]
    pub research_marker: String,

    /// File-name fragment identifying generated summaries (never scanned)
    #[serde(default = "default_summary_marker")]
    pub summary_marker: String,
}

impl Default for DailySummaryConfig {
    fn default() -> Self {
        Self {
            vault_path: None,
            research_marker: default_research_marker(),
            summary_marker: default_summary_marker(),
        }
    }
}

impl DailySummaryConfig {
    pub fn resolved_vault(&self, workspace_root: &Path) -> PathBuf {
        match &self.vault_path {
            Some(p) => workspace_root.join(p),
            None => workspace_root.to_path_buf(),
        }
    }
}
