//! CLI Tooling
//!
//! Command-line interface for routing queries, running the daily summary
//! workflow and inspecting agents and skills.

use crate::agent::{AgentRegistry, ValidationResult};
use crate::config::{ConfigLoader, SkillmuxConfig};
use crate::error::ApiError;
use crate::orchestrator::{Orchestrator, Selection};
use crate::search::{DuckDuckGoBackend, WebSearchTool, WEB_SEARCH_TOOL};
use crate::skill::{Skill, SkillStore};
use crate::workflow::{DailySummaryTool, OBSIDIAN_TOOL};
use clap::{Parser, Subcommand};
use comfy_table::Table;
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Query that routes to the daily summary workflow.
pub const SUMMARY_QUERY: &str = "Generate my obsidian daily summary";

/// Skillmux CLI - trigger-routed agents with minimal skill context
#[derive(Parser)]
#[command(name = "skillmux")]
#[command(about = "Route queries to agents and skill-backed workflows")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, file+stderr, both)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate today's daily summary for the note root
    Summary {
        /// Note root (defaults to daily_summary.vault_path, then the workspace)
        #[arg(long)]
        vault: Option<PathBuf>,
    },
    /// Route a query and print the answer
    Ask {
        #[arg(required = true)]
        query: Vec<String>,
        /// Note root for workflows that need one
        #[arg(long)]
        vault: Option<PathBuf>,
    },
    /// Show where a query would be routed without running it
    Route {
        #[arg(required = true)]
        query: Vec<String>,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Agent inspection
    Agent {
        #[command(subcommand)]
        command: AgentCommands,
    },
    /// Skill inspection
    Skill {
        #[command(subcommand)]
        command: SkillCommands,
    },
    /// Print the effective configuration as TOML
    Config,
}

#[derive(Subcommand)]
pub enum AgentCommands {
    /// List all agents in declaration order
    List {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Show agent details
    Show {
        name: String,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Validate agent definitions against the skill directory
    Validate {
        /// Agent name (required unless --all is used)
        #[arg(required_unless_present = "all")]
        name: Option<String>,
        /// Validate all agents
        #[arg(long, conflicts_with = "name")]
        all: bool,
        /// Show detailed validation results
        #[arg(long)]
        verbose: bool,
    },
}

#[derive(Subcommand)]
pub enum SkillCommands {
    /// List skills in routing order
    List {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Print a skill document
    Show { name: String },
}

/// CLI context holding the loaded configuration and the async runtime
pub struct CliContext {
    workspace_root: PathBuf,
    config: SkillmuxConfig,
    runtime: tokio::runtime::Runtime,
}

impl CliContext {
    /// Create a new CLI context
    pub fn new(workspace_root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let config = if let Some(cfg_path) = &config_path {
            ConfigLoader::load_from_file(cfg_path)?
        } else {
            ConfigLoader::load(&workspace_root)?
        };
        let runtime = tokio::runtime::Runtime::new()
            .map_err(|e| ApiError::ConfigError(format!("Failed to start async runtime: {}", e)))?;

        Ok(Self {
            workspace_root,
            config,
            runtime,
        })
    }

    pub fn config(&self) -> &SkillmuxConfig {
        &self.config
    }

    fn agent_registry(&self) -> Result<AgentRegistry, ApiError> {
        let registry =
            AgentRegistry::load_from_file(&self.config.resolved_agents_path(&self.workspace_root))?;
        registry.ensure_default(&self.config.default_agent)?;
        Ok(registry)
    }

    fn skill_store(&self) -> SkillStore {
        SkillStore::new(self.config.resolved_skills_dir(&self.workspace_root))
    }

    /// Orchestrator with the daily summary and web search tools registered.
    fn orchestrator(&self, vault: Option<&PathBuf>) -> Result<Orchestrator, ApiError> {
        let mut orchestrator = Orchestrator::from_config(&self.config, &self.workspace_root)?;

        let vault = match vault {
            Some(path) => self.workspace_root.join(path),
            None => self.config.daily_summary.resolved_vault(&self.workspace_root),
        };
        orchestrator.register_tool(
            OBSIDIAN_TOOL,
            Arc::new(DailySummaryTool::new(
                vault,
                self.config.daily_summary.clone(),
            )),
        );

        let search = DuckDuckGoBackend::from_config(&self.config.search)?;
        orchestrator.register_tool(
            WEB_SEARCH_TOOL,
            Arc::new(WebSearchTool::new(
                Arc::new(search),
                self.config.search.max_results,
            )),
        );
        Ok(orchestrator)
    }

    /// Execute a CLI command
    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        match command {
            Commands::Summary { vault } => self.run_query(SUMMARY_QUERY, vault.as_ref()),
            Commands::Ask { query, vault } => self.run_query(&query.join(" "), vault.as_ref()),
            Commands::Route { query, format } => self.handle_route(&query.join(" "), format),
            Commands::Agent { command } => self.handle_agent_command(command),
            Commands::Skill { command } => self.handle_skill_command(command),
            Commands::Config => self.handle_config(),
        }
    }

    fn run_query(&self, query: &str, vault: Option<&PathBuf>) -> Result<String, ApiError> {
        let orchestrator = self.orchestrator(vault)?;
        info!(query = %query, "Running query");
        let reply = self.runtime.block_on(orchestrator.orchestrate(query))?;
        Ok(reply.into_text())
    }

    fn handle_route(&self, query: &str, format: &str) -> Result<String, ApiError> {
        let registry = self.agent_registry()?;
        let skills = self.skill_store().list();
        let selection =
            crate::orchestrator::select(query, &registry, &skills, &self.config.default_agent);
        match format {
            "json" => Ok(serde_json::to_string_pretty(&selection)
                .unwrap_or_else(|_| "{}".to_string())),
            _ => Ok(format_selection_text(&selection)),
        }
    }

    /// Handle agent inspection commands
    fn handle_agent_command(&self, command: &AgentCommands) -> Result<String, ApiError> {
        let registry = self.agent_registry()?;
        match command {
            AgentCommands::List { format } => match format.as_str() {
                "json" => Ok(format_agent_list_json(&registry)),
                _ => Ok(format_agent_list_text(&registry)),
            },
            AgentCommands::Show { name, format } => {
                let agent = registry.get_or_error(name)?;
                match format.as_str() {
                    "json" => Ok(serde_json::to_string_pretty(&json!({
                        "name": agent.name,
                        "model": agent.model,
                        "triggers": agent.triggers,
                        "skills": agent.skills,
                        "system_prompt": agent.system_prompt,
                    }))
                    .unwrap_or_else(|_| "{}".to_string())),
                    _ => Ok(format_agent_show_text(agent)),
                }
            }
            AgentCommands::Validate { name, all, verbose } => {
                let store = self.skill_store();
                if *all {
                    let results: Vec<ValidationResult> = registry
                        .iter()
                        .map(|agent| registry.validate_agent(&agent.name, &store))
                        .collect();
                    if results.is_empty() {
                        return Ok("No agents found to validate.".to_string());
                    }
                    Ok(format_validation_results_all(&results, *verbose))
                } else {
                    let name = name.as_deref().ok_or_else(|| {
                        ApiError::ConfigError(
                            "Agent name required unless --all is specified".to_string(),
                        )
                    })?;
                    Ok(format_validation_result(
                        &registry.validate_agent(name, &store),
                        *verbose,
                    ))
                }
            }
        }
    }

    fn handle_skill_command(&self, command: &SkillCommands) -> Result<String, ApiError> {
        let store = self.skill_store();
        match command {
            SkillCommands::List { format } => {
                let skills = store.list();
                match format.as_str() {
                    "json" => Ok(format_skill_list_json(&skills)),
                    _ => Ok(format_skill_list_text(&skills)),
                }
            }
            SkillCommands::Show { name } => match store.load(name)? {
                Some(skill) => Ok(skill.content),
                None => Err(ApiError::ConfigError(format!(
                    "Skill '{}' not found at {}",
                    name,
                    store.skill_path(name).display()
                ))),
            },
        }
    }

    fn handle_config(&self) -> Result<String, ApiError> {
        let mut config = self.config.clone();
        if config.provider.api_key.is_some() {
            config.provider.api_key = Some("********".to_string());
        }
        toml::to_string_pretty(&config)
            .map_err(|e| ApiError::ConfigError(format!("Failed to render configuration: {}", e)))
    }
}

fn format_selection_text(selection: &Selection) -> String {
    match selection {
        Selection::Agent(name) => format!("Agent: {}", name),
        Selection::Workflow(name) => format!("Workflow: {}", name),
    }
}

fn join_or_dash(items: &[String]) -> String {
    if items.is_empty() {
        "-".to_string()
    } else {
        items.join(", ")
    }
}

/// Format agent list as a table
fn format_agent_list_text(registry: &AgentRegistry) -> String {
    if registry.is_empty() {
        return "No agents found.".to_string();
    }
    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.set_header(vec!["Agent", "Model", "Triggers", "Skills"]);
    for agent in registry.iter() {
        table.add_row(vec![
            agent.name.clone(),
            agent.model.clone(),
            join_or_dash(&agent.triggers),
            join_or_dash(&agent.skills),
        ]);
    }
    format!("{}\n\nTotal: {} agent(s)", table, registry.len())
}

/// Format agent list as JSON
fn format_agent_list_json(registry: &AgentRegistry) -> String {
    let agents: Vec<_> = registry
        .iter()
        .map(|agent| {
            json!({
                "name": agent.name,
                "model": agent.model,
                "triggers": agent.triggers,
                "skills": agent.skills,
            })
        })
        .collect();
    let out = json!({ "agents": agents, "total": registry.len() });
    serde_json::to_string_pretty(&out).unwrap_or_else(|_| "{}".to_string())
}

fn format_agent_show_text(agent: &crate::agent::Agent) -> String {
    let mut output = format!("Agent: {}\n", agent.name);
    output.push_str(&format!("Model: {}\n", agent.model));
    output.push_str(&format!("Triggers: {}\n", join_or_dash(&agent.triggers)));
    output.push_str(&format!("Skills: {}\n", join_or_dash(&agent.skills)));
    output.push_str("\nSystem Prompt:\n");
    output.push_str(&agent.system_prompt);
    output
}

/// Format validation result
fn format_validation_result(result: &ValidationResult, verbose: bool) -> String {
    let mut output = format!("Validating agent: {}\n\n", result.agent);

    if result.is_valid() {
        output.push_str("✓ All validation checks passed\n\n");
    } else {
        for (description, passed) in &result.checks {
            let mark = if *passed { "✓" } else { "✗" };
            output.push_str(&format!("{} {}\n", mark, description));
        }
        if !result.errors.is_empty() {
            output.push('\n');
            for error in &result.errors {
                output.push_str(&format!("✗ {}\n", error));
            }
        }
        output.push('\n');
    }

    for warning in &result.warnings {
        output.push_str(&format!("! {}\n", warning));
    }

    if verbose {
        output.push_str(&format!(
            "Validation summary: {}/{} checks passed\n",
            result.passed_checks(),
            result.total_checks()
        ));
        if !result.errors.is_empty() {
            output.push_str(&format!("Errors found: {}\n", result.errors.len()));
        }
    } else if result.is_valid() {
        output.push_str(&format!(
            "Validation passed: {}/{} checks\n",
            result.passed_checks(),
            result.total_checks()
        ));
    } else {
        output.push_str(&format!(
            "Validation failed: {} error(s) found\n",
            result.errors.len()
        ));
    }

    output
}

/// Format multiple validation results (for --all)
fn format_validation_results_all(results: &[ValidationResult], verbose: bool) -> String {
    let mut output = String::from("Validating all agents:\n\n");
    let valid_count = results.iter().filter(|r| r.is_valid()).count();

    for result in results {
        if result.is_valid() {
            if verbose {
                output.push_str(&format!(
                    "✓ {}: All checks passed ({}/{} checks)\n",
                    result.agent,
                    result.passed_checks(),
                    result.total_checks()
                ));
            } else {
                output.push_str(&format!("✓ {}: Valid\n", result.agent));
            }
        } else {
            output.push_str(&format!("✗ {}: Validation failed\n", result.agent));
            if verbose {
                for (description, passed) in &result.checks {
                    if !passed {
                        output.push_str(&format!("  ✗ {}\n", description));
                    }
                }
                for error in &result.errors {
                    output.push_str(&format!("  ✗ {}\n", error));
                }
            }
        }
    }

    output.push_str(&format!(
        "\nSummary: {} valid, {} invalid (out of {} total)\n",
        valid_count,
        results.len() - valid_count,
        results.len()
    ));
    output
}

fn format_skill_list_text(skills: &[Skill]) -> String {
    if skills.is_empty() {
        return "No skills found.".to_string();
    }
    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.set_header(vec!["Skill", "Triggers", "Requires Tool", "Description"]);
    for skill in skills {
        table.add_row(vec![
            skill.name.clone(),
            join_or_dash(&skill.metadata.triggers),
            skill.requires_tool().unwrap_or("-").to_string(),
            skill.description().unwrap_or("-").to_string(),
        ]);
    }
    format!("{}\n\nTotal: {} skill(s)", table, skills.len())
}

fn format_skill_list_json(skills: &[Skill]) -> String {
    let list: Vec<_> = skills
        .iter()
        .map(|skill| {
            json!({
                "name": skill.name,
                "triggers": skill.metadata.triggers,
                "requires_tool": skill.requires_tool(),
                "description": skill.description(),
            })
        })
        .collect();
    let out = json!({ "skills": list, "total": skills.len() });
    serde_json::to_string_pretty(&out).unwrap_or_else(|_| "{}".to_string())
}
