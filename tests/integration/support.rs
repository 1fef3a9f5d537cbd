//! Shared fixtures: a recording chat backend, a scripted search backend and a
//! workspace with agents and skills on disk.

use async_trait::async_trait;
use chrono::{Local, NaiveDate, TimeZone};
use skillmux::agent::AgentRegistry;
use skillmux::error::ApiError;
use skillmux::provider::{ChatBackend, ChatRequest};
use skillmux::search::{SearchBackend, SearchHit};
use skillmux::skill::SkillStore;
use skillmux::Orchestrator;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::SystemTime;
use tempfile::TempDir;

pub const AGENTS_YAML: &str = r#"
agents:
  doc_agent:
    triggers: ["document this"]
    skills: ["daily-summary"]
    model: doc-model
    system_prompt: "You are the documentation agent."
  research_agent:
    triggers: ["research"]
    skills: ["open-research"]
    model: research-model
    system_prompt: "You are the research agent."
  general_agent:
    model: general-model
    system_prompt: "You are a general assistant."
"#;

type Responder = dyn Fn(&ChatRequest) -> Result<String, ApiError> + Send + Sync;

/// Chat backend that records every request and answers through a closure.
pub struct FakeBackend {
    requests: Mutex<Vec<ChatRequest>>,
    responder: Box<Responder>,
}

impl FakeBackend {
    pub fn new<F>(responder: F) -> Arc<Self>
    where
        F: Fn(&ChatRequest) -> Result<String, ApiError> + Send + Sync + 'static,
    {
        Arc::new(Self {
            requests: Mutex::new(Vec::new()),
            responder: Box::new(responder),
        })
    }

    /// Backend answering every request with `model: <model>`.
    pub fn echo_model() -> Arc<Self> {
        Self::new(|request| Ok(format!("model: {}", request.model)))
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatBackend for FakeBackend {
    fn name(&self) -> &str {
        "fake"
    }

    async fn chat(&self, request: ChatRequest) -> Result<String, ApiError> {
        let response = (self.responder)(&request);
        self.requests.lock().unwrap().push(request);
        response
    }
}

/// Last user message of a request.
pub fn query_of(request: &ChatRequest) -> &str {
    request
        .messages
        .last()
        .map(|m| m.content.as_str())
        .unwrap_or("")
}

/// Search backend that fails for queries containing any of the given words.
pub struct FakeSearch {
    failing: Vec<String>,
    queries: Mutex<Vec<String>>,
}

impl FakeSearch {
    pub fn failing_on(words: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            failing: words.iter().map(|w| w.to_string()).collect(),
            queries: Mutex::new(Vec::new()),
        })
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchBackend for FakeSearch {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>, ApiError> {
        self.queries.lock().unwrap().push(query.to_string());
        if self.failing.iter().any(|w| query.contains(w.as_str())) {
            return Err(ApiError::SearchError("rate limited".to_string()));
        }
        Ok((1..=max_results.min(2))
            .map(|i| SearchHit {
                title: format!("Hit {}", i),
                url: format!("https://example.com/{}", i),
                snippet: format!("About {}", query),
            })
            .collect())
    }
}

/// Temporary workspace with `agents/agents.yaml` and `.claude/skills/*`.
pub struct Workspace {
    pub dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let workspace = Self { dir };
        std::fs::create_dir_all(workspace.root().join("agents")).unwrap();
        std::fs::write(workspace.root().join("agents/agents.yaml"), AGENTS_YAML).unwrap();
        workspace.write_skill("daily-summary", "---\ntriggers: [\"daily recap\"]\n---\nSummary rules.");
        workspace.write_skill("markdown-processing", "Markdown rules.");
        workspace.write_skill(
            "obsidian-integration",
            "---\ntriggers: [\"obsidian\"]\nrequires_tool: obsidian_tool\n---\nVault workflow.",
        );
        workspace.write_skill("open-research", "---\ntriggers: [\"dig into\"]\n---\nResearch format.");
        workspace.write_skill(
            "web-search",
            "---\ntriggers: [\"look up\"]\nrequires_tool: web_search_tool\n---\nSearch rules.",
        );
        workspace
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn skills_dir(&self) -> PathBuf {
        self.root().join(".claude/skills")
    }

    pub fn write_skill(&self, name: &str, content: &str) {
        let dir = self.skills_dir().join(name);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("SKILL.md"), content).unwrap();
    }

    pub fn vault(&self) -> PathBuf {
        let vault = self.root().join("vault");
        std::fs::create_dir_all(&vault).unwrap();
        vault
    }

    pub fn orchestrator(&self, backend: Arc<dyn ChatBackend>) -> Orchestrator {
        let agents = AgentRegistry::load_from_file(&self.root().join("agents/agents.yaml")).unwrap();
        let mut workflows = HashMap::new();
        workflows.insert(
            "obsidian-integration".to_string(),
            vec![
                "daily-summary".to_string(),
                "markdown-processing".to_string(),
                "open-research".to_string(),
                "web-search".to_string(),
            ],
        );
        Orchestrator::new(agents, SkillStore::new(self.skills_dir()), backend, "general_agent")
            .unwrap()
            .with_workflows(workflows)
    }
}

/// Write a note and set its modification time to noon on `date`.
pub fn write_note(dir: &Path, name: &str, content: &str, modified_on: Option<NaiveDate>) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    if let Some(date) = modified_on {
        let noon = Local
            .from_local_datetime(&date.and_hms_opt(12, 0, 0).unwrap())
            .single()
            .unwrap();
        std::fs::File::options()
            .write(true)
            .open(&path)
            .unwrap()
            .set_modified(SystemTime::from(noon))
            .unwrap();
    }
    path
}

/// A run date after every file's creation date.
pub fn future_date() -> NaiveDate {
    Local::now().date_naive() + chrono::Duration::days(2)
}

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Run `f` with `XDG_CONFIG_HOME` pointed into `dir`, so no user config leaks in.
pub fn with_xdg_env<F: FnOnce()>(dir: &Path, f: F) {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let previous = std::env::var_os("XDG_CONFIG_HOME");
    std::env::set_var("XDG_CONFIG_HOME", dir.join("xdg"));
    f();
    match previous {
        Some(value) => std::env::set_var("XDG_CONFIG_HOME", value),
        None => std::env::remove_var("XDG_CONFIG_HOME"),
    }
}
