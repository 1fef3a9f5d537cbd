use crate::support::{query_of, FakeBackend, Workspace};
use async_trait::async_trait;
use skillmux::error::ApiError;
use skillmux::provider::MessageRole;
use skillmux::skill::Skill;
use skillmux::tool::{AgentRuntime, Tool, ToolRequest};
use skillmux::{Reply, Selection};
use std::sync::{Arc, Mutex};

/// Tool that records the requests it receives.
#[derive(Default)]
struct RecordingTool {
    requests: Mutex<Vec<ToolRequest>>,
}

#[async_trait]
impl Tool for RecordingTool {
    async fn execute(
        &self,
        _runtime: &dyn AgentRuntime,
        request: ToolRequest,
    ) -> Result<Reply, ApiError> {
        let reply = Reply::Text(format!("handled: {}", request.query));
        self.requests.lock().unwrap().push(request);
        Ok(reply)
    }
}

#[tokio::test]
async fn agent_trigger_invokes_agent_with_declared_skills() {
    let workspace = Workspace::new();
    let backend = FakeBackend::echo_model();
    let orchestrator = workspace.orchestrator(backend.clone());

    let reply = orchestrator
        .orchestrate("Please DOCUMENT THIS meeting")
        .await
        .unwrap();
    assert_eq!(reply, Reply::Text("model: doc-model".to_string()));

    let requests = backend.requests();
    assert_eq!(requests.len(), 1);
    let system = &requests[0].messages[0];
    assert_eq!(system.role, MessageRole::System);
    assert_eq!(
        system.content,
        "You are the documentation agent.\n\n# Your Available Skills:\n\n\
         ---\ntriggers: [\"daily recap\"]\n---\nSummary rules.\n"
    );
    assert_eq!(query_of(&requests[0]), "Please DOCUMENT THIS meeting");
}

#[tokio::test]
async fn unmatched_query_goes_to_default_agent_without_skills() {
    let workspace = Workspace::new();
    let backend = FakeBackend::echo_model();
    let orchestrator = workspace.orchestrator(backend.clone());

    assert_eq!(
        orchestrator.select("hello there"),
        Selection::Agent("general_agent".to_string())
    );
    let reply = orchestrator.orchestrate("hello there").await.unwrap();
    assert_eq!(reply.text(), "model: general-model");

    let requests = backend.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].messages.len(), 2);
    assert_eq!(requests[0].messages[0].content, "You are a general assistant.");
}

#[tokio::test]
async fn skill_trigger_without_tool_routes_to_owning_agent() {
    let workspace = Workspace::new();
    let backend = FakeBackend::echo_model();
    let orchestrator = workspace.orchestrator(backend.clone());

    assert_eq!(
        orchestrator.select("dig into rust lifetimes"),
        Selection::Agent("research_agent".to_string())
    );
    let reply = orchestrator.orchestrate("give me a daily recap").await.unwrap();
    assert_eq!(reply.text(), "model: doc-model");
}

#[tokio::test]
async fn workflow_without_registered_tool_is_a_soft_failure() {
    let workspace = Workspace::new();
    let backend = FakeBackend::echo_model();
    let orchestrator = workspace.orchestrator(backend.clone());

    let reply = orchestrator
        .orchestrate("Generate my obsidian daily summary")
        .await
        .unwrap();
    assert_eq!(
        reply,
        Reply::Failure(
            "Error: Workflow 'obsidian-integration' requires tool 'obsidian_tool' which is not registered"
                .to_string()
        )
    );
    assert!(backend.requests().is_empty());
}

#[tokio::test]
async fn workflow_receives_own_skill_plus_extension_list() {
    let workspace = Workspace::new();
    let backend = FakeBackend::echo_model();
    let mut orchestrator = workspace.orchestrator(backend.clone());
    let tool = Arc::new(RecordingTool::default());
    orchestrator.register_tool("obsidian_tool", tool.clone());

    let reply = orchestrator
        .orchestrate("Generate my obsidian daily summary")
        .await
        .unwrap();
    assert_eq!(
        reply,
        Reply::Text("handled: Generate my obsidian daily summary".to_string())
    );

    let requests = tool.requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    let names: Vec<&str> = requests[0].skills.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "obsidian-integration",
            "daily-summary",
            "markdown-processing",
            "open-research",
            "web-search"
        ]
    );
}

#[tokio::test]
async fn missing_extension_skills_are_skipped() {
    let workspace = Workspace::new();
    std::fs::remove_dir_all(workspace.skills_dir().join("markdown-processing")).unwrap();
    let mut orchestrator = workspace.orchestrator(FakeBackend::echo_model());
    let tool = Arc::new(RecordingTool::default());
    orchestrator.register_tool("obsidian_tool", tool.clone());

    orchestrator.orchestrate("obsidian please").await.unwrap();
    let requests = tool.requests.lock().unwrap();
    assert_eq!(requests[0].skills.len(), 4);
}

#[tokio::test]
async fn unknown_tool_is_a_soft_failure() {
    let workspace = Workspace::new();
    let orchestrator = workspace.orchestrator(FakeBackend::echo_model());

    let reply = orchestrator
        .execute_tool("nope", ToolRequest::new("anything"))
        .await
        .unwrap();
    assert_eq!(reply, Reply::Failure("Error: Tool 'nope' not found".to_string()));
}

#[tokio::test]
async fn unknown_agent_is_an_error() {
    let workspace = Workspace::new();
    let orchestrator = workspace.orchestrator(FakeBackend::echo_model());

    let err = orchestrator
        .invoke_agent("ghost_agent", "hi", None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::AgentNotFound(name) if name == "ghost_agent"));
}

#[tokio::test]
async fn backend_failure_propagates_from_orchestrate() {
    let workspace = Workspace::new();
    let backend = FakeBackend::new(|_| Err(ApiError::ProviderError("connection refused".into())));
    let orchestrator = workspace.orchestrator(backend.clone());

    let err = orchestrator.orchestrate("hello").await.unwrap_err();
    assert!(matches!(err, ApiError::ProviderError(_)));
    assert_eq!(backend.requests().len(), 1);
}

#[tokio::test]
async fn context_precedes_query_and_explicit_skills_override() {
    let workspace = Workspace::new();
    let backend = FakeBackend::echo_model();
    let orchestrator = workspace.orchestrator(backend.clone());

    orchestrator
        .invoke_agent("doc_agent", "the query", Some(&[] as &[Skill]), Some("prior result"))
        .await
        .unwrap();

    let request = &backend.requests()[0];
    assert_eq!(request.messages.len(), 3);
    assert_eq!(request.messages[0].content, "You are the documentation agent.");
    assert_eq!(request.messages[1].content, "Context:\nprior result");
    assert_eq!(request.messages[2].content, "the query");
}

#[tokio::test]
async fn skills_are_reloaded_on_every_invocation() {
    let workspace = Workspace::new();
    let backend = FakeBackend::echo_model();
    let orchestrator = workspace.orchestrator(backend.clone());

    orchestrator.invoke_agent("doc_agent", "one", None, None).await.unwrap();
    workspace.write_skill("daily-summary", "Updated rules.");
    orchestrator.invoke_agent("doc_agent", "two", None, None).await.unwrap();

    let requests = backend.requests();
    assert!(requests[0].messages[0].content.contains("Summary rules."));
    assert!(requests[1].messages[0].content.ends_with("\nUpdated rules.\n"));
}
