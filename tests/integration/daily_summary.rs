use crate::support::{future_date, query_of, write_note, FakeBackend, FakeSearch, Workspace};
use chrono::Local;
use skillmux::config::DailySummaryConfig;
use skillmux::error::ApiError;
use skillmux::provider::ChatRequest;
use skillmux::search::{WebSearchTool, WEB_SEARCH_TOOL};
use skillmux::workflow::daily_summary::document::artifact_path;
use skillmux::workflow::daily_summary::{render_base_document, splice_research_section};
use skillmux::workflow::{DailySummaryTool, OBSIDIAN_TOOL};
use skillmux::{Orchestrator, Reply};
use std::path::Path;
use std::sync::Arc;

const SUMMARY_QUERY: &str = "Generate my obsidian daily summary";

fn between(text: &str, start: &str, end: &str) -> Option<String> {
    let (_, rest) = text.split_once(start)?;
    let (inner, _) = rest.rsplit_once(end)?;
    Some(inner.to_string())
}

/// Doc agent copies the draft template and rewrites the finalize step freely;
/// research agent answers with the first line of its instruction.
fn respond(request: &ChatRequest) -> Result<String, ApiError> {
    let query = query_of(request);
    match request.model.as_str() {
        "doc-model" if query.starts_with("Create the daily summary") => Ok(between(
            query,
            "Use this exact structure and content:\n\n",
            "\n\nIMPORTANT:",
        )
        .unwrap_or_default()),
        "doc-model" => Ok("I rewrote everything.".to_string()),
        "research-model" if query.starts_with("Based on the following web search results") => {
            Ok("web synthesis".to_string())
        }
        "research-model" => Ok(format!(
            "Synthesis for {}",
            query.lines().next().unwrap_or_default()
        )),
        _ => Ok("general".to_string()),
    }
}

fn register_tools(
    orchestrator: &mut Orchestrator,
    vault: &Path,
    date: chrono::NaiveDate,
    search: Arc<FakeSearch>,
) {
    orchestrator.register_tool(
        OBSIDIAN_TOOL,
        Arc::new(DailySummaryTool::new(vault, DailySummaryConfig::default()).with_date(date)),
    );
    orchestrator.register_tool(WEB_SEARCH_TOOL, Arc::new(WebSearchTool::new(search, 5)));
}

#[tokio::test]
async fn pipeline_isolates_one_failed_search_among_three_items() {
    let workspace = Workspace::new();
    let vault = workspace.vault();
    let today = future_date();
    write_note(
        &vault,
        "Alpha.md",
        "intro\n## Exploring #open-research applications in logistics\nmore",
        Some(today),
    );
    write_note(&vault, "Beta.md", "#open-research failing search topic here", Some(today));
    write_note(
        &vault,
        "Gamma.md",
        "x\n#open-research retrieval augmented generation",
        Some(today),
    );
    write_note(&vault, "Old.md", "#open-research never scanned", None);
    let artifact = artifact_path(&vault, today);
    std::fs::write(&artifact, "stale content").unwrap();

    let backend = FakeBackend::new(respond);
    let search = FakeSearch::failing_on(&["failing"]);
    let mut orchestrator = workspace.orchestrator(backend.clone());
    register_tools(&mut orchestrator, &vault, today, search.clone());

    let reply = orchestrator.orchestrate(SUMMARY_QUERY).await.unwrap();
    let written = std::fs::read_to_string(&artifact).unwrap();
    assert_eq!(
        reply,
        Reply::Text(format!(
            "Daily summary created at {}\n\n{}",
            artifact.display(),
            written
        ))
    );

    let modified = vec![
        "Alpha.md".to_string(),
        "Beta.md".to_string(),
        "Gamma.md".to_string(),
    ];
    let draft = render_base_document(today, &[], &modified, true);
    let sections = [
        "## Alpha.md\n\nSynthesis for Research this topic from note: Alpha.md",
        "## Beta.md\n\nSynthesis for Research this topic from note: Beta.md",
        "## Gamma.md\n\nSynthesis for Research this topic from note: Gamma.md",
    ];
    assert_eq!(written, splice_research_section(&draft, &sections.join("\n\n")));

    assert_eq!(
        search.queries(),
        vec![
            "Find information about: applications in logistics",
            "Find information about: failing search topic here",
            "Find information about: retrieval augmented generation",
        ]
    );

    let requests = backend.requests();
    assert_eq!(requests.len(), 7);
    let research_call = |file: &str| {
        requests
            .iter()
            .find(|r| query_of(r).starts_with(&format!("Research this topic from note: {}", file)))
            .map(|r| query_of(r).to_string())
            .unwrap()
    };
    assert!(research_call("Alpha.md").contains("Web search results:\nweb synthesis"));
    assert!(research_call("Beta.md").contains(
        "Web search unavailable: Search for 'Find information about: failing search topic here' failed: rate limited"
    ));
    assert!(research_call("Gamma.md").contains("Context from note:\nx\n#open-research"));
}

#[tokio::test]
async fn pipeline_without_research_writes_the_draft_unchanged() {
    let workspace = Workspace::new();
    let vault = workspace.vault();
    let today = Local::now().date_naive();
    write_note(&vault, "New Note.md", "#open-research not scanned when created", None);

    let backend = FakeBackend::new(respond);
    let mut orchestrator = workspace.orchestrator(backend.clone());
    register_tools(&mut orchestrator, &vault, today, FakeSearch::failing_on(&[]));

    orchestrator.orchestrate(SUMMARY_QUERY).await.unwrap();

    let written = std::fs::read_to_string(artifact_path(&vault, today)).unwrap();
    assert_eq!(
        written,
        render_base_document(today, &["New Note.md".to_string()], &[], false)
    );
    assert!(written.contains("- [New Note.md](New%20Note.md)"));
    assert!(written.ends_with("## Open Research Topics\nNone"));
    assert_eq!(backend.requests().len(), 1);
}

#[tokio::test]
async fn off_template_draft_falls_back_to_rendered_template() {
    let workspace = Workspace::new();
    let vault = workspace.vault();
    let today = Local::now().date_naive();
    write_note(&vault, "Idea.md", "plain note", None);

    let backend = FakeBackend::new(|_| Ok("Sure! Here's a lovely summary of your day.".to_string()));
    let mut orchestrator = workspace.orchestrator(backend.clone());
    register_tools(&mut orchestrator, &vault, today, FakeSearch::failing_on(&[]));

    orchestrator.orchestrate(SUMMARY_QUERY).await.unwrap();

    let written = std::fs::read_to_string(artifact_path(&vault, today)).unwrap();
    assert_eq!(
        written,
        render_base_document(today, &["Idea.md".to_string()], &[], false)
    );
}

#[tokio::test]
async fn draft_with_preamble_and_extra_section_is_not_saved() {
    let workspace = Workspace::new();
    let vault = workspace.vault();
    let today = Local::now().date_naive();
    write_note(&vault, "Idea.md", "plain note", None);

    let backend = FakeBackend::new(|request| {
        let base = between(
            query_of(request),
            "Use this exact structure and content:\n\n",
            "\n\nIMPORTANT:",
        )
        .unwrap_or_default();
        Ok(format!(
            "Sure! Here is your summary:\n\n{}\n\n## Extra Thoughts\nI added this.",
            base
        ))
    });
    let mut orchestrator = workspace.orchestrator(backend);
    register_tools(&mut orchestrator, &vault, today, FakeSearch::failing_on(&[]));

    orchestrator.orchestrate(SUMMARY_QUERY).await.unwrap();

    let written = std::fs::read_to_string(artifact_path(&vault, today)).unwrap();
    assert_eq!(
        written,
        render_base_document(today, &["Idea.md".to_string()], &[], false)
    );
    assert!(!written.contains("Extra Thoughts"));
}

#[tokio::test]
async fn draft_failure_aborts_without_artifact() {
    let workspace = Workspace::new();
    let vault = workspace.vault();
    let today = Local::now().date_naive();
    write_note(&vault, "Idea.md", "plain note", None);

    let backend = FakeBackend::new(|_| Err(ApiError::ProviderError("model offline".into())));
    let mut orchestrator = workspace.orchestrator(backend);
    register_tools(&mut orchestrator, &vault, today, FakeSearch::failing_on(&[]));

    let err = orchestrator.orchestrate(SUMMARY_QUERY).await.unwrap_err();
    assert!(matches!(err, ApiError::WorkflowError { ref stage, .. } if stage == "draft"));
    assert!(!artifact_path(&vault, today).exists());
}

#[tokio::test]
async fn missing_vault_is_fatal() {
    let workspace = Workspace::new();
    let missing = workspace.root().join("no-such-vault");
    let backend = FakeBackend::new(respond);
    let mut orchestrator = workspace.orchestrator(backend.clone());
    register_tools(
        &mut orchestrator,
        &missing,
        Local::now().date_naive(),
        FakeSearch::failing_on(&[]),
    );

    let err = orchestrator.orchestrate(SUMMARY_QUERY).await.unwrap_err();
    assert!(matches!(err, ApiError::WorkflowError { ref stage, .. } if stage == "discover"));
    assert!(backend.requests().is_empty());
}
