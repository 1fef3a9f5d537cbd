//! The daily summary tool and its runtime-driven stages.

use super::discover::discover;
use super::document::{
    accept_draft, accept_finalized, artifact_path, draft_instruction, finalize_instruction,
    join_sections, render_base_document, splice_research_section, DailyArtifact,
};
use super::research::{derive_topic, scan_files, search_query, ResearchItem};
use super::{DAILY_SUMMARY_SKILL, DOC_AGENT, OPEN_RESEARCH_SKILL, WEB_SEARCH_SKILL, WORKFLOW};
use crate::config::DailySummaryConfig;
use crate::error::ApiError;
use crate::orchestrator::Reply;
use crate::search::{RESEARCH_AGENT, WEB_SEARCH_TOOL};
use crate::skill::Skill;
use crate::tool::{AgentRuntime, Tool, ToolRequest};
use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

fn skills_named(request: &ToolRequest, name: &str) -> Vec<Skill> {
    request.skill(name).cloned().into_iter().collect()
}

fn research_instruction(item: &ResearchItem, web_results: &str) -> String {
    format!(
        "Research this topic from note: {}\n\n\
         Context from note:\n{}\n\n\
         Web search results:\n{}\n\n\
         Task: Synthesize the web search results into a well-organized summary with:\n\
         - Current state of the concept/technology\n\
         - Applications in different domains\n\
         - Key players (companies, researchers, institutions)\n\
         - Sources (use the URLs from the web search results)\n\n\
         Follow the format specified in your open-research skill.",
        item.file, item.context, web_results
    )
}

/// Research every item in order, one section per item.
///
/// A failed search becomes a `Web search unavailable` placeholder handed to the
/// research agent; a failed synthesis becomes the section body itself.
pub async fn research_sections(
    runtime: &dyn AgentRuntime,
    items: &[ResearchItem],
    marker: &str,
    web_skills: &[Skill],
    research_skills: &[Skill],
) -> Vec<String> {
    let mut sections = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let topic = derive_topic(item, marker);
        info!(
            item = index + 1,
            total = items.len(),
            file = %item.file,
            topic = %topic,
            "Researching"
        );

        let request = ToolRequest::new(search_query(&topic)).with_skills(web_skills.to_vec());
        let web_results = match runtime.execute_tool(WEB_SEARCH_TOOL, request).await {
            Ok(Reply::Text(text)) => text,
            Ok(Reply::Failure(message)) => {
                warn!(file = %item.file, reason = %message, "Web search failed");
                format!("Web search unavailable: {}", message)
            }
            Err(e) => {
                warn!(file = %item.file, error = %e, "Web search failed");
                format!("Web search unavailable: {}", e)
            }
        };

        let body = match runtime
            .invoke_agent(
                RESEARCH_AGENT,
                &research_instruction(item, &web_results),
                Some(research_skills),
                None,
            )
            .await
        {
            Ok(result) => result,
            Err(e) => {
                error!(file = %item.file, error = %e, "Research synthesis failed");
                format!("Research unavailable: {}", e)
            }
        };
        sections.push(format!("## {}\n\n{}", item.file, body));
    }
    sections
}

/// Replace the research placeholder of `draft` with `sections`.
///
/// With no sections the draft is returned unchanged and no agent is called.
/// A response that differs from the local splice is replaced by it.
pub async fn finalize_document(
    runtime: &dyn AgentRuntime,
    draft: String,
    sections: &[String],
    summary_skills: &[Skill],
) -> Result<String, ApiError> {
    if sections.is_empty() {
        return Ok(draft);
    }

    let research_content = join_sections(sections);
    let response = runtime
        .invoke_agent(
            DOC_AGENT,
            &finalize_instruction(&draft, &research_content),
            Some(summary_skills),
            None,
        )
        .await
        .map_err(|e| ApiError::workflow(WORKFLOW, "finalize", e.to_string()))?;

    if accept_finalized(&draft, &response, &research_content) {
        Ok(response)
    } else {
        warn!("Finalized summary diverged from the draft; splicing research locally");
        Ok(splice_research_section(&draft, &research_content))
    }
}

/// Workflow tool writing `<root>/<date>_Daily Summary.md`.
pub struct DailySummaryTool {
    root: PathBuf,
    config: DailySummaryConfig,
    date: Option<NaiveDate>,
}

impl DailySummaryTool {
    pub fn new(root: impl Into<PathBuf>, config: DailySummaryConfig) -> Self {
        Self {
            root: root.into(),
            config,
            date: None,
        }
    }

    /// Pin the run date instead of reading the local clock.
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    async fn draft(
        &self,
        runtime: &dyn AgentRuntime,
        today: NaiveDate,
        base: String,
        summary_skills: &[Skill],
    ) -> Result<String, ApiError> {
        let response = runtime
            .invoke_agent(
                DOC_AGENT,
                &draft_instruction(today, &base),
                Some(summary_skills),
                None,
            )
            .await
            .map_err(|e| ApiError::workflow(WORKFLOW, "draft", e.to_string()))?;

        if !accept_draft(&base, &response) {
            warn!("Draft does not match the summary template; using the rendered template");
        }
        Ok(base)
    }
}

#[async_trait]
impl Tool for DailySummaryTool {
    async fn execute(
        &self,
        runtime: &dyn AgentRuntime,
        request: ToolRequest,
    ) -> Result<Reply, ApiError> {
        let today = self.date.unwrap_or_else(|| Local::now().date_naive());
        info!(root = %self.root.display(), date = %today, "Starting daily summary");

        let files = discover(&self.root, today, &self.config.summary_marker)?;
        info!(
            created = files.created.len(),
            modified = files.modified.len(),
            "Stage 1 complete: files discovered"
        );

        let items = scan_files(&files.modified, &self.config.research_marker);
        info!(items = items.len(), "Stage 2 complete: research tags extracted");

        let summary_skills = skills_named(&request, DAILY_SUMMARY_SKILL);
        let base = render_base_document(
            today,
            &files.created_names(),
            &files.modified_names(),
            !items.is_empty(),
        );
        let draft = self.draft(runtime, today, base, &summary_skills).await?;
        info!("Stage 3 complete: base document drafted");

        let sections = research_sections(
            runtime,
            &items,
            &self.config.research_marker,
            &skills_named(&request, WEB_SEARCH_SKILL),
            &skills_named(&request, OPEN_RESEARCH_SKILL),
        )
        .await;
        info!(sections = sections.len(), "Stage 4 complete: research synthesized");

        let content = finalize_document(runtime, draft, &sections, &summary_skills).await?;
        let artifact = DailyArtifact {
            path: artifact_path(&self.root, today),
            content,
        };
        artifact.write().map_err(|e| {
            ApiError::workflow(
                WORKFLOW,
                "finalize",
                format!("Failed to write {}: {}", artifact.path.display(), e),
            )
        })?;
        info!(path = %artifact.path.display(), "Stage 5 complete: summary written");

        Ok(Reply::Text(format!(
            "Daily summary created at {}\n\n{}",
            artifact.path.display(),
            artifact.content
        )))
    }
}
