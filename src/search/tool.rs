//! Search-and-synthesize tool.

use crate::error::ApiError;
use crate::orchestrator::Reply;
use crate::search::contract::{SearchBackend, SearchHit};
use crate::tool::{AgentRuntime, Tool, ToolRequest};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

/// Registration name
pub const WEB_SEARCH_TOOL: &str = "web_search_tool";

/// Agent that synthesizes search results
pub const RESEARCH_AGENT: &str = "research_agent";

/// Request keyword overriding the configured result count
pub const MAX_RESULTS_ARG: &str = "max_results";

/// Render hits as a markdown block for a model prompt.
pub fn format_results(query: &str, hits: &[SearchHit]) -> String {
    let mut formatted = format!("# Web Search Results for: {}\n\n", query);
    for (i, hit) in hits.iter().enumerate() {
        formatted.push_str(&format!("## Result {}: {}\n", i + 1, hit.title));
        formatted.push_str(&format!("URL: {}\n", hit.url));
        formatted.push_str(&format!("Summary: {}\n\n", hit.snippet));
    }
    formatted
}

fn synthesis_prompt(search_context: &str) -> String {
    format!(
        "Based on the following web search results, provide a comprehensive answer.\n\n\
         {}\n\n\
         Task: Synthesize this information into a clear, organized summary with:\n\
         1. Key findings\n\
         2. Current state/trends\n\
         3. Relevant applications\n\
         4. Important sources (with URLs)\n\n\
         Be specific and cite your sources.",
        search_context
    )
}

/// Searches the web and asks the research agent to synthesize the hits.
pub struct WebSearchTool {
    backend: Arc<dyn SearchBackend>,
    max_results: usize,
}

impl WebSearchTool {
    pub fn new(backend: Arc<dyn SearchBackend>, max_results: usize) -> Self {
        Self {
            backend,
            max_results,
        }
    }

    fn max_results_for(&self, request: &ToolRequest) -> usize {
        match request.extra.get(MAX_RESULTS_ARG) {
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    warn!(value = %raw, "Ignoring invalid max_results");
                    self.max_results
                }
            },
            None => self.max_results,
        }
    }
}

#[async_trait]
impl Tool for WebSearchTool {
    async fn execute(
        &self,
        runtime: &dyn AgentRuntime,
        request: ToolRequest,
    ) -> Result<Reply, ApiError> {
        let query = request.query.as_str();
        let max_results = self.max_results_for(&request);
        let hits = match self.backend.search(query, max_results).await {
            Ok(hits) => hits,
            Err(e) => {
                let reason = match e {
                    ApiError::SearchError(reason) => reason,
                    other => other.to_string(),
                };
                warn!(query = %query, error = %reason, "Web search failed");
                return Ok(Reply::Failure(format!(
                    "Search for '{}' failed: {}",
                    query, reason
                )));
            }
        };
        info!(query = %query, hits = hits.len(), "Web search returned results");

        let search_context = format_results(query, &hits);
        match runtime
            .invoke_agent(
                RESEARCH_AGENT,
                &synthesis_prompt(&search_context),
                Some(&request.skills),
                None,
            )
            .await
        {
            Ok(synthesis) => Ok(Reply::Text(synthesis)),
            Err(e) => {
                warn!(error = %e, "Search synthesis failed; returning raw results");
                Ok(Reply::Text(format!(
                    "{}\n\nNote: Could not synthesize results (Error: {})",
                    search_context, e
                )))
            }
        }
    }
}
