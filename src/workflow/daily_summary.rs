//! Daily summary workflow
//!
//! Five stages run once per execution, in order: discover today's notes,
//! extract research tags, draft the base document, research each tag, and
//! finalize by writing the dated summary into the note root. Stages one to
//! three are fatal on failure; research failures stay local to their item.

pub mod discover;
pub mod document;
pub mod pipeline;
pub mod research;

pub use discover::{classify, discover, FileClass, TodaysFiles};
pub use document::{render_base_document, splice_research_section, DailyArtifact};
pub use pipeline::{finalize_document, research_sections, DailySummaryTool};
pub use research::{derive_topic, extract_items, ResearchItem, TopicRule};

/// Registration name of the workflow tool
pub const OBSIDIAN_TOOL: &str = "obsidian_tool";

/// Agent that drafts and finalizes the document
pub const DOC_AGENT: &str = "doc_agent";

pub const DAILY_SUMMARY_SKILL: &str = "daily-summary";
pub const OPEN_RESEARCH_SKILL: &str = "open-research";
pub const WEB_SEARCH_SKILL: &str = "web-search";

const WORKFLOW: &str = "daily-summary";
