//! Daily summary document: template rendering, agent instructions and splicing.

use chrono::NaiveDate;
use std::path::{Path, PathBuf};

pub const CREATED_HEADING: &str = "## Files Created Today";
pub const MODIFIED_HEADING: &str = "## Files Modified Today";
pub const RESEARCH_HEADING: &str = "## Open Research Topics";

const EMPTY_PLACEHOLDER: &str = "None";
const RESEARCH_PENDING: &str = "Will be added by research agent";

/// Final document and where it is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyArtifact {
    pub path: PathBuf,
    pub content: String,
}

impl DailyArtifact {
    /// Write the content, replacing any earlier file at the path.
    pub fn write(&self) -> std::io::Result<()> {
        std::fs::write(&self.path, &self.content)
    }
}

/// `<root>/<YYYY-MM-DD>_Daily Summary.md`
pub fn artifact_path(root: &Path, date: NaiveDate) -> PathBuf {
    root.join(format!("{}_Daily Summary.md", date.format("%Y-%m-%d")))
}

pub fn title(date: NaiveDate) -> String {
    format!("# {} Daily Summary", date.format("%Y-%m-%d"))
}

/// Markdown link list with URL-escaped targets, or `None` when empty.
pub fn render_file_list(names: &[String]) -> String {
    if names.is_empty() {
        return EMPTY_PLACEHOLDER.to_string();
    }
    names
        .iter()
        .map(|name| format!("- [{}]({})", name, urlencoding::encode(name)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// The base draft exactly as the documentation agent is told to reproduce it.
pub fn render_base_document(
    date: NaiveDate,
    created: &[String],
    modified: &[String],
    has_research: bool,
) -> String {
    format!(
        "{}\n\n{}\n{}\n\n{}\n{}\n\n{}\n{}",
        title(date),
        CREATED_HEADING,
        render_file_list(created),
        MODIFIED_HEADING,
        render_file_list(modified),
        RESEARCH_HEADING,
        if has_research {
            RESEARCH_PENDING
        } else {
            EMPTY_PLACEHOLDER
        }
    )
}

pub fn draft_instruction(date: NaiveDate, base_document: &str) -> String {
    format!(
        "Create the daily summary for {}.\n\n\
         Use this exact structure and content:\n\n\
         {}\n\n\
         IMPORTANT: Use the exact text above. Do not add extra sections or commentary.",
        date.format("%Y-%m-%d"),
        base_document
    )
}

/// Accept a draft only when it reproduces the rendered template, surrounding
/// whitespace aside.
pub fn accept_draft(base_document: &str, response: &str) -> bool {
    response.trim() == base_document.trim()
}

/// Research sections joined for insertion under the research heading.
pub fn join_sections(sections: &[String]) -> String {
    sections.join("\n\n")
}

pub fn finalize_instruction(draft: &str, research_content: &str) -> String {
    format!(
        "Update the daily summary by replacing the Open Research Topics section.\n\n\
         Base summary:\n{}\n\n\
         Replace the \"{}\" section with this exact content:\n{}\n{}\n\n\
         Keep everything else exactly the same. Output the complete updated document.",
        draft, RESEARCH_HEADING, RESEARCH_HEADING, research_content
    )
}

/// Replace the research section body of `draft` with `research_content`.
///
/// The section runs from its heading to the next top-level `## ` heading that
/// follows it, or to the end of the document. Without a heading the section is
/// appended.
pub fn splice_research_section(draft: &str, research_content: &str) -> String {
    let replacement = format!("{}\n{}", RESEARCH_HEADING, research_content);
    let start = match draft.find(RESEARCH_HEADING) {
        Some(start) => start,
        None => return format!("{}\n\n{}", draft.trim_end(), replacement),
    };
    let body_start = start + RESEARCH_HEADING.len();
    let tail = draft[body_start..]
        .find("\n## ")
        .map(|pos| &draft[body_start + pos..])
        .unwrap_or("");
    format!("{}{}{}", &draft[..start], replacement, tail)
}

/// Accept a finalize response only when it equals the local splice, surrounding
/// whitespace aside.
pub fn accept_finalized(draft: &str, response: &str, research_content: &str) -> bool {
    response.trim() == splice_research_section(draft, research_content).trim()
}
