//! Stage 2 and topic derivation for stage 4.

use crate::workflow::daily_summary::discover::file_name;
use std::path::PathBuf;
use tracing::warn;

/// Lines of context kept on each side of a tag line.
pub const CONTEXT_RADIUS: usize = 3;

/// Shortest topic a rule may produce before the next rule is tried.
pub const MIN_TOPIC_LEN: usize = 10;

const FILLER_PREFIXES: [&str; 4] = ["for us is to ", "for is to ", "for us ", "for "];
const CONNECTIVES: [&str; 4] = [" for ", " about ", " on ", " of "];

/// A tagged excerpt that needs external lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResearchItem {
    /// Source file name
    pub file: String,
    /// Tag line plus up to three lines on either side
    pub context: String,
    /// The tag line itself
    pub line: String,
}

/// Items for every marker occurrence in `content`, in line order.
pub fn extract_items(file: &str, content: &str, marker: &str) -> Vec<ResearchItem> {
    let lines: Vec<&str> = content.split('\n').collect();
    lines
        .iter()
        .enumerate()
        .filter(|(_, line)| line.contains(marker))
        .map(|(i, line)| {
            let start = i.saturating_sub(CONTEXT_RADIUS);
            let end = (i + CONTEXT_RADIUS + 1).min(lines.len());
            ResearchItem {
                file: file.to_string(),
                context: lines[start..end].join("\n"),
                line: line.to_string(),
            }
        })
        .collect()
}

/// Scan files in order; unreadable or non-UTF-8 files are skipped.
pub fn scan_files(files: &[PathBuf], marker: &str) -> Vec<ResearchItem> {
    let mut items = Vec::new();
    for path in files {
        match std::fs::read_to_string(path) {
            Ok(content) => items.extend(extract_items(&file_name(path), &content, marker)),
            Err(e) => warn!(path = %path.display(), error = %e, "Skipping unreadable note"),
        }
    }
    items
}

/// One step of the topic cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopicRule {
    /// Text after the last marker, minus leading filler phrases
    TextAfterMarker,
    /// Text before the first marker, after the last occurrence of a connective
    ConnectiveBeforeMarker,
}

impl TopicRule {
    /// Evaluation order
    pub const CASCADE: [TopicRule; 2] = [
        TopicRule::TextAfterMarker,
        TopicRule::ConnectiveBeforeMarker,
    ];

    /// Raw candidate from `line`, before normalization.
    pub fn apply(&self, line: &str, marker: &str) -> Option<String> {
        match self {
            TopicRule::TextAfterMarker => {
                let (_, after) = line.rsplit_once(marker)?;
                Some(strip_filler(after.trim()).to_string())
            }
            TopicRule::ConnectiveBeforeMarker => {
                let (before, _) = line.split_once(marker)?;
                let before = before.trim();
                let keyword = CONNECTIVES.iter().find(|k| before.contains(*k))?;
                let (_, fragment) = before.rsplit_once(keyword)?;
                Some(fragment.to_string())
            }
        }
    }
}

fn strip_filler(text: &str) -> &str {
    for prefix in FILLER_PREFIXES {
        let matches = text
            .get(..prefix.len())
            .map_or(false, |head| head.eq_ignore_ascii_case(prefix));
        if matches {
            return &text[prefix.len()..];
        }
    }
    text
}

fn normalize(candidate: &str) -> String {
    candidate.trim().trim_start_matches('#').trim().to_string()
}

/// File name with `.md` and possessive `'s` removed.
pub fn file_name_topic(file: &str) -> String {
    file.replace(".md", "").replace("'s", "").trim().to_string()
}

/// Search topic for an item: first rule giving a long enough topic, else the file name.
pub fn derive_topic(item: &ResearchItem, marker: &str) -> String {
    TopicRule::CASCADE
        .iter()
        .filter_map(|rule| rule.apply(&item.line, marker))
        .map(|candidate| normalize(&candidate))
        .find(|topic| topic.chars().count() >= MIN_TOPIC_LEN)
        .unwrap_or_else(|| file_name_topic(&item.file))
}

/// Query sent to the search tool for a topic.
pub fn search_query(topic: &str) -> String {
    format!("Find information about: {}", topic)
}
