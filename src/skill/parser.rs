//! SKILL.md parsing: frontmatter metadata plus the raw document.

use crate::error::ApiError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Metadata block from a skill's frontmatter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillMetadata {
    /// Phrases that route a query to this skill (case-insensitive substring)
    #[serde(default)]
    pub triggers: Vec<String>,

    /// Tool that runs this skill as a workflow
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requires_tool: Option<String>,

    /// Any other frontmatter keys, kept verbatim
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

/// A loaded skill. `content` is the full document text, frontmatter included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    pub name: String,
    pub content: String,
    pub metadata: SkillMetadata,
}

impl Skill {
    /// True when any trigger (lower-cased) is a substring of the lower-cased query.
    pub fn matches(&self, query: &str) -> bool {
        let query_lower = query.to_lowercase();
        self.metadata
            .triggers
            .iter()
            .filter(|t| !t.trim().is_empty())
            .any(|t| query_lower.contains(&t.to_lowercase()))
    }

    pub fn requires_tool(&self) -> Option<&str> {
        self.metadata.requires_tool.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.metadata.extra.get("description").and_then(|v| v.as_str())
    }
}

/// Parse a SKILL.md document.
///
/// Frontmatter is recognised only when the document starts with `---\n` and a
/// later `\n---` closes it; anything else has empty metadata.
pub fn parse_skill(name: &str, content: &str) -> Result<Skill, ApiError> {
    let metadata = match frontmatter(content) {
        Some(block) if !block.trim().is_empty() => {
            serde_yaml::from_str::<SkillMetadata>(block).map_err(|e| ApiError::SkillParse {
                name: name.to_string(),
                reason: format!("invalid frontmatter: {}", e),
            })?
        }
        _ => SkillMetadata::default(),
    };

    Ok(Skill {
        name: name.to_string(),
        content: content.to_string(),
        metadata,
    })
}

fn frontmatter(content: &str) -> Option<&str> {
    let rest = content.strip_prefix("---\n")?;
    let end = rest.find("\n---")?;
    Some(&rest[..end])
}
