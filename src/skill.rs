//! Skill Store
//!
//! Skills are named capability documents at `<skills_dir>/<name>/SKILL.md`: an
//! optional YAML frontmatter block followed by free-text instructions. They are
//! read from disk on every lookup and never mutated.

pub mod parser;
pub mod store;

pub use parser::{parse_skill, Skill, SkillMetadata};
pub use store::{SkillStore, SKILL_FILE};
