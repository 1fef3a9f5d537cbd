//! Filesystem-backed skill lookup and enumeration.

use super::parser::{parse_skill, Skill};
use crate::error::ApiError;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const SKILL_FILE: &str = "SKILL.md";

/// Read-only view over a skills directory.
#[derive(Debug, Clone)]
pub struct SkillStore {
    root: PathBuf,
}

impl SkillStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn skill_path(&self, name: &str) -> PathBuf {
        self.root.join(name).join(SKILL_FILE)
    }

    /// Load a skill by name. A missing file is `Ok(None)`, not an error.
    pub fn load(&self, name: &str) -> Result<Option<Skill>, ApiError> {
        let path = self.skill_path(name);
        if !path.is_file() {
            warn!(skill = name, path = %path.display(), "Skill not found");
            return Ok(None);
        }

        let content = std::fs::read_to_string(&path).map_err(|e| ApiError::SkillParse {
            name: name.to_string(),
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;
        parse_skill(name, &content).map(Some)
    }

    /// Load several skills in the given order, skipping any that are missing or broken.
    pub fn load_many<S: AsRef<str>>(&self, names: &[S]) -> Vec<Skill> {
        let mut skills = Vec::with_capacity(names.len());
        for name in names {
            match self.load(name.as_ref()) {
                Ok(Some(skill)) => skills.push(skill),
                Ok(None) => {}
                Err(e) => warn!("Skipping skill: {}", e),
            }
        }
        skills
    }

    /// Names of every skill directory, sorted.
    pub fn names(&self) -> Vec<String> {
        let entries = match std::fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(
                    "Failed to read skills directory {}: {}",
                    self.root.display(),
                    e
                );
                return Vec::new();
            }
        };

        let mut names: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_dir())
            .filter_map(|entry| entry.file_name().to_str().map(str::to_string))
            .collect();
        names.sort();
        names
    }

    /// Every loadable skill in directory-name order.
    pub fn list(&self) -> Vec<Skill> {
        let mut skills = Vec::new();
        for name in self.names() {
            if !self.skill_path(&name).is_file() {
                debug!("Directory {} has no {}", name, SKILL_FILE);
                continue;
            }
            match self.load(&name) {
                Ok(Some(skill)) => skills.push(skill),
                Ok(None) => {}
                Err(e) => warn!("Skipping skill: {}", e),
            }
        }
        skills
    }
}
