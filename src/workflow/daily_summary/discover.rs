//! Stage 1: classify note files by today's creation and modification dates.

use super::WORKFLOW;
use crate::error::ApiError;
use chrono::{DateTime, Local, NaiveDate};
use std::fs::Metadata;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Classification of one file for a run date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileClass {
    CreatedToday,
    ModifiedToday,
    Untouched,
}

/// Created-today wins over modified-today; modified-today requires a creation
/// date strictly before `today`.
pub fn classify(created: NaiveDate, modified: NaiveDate, today: NaiveDate) -> FileClass {
    if created == today {
        FileClass::CreatedToday
    } else if created < today && modified == today {
        FileClass::ModifiedToday
    } else {
        FileClass::Untouched
    }
}

/// Files touched on the run date, in sorted walk order. The two lists are disjoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodaysFiles {
    pub created: Vec<PathBuf>,
    pub modified: Vec<PathBuf>,
}

impl TodaysFiles {
    pub fn created_names(&self) -> Vec<String> {
        file_names(&self.created)
    }

    pub fn modified_names(&self) -> Vec<String> {
        file_names(&self.modified)
    }
}

pub(crate) fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn file_names(paths: &[PathBuf]) -> Vec<String> {
    paths.iter().map(|p| file_name(p)).collect()
}

fn local_date(time: SystemTime) -> NaiveDate {
    DateTime::<Local>::from(time).date_naive()
}

/// Best available creation-time signal: birth time, else inode change time.
fn creation_date(metadata: &Metadata) -> Option<NaiveDate> {
    if let Ok(created) = metadata.created() {
        return Some(local_date(created));
    }
    change_time_date(metadata)
}

#[cfg(unix)]
fn change_time_date(metadata: &Metadata) -> Option<NaiveDate> {
    use chrono::TimeZone;
    use std::os::unix::fs::MetadataExt;
    Local
        .timestamp_opt(metadata.ctime(), metadata.ctime_nsec() as u32)
        .single()
        .map(|dt| dt.date_naive())
}

#[cfg(not(unix))]
fn change_time_date(metadata: &Metadata) -> Option<NaiveDate> {
    metadata.modified().ok().map(local_date)
}

fn unlistable_root(root: &Path, error: impl std::fmt::Display) -> ApiError {
    ApiError::workflow(
        WORKFLOW,
        "discover",
        format!("Cannot list note root {}: {}", root.display(), error),
    )
}

/// Walk `root` for `*.md` files and sort them into created/modified today.
///
/// Names containing `summary_marker` are skipped. Unreadable entries below the
/// root are skipped with a warning; a missing or unlistable root is an error.
pub fn discover(
    root: &Path,
    today: NaiveDate,
    summary_marker: &str,
) -> Result<TodaysFiles, ApiError> {
    if !root.is_dir() {
        return Err(ApiError::workflow(
            WORKFLOW,
            "discover",
            format!("Note root {} is not a directory", root.display()),
        ));
    }
    std::fs::read_dir(root).map_err(|e| unlistable_root(root, e))?;

    let mut files = TodaysFiles::default();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => return Err(unlistable_root(root, e)),
            Err(e) => {
                warn!(error = %e, "Skipping unreadable entry");
                continue;
            }
        };
        let path = entry.path();
        let is_markdown = path.extension().and_then(|e| e.to_str()) == Some("md");
        if !entry.file_type().is_file() || !is_markdown {
            continue;
        }
        if file_name(path).contains(summary_marker) {
            continue;
        }

        let metadata = match entry.metadata() {
            Ok(metadata) => metadata,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Skipping file without metadata");
                continue;
            }
        };
        let created = creation_date(&metadata);
        let modified = metadata.modified().ok().map(local_date);
        let (created, modified) = match (created, modified) {
            (Some(c), Some(m)) => (c, m),
            _ => {
                warn!(path = %path.display(), "Skipping file without usable timestamps");
                continue;
            }
        };

        match classify(created, modified, today) {
            FileClass::CreatedToday => files.created.push(path.to_path_buf()),
            FileClass::ModifiedToday => files.modified.push(path.to_path_buf()),
            FileClass::Untouched => {}
        }
    }

    debug!(
        created = files.created.len(),
        modified = files.modified.len(),
        "Discovered today's files"
    );
    Ok(files)
}
