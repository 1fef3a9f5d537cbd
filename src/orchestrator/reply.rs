//! Result text of a routed call.

use std::fmt;

/// Output of `orchestrate`, `execute_tool` and tools.
///
/// `Failure` is a reportable condition rendered to the user, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    Failure(String),
}

impl Reply {
    pub fn text(&self) -> &str {
        match self {
            Reply::Text(text) | Reply::Failure(text) => text,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            Reply::Text(text) | Reply::Failure(text) => text,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Reply::Failure(_))
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}
