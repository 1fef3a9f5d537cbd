//! Workflow tools: fixed multi-stage procedures driven through the runtime.

pub mod daily_summary;

pub use daily_summary::{DailySummaryTool, OBSIDIAN_TOOL};
