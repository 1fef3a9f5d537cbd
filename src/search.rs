//! Web search
//!
//! A search backend returns ordered hits for a query; [`WebSearchTool`] turns
//! them into a synthesized answer through the research agent.

pub mod contract;
pub mod duckduckgo;
pub mod tool;

pub use contract::{SearchBackend, SearchHit};
pub use duckduckgo::DuckDuckGoBackend;
pub use tool::{format_results, WebSearchTool, MAX_RESULTS_ARG, RESEARCH_AGENT, WEB_SEARCH_TOOL};

/// DuckDuckGo HTML results endpoint
pub const DEFAULT_DUCKDUCKGO_ENDPOINT: &str = "https://html.duckduckgo.com/html/";
