//! Integration tests: routing, the daily summary pipeline and the CLI surface

mod cli;
mod daily_summary;
mod routing;
mod support;
