//! Tool Registry
//!
//! Named multi-step procedures that run outside a plain prompt/response
//! exchange. Tools reach back into routing only through [`AgentRuntime`].

pub mod contract;
pub mod registry;

pub use contract::{AgentRuntime, Tool, ToolRequest};
pub use registry::ToolRegistry;
