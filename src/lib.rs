//! Skillmux: Trigger-Routed Agents with Minimal Skill Context
//!
//! Routes each query to one agent or to a skill-backed workflow tool. Agents
//! receive only the skills they declare; workflows drive fixed multi-stage
//! pipelines through the same routing runtime.

pub mod agent;
pub mod config;
pub mod error;
pub mod logging;
pub mod orchestrator;
pub mod provider;
pub mod search;
pub mod skill;
pub mod tool;
pub mod tooling;
pub mod workflow;

pub use error::ApiError;
pub use orchestrator::{Orchestrator, Reply, Selection};
