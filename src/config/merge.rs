//! Merge policy and source composition.

mod merge_policy;
pub mod service;
