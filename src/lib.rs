#![forbid(unsafe_code)]
//! kgflow: workflow planning for knowledge-graph table pipelines.
//!
//! Facade over the workspace crates; see `kgflow-planner` for the planners
//! and `kgflow-core` for configuration and shared types.

pub use kgflow_core;
pub use kgflow_planner;

pub use kgflow_core::config::{EmbedConfig, RunConfig};
pub use kgflow_planner::{build_plan, Plan, StepDescriptor};
