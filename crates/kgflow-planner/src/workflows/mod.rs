//! Workflow planners and their registry.
//!
//! A workflow turns a `RunConfig` into a `Plan`. Planning is pure: no I/O and
//! no validation of provider credentials; those belong to the engine.

pub mod create_final_entities;

use kgflow_core::config::RunConfig;

use crate::plan::Plan;
use crate::step::InputRef;

pub use create_final_entities::CreateFinalEntities;

/// Trait that every workflow planner implements.
///
/// Invariants:
/// - `build` must be deterministic given the same config.
/// - the returned plan passes `Plan::validate`.
pub trait Workflow: Send + Sync + 'static {
    /// Stable workflow name (also the plan's `workflow` field).
    fn name(&self) -> &'static str;

    /// Upstream workflows whose outputs must exist before the plan runs.
    fn dependencies(&self) -> Vec<InputRef>;

    fn build(&self, config: &RunConfig) -> Plan;
}

static WORKFLOWS: &[&dyn Workflow] = &[&CreateFinalEntities];

/// Look up a workflow by name.
pub fn find(name: &str) -> Option<&'static dyn Workflow> {
    WORKFLOWS.iter().copied().find(|w| w.name() == name)
}

/// Names of every registered workflow.
pub fn names() -> impl Iterator<Item = &'static str> {
    WORKFLOWS.iter().map(|w| w.name())
}
