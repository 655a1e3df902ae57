//! Compilation manifest for audit/replay.
//!
//! A manifest is emitted each time a plan is compiled; two manifests with the
//! same `plan_hash` describe byte-identical plans.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::hash::Hash256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ManifestId(pub Uuid);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanManifest {
    pub id: ManifestId,

    /// Workflow the plan was compiled for (e.g. `create_final_entities`).
    pub workflow: String,

    /// Stable hash of the emitted step sequence.
    pub plan_hash: Hash256,

    /// Stable hash of the run configuration the plan was built from.
    pub config_hash: Hash256,

    /// Planner version string for provenance.
    pub planner_version: String,

    /// Steps emitted / steps enabled.
    pub total_steps: usize,
    pub enabled_steps: usize,

    /// Milliseconds since Unix epoch (UTC).
    pub created_ms: u64,
}

impl PlanManifest {
    pub fn new(
        workflow: impl Into<String>,
        plan_hash: Hash256,
        config_hash: Hash256,
        created_ms: u64,
    ) -> Self {
        Self {
            id: ManifestId(Uuid::new_v4()),
            workflow: workflow.into(),
            plan_hash,
            config_hash,
            planner_version: crate::VERSION.to_string(),
            total_steps: 0,
            enabled_steps: 0,
            created_ms,
        }
    }

    pub fn with_step_counts(mut self, total: usize, enabled: usize) -> Self {
        self.total_steps = total;
        self.enabled_steps = enabled;
        self
    }
}
