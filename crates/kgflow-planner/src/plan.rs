//! `Plan`: an ordered, immutable sequence of steps for one workflow.

use std::time::{SystemTime, UNIX_EPOCH};

use kgflow_core::config::RunConfig;
use kgflow_core::error::{Error, Result};
use kgflow_core::hash::{hash_serde, Hash256};
use kgflow_core::id::StepId;
use kgflow_core::manifest::PlanManifest;
use serde::{Deserialize, Serialize};

use crate::columns;
use crate::descriptor::StepDescriptor;
use crate::step::{Operation, PlanStep};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub workflow: String,
    pub steps: Vec<PlanStep>,
}

impl Plan {
    pub fn new(workflow: impl Into<String>) -> Self {
        Self {
            workflow: workflow.into(),
            steps: Vec::new(),
        }
    }

    /// Append a step; its id is its 1-based position.
    pub fn push(&mut self, operation: Operation, enabled: bool) -> &mut PlanStep {
        let id = StepId::new(self.steps.len() as u64 + 1);
        self.steps.push(PlanStep {
            id,
            operation,
            enabled,
            input: None,
        });
        let last = self.steps.len() - 1;
        &mut self.steps[last]
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn step(&self, id: StepId) -> Option<&PlanStep> {
        self.steps.iter().find(|s| s.id == id)
    }

    pub fn enabled_steps(&self) -> impl Iterator<Item = &PlanStep> {
        self.steps.iter().filter(|s| s.enabled)
    }

    /// Lower every step, disabled ones included, to engine descriptors.
    pub fn descriptors(&self) -> Vec<StepDescriptor> {
        self.steps.iter().map(StepDescriptor::from).collect()
    }

    /// Column names of the final table, assuming every enabled step succeeds.
    pub fn output_columns(&self) -> Vec<String> {
        columns::output_columns(&self.steps)
    }

    /// Stable digest of the step sequence.
    pub fn fingerprint(&self) -> Result<Hash256> {
        hash_serde(&self.steps)
    }

    /// Check structural invariants:
    /// - step ids are 1..=n in order
    /// - exactly one step carries an input reference, and it is enabled
    /// - that step is the first one that reads upstream data
    pub fn validate(&self) -> Result<()> {
        for (idx, step) in self.steps.iter().enumerate() {
            if step.id.get() != idx as u64 + 1 {
                return Err(Error::Invariant(format!(
                    "step at position {} has id {}",
                    idx + 1,
                    step.id
                )));
            }
        }

        let with_input: Vec<&PlanStep> = self.steps.iter().filter(|s| s.input.is_some()).collect();
        let only = match with_input.as_slice() {
            [only] => *only,
            other => {
                return Err(Error::Invariant(format!(
                    "expected exactly one step with an input reference, found {}",
                    other.len()
                )))
            }
        };
        if !only.enabled {
            return Err(Error::Invariant(format!(
                "{} carries the upstream input but is disabled",
                only.id
            )));
        }

        match self.steps.iter().find(|s| s.operation.reads_upstream()) {
            Some(first) if first.id == only.id => Ok(()),
            Some(first) => Err(Error::Invariant(format!(
                "{} carries the upstream input, but the first {} is {}",
                only.id,
                first.operation.name(),
                first.id
            ))),
            None => Err(Error::Invariant(format!(
                "{} carries the upstream input but no step reads upstream data",
                only.id
            ))),
        }
    }

    /// Compilation record for this plan.
    pub fn manifest(&self, config: &RunConfig) -> Result<PlanManifest> {
        let created_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        let manifest = PlanManifest::new(
            self.workflow.as_str(),
            self.fingerprint()?,
            hash_serde(config)?,
            created_ms,
        );
        Ok(manifest.with_step_counts(self.len(), self.enabled_steps().count()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::step::{ColumnRef, GraphElement, InputRef};

    fn drop_op(col: &str) -> Operation {
        Operation::Drop {
            columns: vec![col.into()],
        }
    }

    fn unpack_op() -> Operation {
        Operation::UnpackGraph {
            column: ColumnRef::Name("graph".into()),
            element: GraphElement::Nodes,
        }
    }

    fn upstream() -> Option<InputRef> {
        Some(InputRef::Workflow("up".into()))
    }

    #[test]
    fn push_assigns_sequential_ids() {
        let mut plan = Plan::new("w");
        plan.push(drop_op("a"), true);
        plan.push(drop_op("b"), false);
        assert_eq!(plan.len(), 2);
        assert_eq!(plan.steps[1].id, StepId::new(2));
        assert_eq!(plan.enabled_steps().count(), 1);
    }

    #[test]
    fn validate_requires_exactly_one_input() {
        let mut plan = Plan::new("w");
        plan.push(drop_op("a"), true);
        plan.push(unpack_op(), true);
        assert!(matches!(plan.validate(), Err(Error::Invariant(_))));

        plan.steps[1].input = upstream();
        assert!(plan.validate().is_ok());

        plan.push(unpack_op(), true).input = upstream();
        assert!(plan.validate().is_err());
    }

    #[test]
    fn validate_rejects_disabled_input_step() {
        let mut plan = Plan::new("w");
        plan.push(unpack_op(), false).input = upstream();
        assert!(plan.validate().is_err());
    }

    #[test]
    fn validate_rejects_input_off_the_first_unpack() {
        let mut plan = Plan::new("w");
        plan.push(drop_op("a"), true).input = upstream();
        plan.push(unpack_op(), true);
        let err = plan.validate().unwrap_err();
        assert!(matches!(err, Error::Invariant(_)));
        assert!(err.to_string().contains("unpack_graph"));

        // A later unpack cannot take the input past an earlier one.
        let mut plan = Plan::new("w");
        plan.push(unpack_op(), true);
        plan.push(unpack_op(), true).input = upstream();
        assert!(plan.validate().is_err());

        // No data-consuming step at all.
        let mut plan = Plan::new("w");
        plan.push(drop_op("a"), true).input = upstream();
        assert!(plan.validate().is_err());
    }

    #[test]
    fn manifest_counts_steps() {
        let mut plan = Plan::new("w");
        plan.push(drop_op("a"), true);
        plan.push(drop_op("b"), false);
        let m = plan.manifest(&RunConfig::default()).unwrap();
        assert_eq!(m.workflow, "w");
        assert_eq!((m.total_steps, m.enabled_steps), (2, 1));
        assert_eq!(m.plan_hash, plan.fingerprint().unwrap());
    }
}
