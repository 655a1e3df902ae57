//! Generic step descriptors: the shape handed to the execution engine.
//!
//! The engine dispatches on `operation_name` and reads `parameters` without
//! knowing anything about entities. Lowering from the typed `Operation` is
//! total; every variant has exactly one descriptor form.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::step::{ColumnRef, FilterCriterion, Operation, PlanStep};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepDescriptor {
    pub operation_name: String,
    pub enabled: bool,
    pub parameters: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_reference: Option<String>,
}

impl From<&PlanStep> for StepDescriptor {
    fn from(step: &PlanStep) -> Self {
        Self {
            operation_name: step.operation.name().to_string(),
            enabled: step.enabled,
            parameters: parameters(&step.operation),
            input_reference: step.input.as_ref().map(|r| r.to_string()),
        }
    }
}

fn criteria_value(criteria: &[FilterCriterion]) -> Value {
    Value::Array(
        criteria
            .iter()
            .map(|c| json!({"type": "value", "operator": c.operator()}))
            .collect(),
    )
}

fn column_value(column: &ColumnRef) -> Value {
    match column {
        ColumnRef::Name(n) => Value::String(n.clone()),
        ColumnRef::Deferred(d) => json!(d),
    }
}

fn into_map(v: Value) -> Map<String, Value> {
    match v {
        Value::Object(m) => m,
        _ => Map::new(),
    }
}

/// Engine-facing parameter mapping for one operation.
pub fn parameters(op: &Operation) -> Map<String, Value> {
    use Operation::*;
    match op {
        DetectGraphColumn { candidates, to } => into_map(json!({
            "candidates": candidates,
            "to": to,
        })),
        Filter { column, criteria } => into_map(json!({
            "column": column,
            "criteria": criteria_value(criteria),
        })),
        UnpackGraph { column, element } => into_map(json!({
            "column": column_value(column),
            "type": element.as_str(),
        })),
        Rename { columns } => into_map(json!({ "columns": columns })),
        Select { columns } | Dedupe { columns } | Drop { columns } => {
            into_map(json!({ "columns": columns }))
        }
        TextSplit {
            column,
            separator,
            to,
        } => into_map(json!({
            "separator": separator,
            "column": column,
            "to": to,
        })),
        TextEmbed {
            embedding_name,
            column,
            to,
            options,
        } => {
            let mut params = into_map(json!({
                "embedding_name": embedding_name,
                "column": column,
                "to": to,
            }));
            // Options are spread last and win on key collisions.
            params.extend(options.to_parameters());
            params
        }
        Merge {
            strategy,
            columns,
            to,
            delimiter,
            preserve_source,
        } => into_map(json!({
            "strategy": strategy.as_str(),
            "columns": columns,
            "to": to,
            "delimiter": delimiter,
            "preserveSource": preserve_source,
        })),
    }
}
