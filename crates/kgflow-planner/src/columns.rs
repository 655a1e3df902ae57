//! Column-set tracking through a plan.
//!
//! Walks the enabled steps and applies each operation's effect on column
//! names, so callers can see the shape of the final table without running it.
//! This is a name-level model only; types and row counts are the engine's.

use crate::step::{GraphElement, Operation, PlanStep};

/// Columns produced by `unpack_graph` for node elements.
pub const UNPACKED_NODE_COLUMNS: [&str; 7] = [
    "id",
    "label",
    "type",
    "description",
    "human_readable_id",
    "graph_embedding",
    "source_id",
];

fn push_unique(columns: &mut Vec<String>, name: &str) {
    if !columns.iter().any(|c| c == name) {
        columns.push(name.to_string());
    }
}

/// Apply one operation's effect to `columns`.
pub fn apply(op: &Operation, columns: &mut Vec<String>) {
    use Operation::*;
    match op {
        DetectGraphColumn { to, .. } => push_unique(columns, to),
        Filter { .. } | Dedupe { .. } => {}
        UnpackGraph {
            element: GraphElement::Nodes,
            ..
        } => {
            *columns = UNPACKED_NODE_COLUMNS.iter().map(|s| s.to_string()).collect();
        }
        Rename { columns: renames } => {
            for c in columns.iter_mut() {
                if let Some(new_name) = renames.get(c.as_str()) {
                    *c = new_name.clone();
                }
            }
        }
        Select { columns: keep } => {
            *columns = keep
                .iter()
                .filter(|k| columns.contains(k))
                .cloned()
                .collect();
        }
        Drop { columns: dropped } => columns.retain(|c| !dropped.contains(c)),
        TextSplit { to, .. } => push_unique(columns, to),
        // Vector-store embeddings are persisted externally, not added inline.
        TextEmbed { to, options, .. } => {
            if !options.uses_vector_store() {
                push_unique(columns, to);
            }
        }
        Merge {
            columns: sources,
            to,
            preserve_source,
            ..
        } => {
            if !preserve_source {
                columns.retain(|c| !sources.contains(c));
            }
            push_unique(columns, to);
        }
    }
}

/// Column names after every enabled step in `steps` has run.
pub fn output_columns(steps: &[PlanStep]) -> Vec<String> {
    let mut columns = Vec::new();
    for step in steps.iter().filter(|s| s.enabled) {
        apply(&step.operation, &mut columns);
    }
    columns
}
