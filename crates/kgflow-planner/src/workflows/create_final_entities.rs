//! `create_final_entities`: entity graph → clean entities table.
//!
//! Reads the output of `create_base_entity_graph`, unpacks its nodes, tidies
//! the columns, and optionally embeds names and name+description pairs.
//!
//! Every step is always emitted; embedding-related steps are only *enabled*
//! according to the run configuration, so the engine can still show the full
//! intended pipeline.

use std::collections::BTreeMap;

use kgflow_core::config::RunConfig;

use crate::plan::Plan;
use crate::resolve::{GRAPH_COLUMN_CANDIDATES, GRAPH_COLUMN_MARKER};
use crate::step::{
    ColumnRef, DeferredParam, FilterCriterion, GraphElement, InputRef, MergeStrategy, Operation,
};
use crate::workflows::Workflow;

pub const WORKFLOW_NAME: &str = "create_final_entities";

/// Upstream workflow whose output step 3 reads.
pub const UPSTREAM_WORKFLOW: &str = "create_base_entity_graph";

pub const NAME_EMBEDDING: &str = "entity_name";
pub const NAME_DESCRIPTION_EMBEDDING: &str = "entity_name_description";

/// Workflows that must have materialized their output before this plan runs.
pub fn dependencies() -> Vec<InputRef> {
    vec![InputRef::Workflow(UPSTREAM_WORKFLOW.to_string())]
}

fn strings(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

fn rename(from: &str, to: &str) -> Operation {
    Operation::Rename {
        columns: BTreeMap::from([(from.to_string(), to.to_string())]),
    }
}

fn not_empty(column: &str) -> Operation {
    Operation::Filter {
        column: column.to_string(),
        criteria: vec![FilterCriterion::IsNotEmpty],
    }
}

fn drop_columns(names: &[&str]) -> Operation {
    Operation::Drop {
        columns: strings(names),
    }
}

/// Build the step sequence for `config`. Never fails: absent keys take their
/// defaults (see `RunConfig::resolve`).
pub fn build_plan(config: &RunConfig) -> Plan {
    let settings = config.resolve();

    #[cfg(feature = "tracing")]
    tracing::debug!(
        skip_name = settings.skip_name,
        skip_description = settings.skip_description,
        using_vector_store = settings.using_vector_store,
        "resolved embedding settings"
    );

    let embed_description = !settings.skip_description;
    let mut plan = Plan::new(WORKFLOW_NAME);

    plan.push(
        Operation::DetectGraphColumn {
            candidates: strings(&GRAPH_COLUMN_CANDIDATES),
            to: GRAPH_COLUMN_MARKER.to_string(),
        },
        true,
    );
    plan.push(not_empty(GRAPH_COLUMN_MARKER), true);
    plan.push(
        Operation::UnpackGraph {
            // The dataset is assumed homogeneous: row 0 names the column for all rows.
            column: ColumnRef::Deferred(DeferredParam::FirstRowValue {
                column: GRAPH_COLUMN_MARKER.to_string(),
            }),
            element: GraphElement::Nodes,
        },
        true,
    )
    .input = Some(InputRef::Workflow(UPSTREAM_WORKFLOW.to_string()));
    plan.push(rename("label", "title"), true);
    plan.push(
        Operation::Select {
            columns: strings(&[
                "id",
                "title",
                "type",
                "description",
                "human_readable_id",
                "graph_embedding",
                "source_id",
            ]),
        },
        true,
    );
    plan.push(
        Operation::Dedupe {
            columns: strings(&["id"]),
        },
        true,
    );
    plan.push(rename("title", "name"), true);
    plan.push(not_empty("name"), true);
    plan.push(
        Operation::TextSplit {
            column: "source_id".to_string(),
            separator: ",".to_string(),
            to: "text_unit_ids".to_string(),
        },
        true,
    );
    plan.push(drop_columns(&["source_id"]), true);

    plan.push(
        Operation::TextEmbed {
            embedding_name: NAME_EMBEDDING.to_string(),
            column: "name".to_string(),
            to: "name_embedding".to_string(),
            options: settings.name_embed,
        },
        !settings.skip_name,
    );
    plan.push(
        Operation::Merge {
            strategy: MergeStrategy::Concat,
            columns: strings(&["name", "description"]),
            to: "name_description".to_string(),
            delimiter: ":".to_string(),
            preserve_source: true,
        },
        embed_description,
    );
    plan.push(
        Operation::TextEmbed {
            embedding_name: NAME_DESCRIPTION_EMBEDDING.to_string(),
            column: "name_description".to_string(),
            to: "description_embedding".to_string(),
            options: settings.name_description_embed,
        },
        embed_description,
    );
    plan.push(drop_columns(&["name_description"]), embed_description);
    // Vector-stored embeddings are not visible in the table, so presence
    // cannot be checked locally.
    plan.push(
        not_empty("description_embedding"),
        embed_description && !settings.using_vector_store,
    );

    #[cfg(feature = "tracing")]
    for step in &plan.steps {
        tracing::trace!(
            step = step.id.get(),
            op = step.operation.name(),
            enabled = step.enabled,
            "planned step"
        );
    }

    plan
}

/// Registry handle for this workflow.
pub struct CreateFinalEntities;

impl Workflow for CreateFinalEntities {
    fn name(&self) -> &'static str {
        WORKFLOW_NAME
    }

    fn dependencies(&self) -> Vec<InputRef> {
        dependencies()
    }

    fn build(&self, config: &RunConfig) -> Plan {
        build_plan(config)
    }
}
