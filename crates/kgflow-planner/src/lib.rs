#![forbid(unsafe_code)]
//! kgflow-planner: run configuration → ordered, typed workflow plan
//! → engine-facing step descriptors.
//!
//! Design:
//! - Each workflow is a pure planner (`workflows::Workflow`).
//! - Steps are a tagged `Operation` enum; `descriptor` lowers them to the
//!   generic `{operation_name, enabled, parameters, input_reference}` shape.
//! - Parameters that depend on live data are emitted as `DeferredParam`
//!   markers; `resolve` documents how an engine resolves them.
//!
//! NOTE: This crate never touches table data or embedding providers.

pub mod columns;
pub mod descriptor;
pub mod dsl;
pub mod explain;
pub mod plan;
pub mod resolve;
pub mod step;
pub mod workflows;

pub use descriptor::StepDescriptor;
pub use dsl::yaml::{descriptors_to_yaml, parse_yaml_config};
pub use plan::Plan;
pub use resolve::{detect_graph_column, GRAPH_COLUMN_CANDIDATES};
pub use step::{ColumnRef, DeferredParam, InputRef, Operation, PlanStep};
pub use workflows::create_final_entities::{build_plan, WORKFLOW_NAME};
pub use workflows::Workflow;
