//! Typed step model.
//!
//! One `Operation` variant per verb the execution engine understands, each
//! carrying only its own parameters. `descriptor.rs` lowers these into the
//! generic `StepDescriptor` shape the engine interprets.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use kgflow_core::config::EmbedConfig;
use kgflow_core::error::{Error, Result};
use kgflow_core::id::StepId;
use kgflow_core::types::Scalar;
use serde::{Deserialize, Serialize};

/// A parameter the engine must read from the live input table immediately
/// before running the step that carries it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "deferred", rename_all = "snake_case")]
pub enum DeferredParam {
    /// Value of `column` in the first row of the step's input.
    FirstRowValue { column: String },
}

/// Column argument: either known at plan time or deferred to execution time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColumnRef {
    Name(String),
    Deferred(DeferredParam),
}

impl ColumnRef {
    pub fn is_deferred(&self) -> bool {
        matches!(self, ColumnRef::Deferred(_))
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnRef::Name(n) => write!(f, "{n}"),
            ColumnRef::Deferred(DeferredParam::FirstRowValue { column }) => {
                write!(f, "<{column}[0]>")
            }
        }
    }
}

/// Row predicate used by `filter`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "operator")]
pub enum FilterCriterion {
    /// Keeps rows whose value is neither null nor an empty string.
    #[serde(rename = "is not empty")]
    IsNotEmpty,
}

impl FilterCriterion {
    pub fn operator(&self) -> &'static str {
        match self {
            FilterCriterion::IsNotEmpty => "is not empty",
        }
    }

    /// Whether a row holding `value` survives the filter.
    pub fn matches(&self, value: &Scalar) -> bool {
        match self {
            FilterCriterion::IsNotEmpty => !value.is_empty(),
        }
    }
}

/// Which part of a serialized graph `unpack_graph` expands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GraphElement {
    Nodes,
}

impl GraphElement {
    pub fn as_str(&self) -> &'static str {
        match self {
            GraphElement::Nodes => "nodes",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeStrategy {
    Concat,
}

impl MergeStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            MergeStrategy::Concat => "concat",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "verb", rename_all = "snake_case")]
pub enum Operation {
    /// Record the first candidate present among the input's columns in a new
    /// column `to` (null when none match).
    DetectGraphColumn { candidates: Vec<String>, to: String },
    Filter {
        column: String,
        criteria: Vec<FilterCriterion>,
    },
    /// Expand each row's serialized graph into one row per element.
    UnpackGraph {
        column: ColumnRef,
        #[serde(rename = "type")]
        element: GraphElement,
    },
    Rename { columns: BTreeMap<String, String> },
    Select { columns: Vec<String> },
    /// Keep the first row for each distinct key.
    Dedupe { columns: Vec<String> },
    /// Split a string column on `separator` into an ordered list column.
    TextSplit {
        column: String,
        separator: String,
        to: String,
    },
    Drop { columns: Vec<String> },
    TextEmbed {
        embedding_name: String,
        column: String,
        to: String,
        options: EmbedConfig,
    },
    Merge {
        strategy: MergeStrategy,
        columns: Vec<String>,
        to: String,
        delimiter: String,
        preserve_source: bool,
    },
}

impl Operation {
    /// Stable verb name the engine dispatches on.
    pub fn name(&self) -> &'static str {
        use Operation::*;
        match self {
            DetectGraphColumn { .. } => "detect_graph_column",
            Filter { .. } => "filter",
            UnpackGraph { .. } => "unpack_graph",
            Rename { .. } => "rename",
            Select { .. } => "select",
            Dedupe { .. } => "dedupe",
            TextSplit { .. } => "text_split",
            Drop { .. } => "drop",
            TextEmbed { .. } => "text_embed",
            Merge { .. } => "merge",
        }
    }

    /// True for operations that consume an upstream workflow's table rather
    /// than the working table built by earlier steps.
    pub fn reads_upstream(&self) -> bool {
        matches!(self, Operation::UnpackGraph { .. })
    }

    /// One-line human summary for explain output.
    pub fn summary(&self) -> String {
        use Operation::*;
        match self {
            DetectGraphColumn { candidates, to } => {
                format!("first of [{}] -> {to}", candidates.join(", "))
            }
            Filter { column, criteria } => {
                let ops: Vec<_> = criteria.iter().map(|c| c.operator()).collect();
                format!("{column} {}", ops.join(" and "))
            }
            UnpackGraph { column, element } => format!("{} from {column}", element.as_str()),
            Rename { columns } => columns
                .iter()
                .map(|(from, to)| format!("{from} -> {to}"))
                .collect::<Vec<_>>()
                .join(", "),
            Select { columns } => columns.join(", "),
            Dedupe { columns } => format!("by {}", columns.join(", ")),
            TextSplit {
                column,
                separator,
                to,
            } => format!("{column} on '{separator}' -> {to}"),
            Drop { columns } => columns.join(", "),
            TextEmbed {
                embedding_name,
                column,
                to,
                options,
            } => {
                let store = if options.uses_vector_store() {
                    " (vector store)"
                } else {
                    ""
                };
                format!("{column} -> {to} via '{embedding_name}'{store}")
            }
            Merge {
                strategy,
                columns,
                to,
                delimiter,
                ..
            } => format!(
                "{} {} with '{delimiter}' -> {to}",
                strategy.as_str(),
                columns.join(", ")
            ),
        }
    }
}

/// Upstream dataset a step reads from, written `workflow:<name>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum InputRef {
    Workflow(String),
}

impl fmt::Display for InputRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputRef::Workflow(name) => write!(f, "workflow:{name}"),
        }
    }
}

impl FromStr for InputRef {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.split_once(':') {
            Some(("workflow", name)) if !name.is_empty() => Ok(InputRef::Workflow(name.into())),
            _ => Err(Error::Plan(format!("unrecognized input reference '{s}'"))),
        }
    }
}

impl TryFrom<String> for InputRef {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<InputRef> for String {
    fn from(r: InputRef) -> Self {
        r.to_string()
    }
}

/// One planned step. Disabled steps stay in the plan as no-ops.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanStep {
    pub id: StepId,
    pub operation: Operation,
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<InputRef>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn input_ref_round_trips_through_string() {
        let r: InputRef = "workflow:create_base_entity_graph".parse().unwrap();
        assert_eq!(r, InputRef::Workflow("create_base_entity_graph".into()));
        assert_eq!(
            serde_json::to_value(&r).unwrap(),
            json!("workflow:create_base_entity_graph")
        );
        assert!("dataset:foo".parse::<InputRef>().is_err());
        assert!("workflow:".parse::<InputRef>().is_err());
    }

    #[test]
    fn column_ref_serializes_untagged() {
        let literal = ColumnRef::Name("graph".into());
        assert_eq!(serde_json::to_value(&literal).unwrap(), json!("graph"));

        let deferred = ColumnRef::Deferred(DeferredParam::FirstRowValue {
            column: "graph_column".into(),
        });
        let v = serde_json::to_value(&deferred).unwrap();
        assert_eq!(
            v,
            json!({"deferred": "first_row_value", "column": "graph_column"})
        );
        let back: ColumnRef = serde_json::from_value(v).unwrap();
        assert_eq!(back, deferred);
    }

    #[test]
    fn is_not_empty_rejects_null_and_blank() {
        let c = FilterCriterion::IsNotEmpty;
        assert!(!c.matches(&Scalar::Null));
        assert!(!c.matches(&Scalar::from("")));
        assert!(c.matches(&Scalar::from("graph")));
    }

    #[test]
    fn unpack_expands_nodes_only() {
        let op: Operation = serde_json::from_value(json!({
            "verb": "unpack_graph",
            "column": "graph",
            "type": "nodes"
        }))
        .unwrap();
        assert!(op.reads_upstream());
        assert!(serde_json::from_value::<GraphElement>(json!("edges")).is_err());
        assert!(!Operation::Drop { columns: vec![] }.reads_upstream());
    }

    #[test]
    fn operation_is_tagged_by_verb() {
        let op = Operation::Dedupe {
            columns: vec!["id".into()],
        };
        assert_eq!(
            serde_json::to_value(&op).unwrap(),
            json!({"verb": "dedupe", "columns": ["id"]})
        );
        assert_eq!(op.name(), "dedupe");
    }
}
