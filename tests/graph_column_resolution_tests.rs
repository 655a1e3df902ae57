//! Graph-column detection and deferred parameter resolution tests

use kgflow_core::prelude::*;
use kgflow_planner::resolve::{graph_column_marker, GRAPH_COLUMN_MARKER};
use kgflow_planner::step::{FilterCriterion, Operation};
use kgflow_planner::{build_plan, detect_graph_column, ColumnRef};

fn batch_with(columns: &[&str]) -> RowBatch {
    RowBatch {
        columns: columns
            .iter()
            .map(|name| Column {
                name: name.to_string(),
                values: vec![Scalar::Str("<graphml/>".to_string())],
            })
            .collect(),
    }
}

#[test]
fn test_detection_precedence() {
    assert_eq!(
        detect_graph_column(["entity_graph", "graph", "clustered_graph"]),
        Some("clustered_graph")
    );
    assert_eq!(detect_graph_column(["entity_graph", "graph"]), Some("graph"));
    assert_eq!(detect_graph_column(["id", "entity_graph"]), Some("entity_graph"));
    assert_eq!(detect_graph_column(["id", "level"]), None);
}

#[test]
fn test_detection_on_batches() {
    let cases: [(&[&str], Scalar); 4] = [
        (&["graph", "entity_graph", "clustered_graph"], Scalar::from("clustered_graph")),
        (&["graph", "entity_graph"], Scalar::from("graph")),
        (&["entity_graph"], Scalar::from("entity_graph")),
        (&["level"], Scalar::Null),
    ];
    for (columns, expected) in cases {
        assert_eq!(graph_column_marker(&batch_with(columns)), expected);
    }
}

#[test]
fn test_missing_graph_column_filters_everything() {
    // A null marker never passes the step 2 filter, so the output is empty
    // rather than an error.
    let marker = graph_column_marker(&batch_with(&["level"]));
    assert!(!FilterCriterion::IsNotEmpty.matches(&marker));
}

#[test]
fn test_unpack_column_resolves_from_first_row() {
    let plan = build_plan(&RunConfig::default());
    let Operation::UnpackGraph { column, .. } = &plan.steps[2].operation else {
        panic!("step 3 should unpack the graph");
    };
    assert!(column.is_deferred());

    let annotated = RowBatch {
        columns: vec![Column {
            name: GRAPH_COLUMN_MARKER.to_string(),
            values: vec![Scalar::from("clustered_graph"), Scalar::from("graph")],
        }],
    };
    assert_eq!(
        column.resolve(&annotated).unwrap().as_deref(),
        Some("clustered_graph")
    );

    let empty = RowBatch {
        columns: vec![Column {
            name: GRAPH_COLUMN_MARKER.to_string(),
            values: vec![],
        }],
    };
    // Nothing survived step 2: the unpack runs as a no-op.
    assert_eq!(column.resolve(&empty).unwrap(), None);

    let unmarked = RowBatch {
        columns: vec![Column {
            name: GRAPH_COLUMN_MARKER.to_string(),
            values: vec![Scalar::Null],
        }],
    };
    assert!(matches!(column.resolve(&unmarked), Err(Error::Resolve(_))));
}

#[test]
fn test_literal_column_ref() {
    let r = ColumnRef::Name("entity_graph".into());
    assert!(!r.is_deferred());
    assert_eq!(
        r.resolve(&RowBatch::default()).unwrap().as_deref(),
        Some("entity_graph")
    );
}
