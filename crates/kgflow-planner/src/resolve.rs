//! Execution-time resolution rules for dynamic parameters.
//!
//! The planner only emits markers; an engine applies these rules against the
//! live table right before the step runs.

use kgflow_core::error::{Error, Result};
use kgflow_core::types::{RowBatch, Scalar};

use crate::step::{ColumnRef, DeferredParam};

/// Graph-holding column names in priority order. This list is a compatibility
/// contract with upstream producers; do not reorder it.
pub const GRAPH_COLUMN_CANDIDATES: [&str; 3] = ["clustered_graph", "graph", "entity_graph"];

/// Column that records which graph column was detected.
pub const GRAPH_COLUMN_MARKER: &str = "graph_column";

/// First candidate present in `columns`, or `None`.
pub fn detect_graph_column<'a, I>(columns: I) -> Option<&'static str>
where
    I: IntoIterator<Item = &'a str>,
{
    let present: Vec<&str> = columns.into_iter().collect();
    GRAPH_COLUMN_CANDIDATES
        .iter()
        .copied()
        .find(|candidate| present.contains(candidate))
}

/// Marker value step 1 writes into every row of `batch`.
pub fn graph_column_marker(batch: &RowBatch) -> Scalar {
    Scalar::from(detect_graph_column(batch.column_names()))
}

impl DeferredParam {
    /// Read the parameter from `input`.
    ///
    /// A zero-row input yields `Ok(None)`: the step has nothing to process
    /// and runs as a no-op. This is the normal outcome when no graph column
    /// was detected and step 2 filtered every row away.
    pub fn resolve(&self, input: &RowBatch) -> Result<Option<String>> {
        match self {
            DeferredParam::FirstRowValue { column } => {
                if input.num_rows() == 0 {
                    return Ok(None);
                }
                if input.column(column).is_none() {
                    return Err(Error::Resolve(format!("column '{column}' not found")));
                }
                match input.value(column, 0) {
                    None => Ok(None),
                    Some(Scalar::Str(s)) if !s.is_empty() => Ok(Some(s.clone())),
                    Some(other) => Err(Error::Resolve(format!(
                        "first row of '{column}' holds {other:?}, expected a column name"
                    ))),
                }
            }
        }
    }
}

impl ColumnRef {
    /// Literal names pass through; deferred ones are read from `input`
    /// (`None` for an empty input).
    pub fn resolve(&self, input: &RowBatch) -> Result<Option<String>> {
        match self {
            ColumnRef::Name(n) => Ok(Some(n.clone())),
            ColumnRef::Deferred(d) => d.resolve(input),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kgflow_core::types::Column;

    fn marker_batch(values: Vec<Scalar>) -> RowBatch {
        RowBatch::new(vec![Column::new(GRAPH_COLUMN_MARKER, values)])
    }

    #[test]
    fn first_row_wins_even_if_later_rows_differ() {
        let batch = marker_batch(vec![Scalar::from("graph"), Scalar::from("entity_graph")]);
        let p = DeferredParam::FirstRowValue {
            column: GRAPH_COLUMN_MARKER.into(),
        };
        assert_eq!(p.resolve(&batch).unwrap().as_deref(), Some("graph"));
    }

    #[test]
    fn empty_input_resolves_to_no_op() {
        let p = DeferredParam::FirstRowValue {
            column: GRAPH_COLUMN_MARKER.into(),
        };
        assert_eq!(p.resolve(&marker_batch(vec![])).unwrap(), None);
        assert_eq!(p.resolve(&RowBatch::default()).unwrap(), None);
    }

    #[test]
    fn missing_column_on_populated_input_fails() {
        let p = DeferredParam::FirstRowValue {
            column: GRAPH_COLUMN_MARKER.into(),
        };
        let batch = RowBatch::new(vec![Column::new("graph", vec![Scalar::from("<graphml/>")])]);
        assert!(matches!(p.resolve(&batch), Err(Error::Resolve(_))));
    }

    #[test]
    fn null_first_row_fails_to_resolve() {
        let p = DeferredParam::FirstRowValue {
            column: GRAPH_COLUMN_MARKER.into(),
        };
        assert!(p.resolve(&marker_batch(vec![Scalar::Null])).is_err());
        assert!(p.resolve(&marker_batch(vec![Scalar::I64(1)])).is_err());
    }

    #[test]
    fn literal_column_ref_ignores_input() {
        let r = ColumnRef::Name("graph".into());
        assert_eq!(r.resolve(&RowBatch::default()).unwrap().as_deref(), Some("graph"));
    }
}
