//! Sort operator.
//!
//! Produces its input's rows ordered on a single key column, ascending
//! with nulls last. This is the sort stage the join's input preparation
//! inserts in front of unsorted inputs.

use std::cmp::Ordering;
use std::sync::Arc;

use larkdb_core::Value;

use crate::error::ExecError;
use crate::exec::context::ExecutionContext;
use crate::exec::operator::{BoxedOperator, Operator, OperatorBase, OperatorResult, OperatorState};
use crate::exec::row::{Row, Schema};

/// Sort operator.
///
/// Sorts input rows by the values of one column, ascending, nulls last.
/// This is a blocking operator that materializes all input rows, so its
/// output is also cheap to re-read.
pub struct SortOp {
    /// Base operator state.
    base: OperatorBase,
    /// The key column.
    column: Arc<str>,
    /// Input operator.
    input: BoxedOperator,
    /// Iterator over sorted rows (consumes without cloning).
    sorted_iter: std::vec::IntoIter<Row>,
    /// Whether rows have been materialized.
    materialized: bool,
    /// Maximum rows allowed in memory (0 = no limit).
    max_rows_in_memory: usize,
}

impl SortOp {
    /// Creates a new sort operator on the given column.
    #[must_use]
    pub fn new(column: impl Into<String>, input: BoxedOperator) -> Self {
        let schema = input.schema();
        Self {
            base: OperatorBase::new(schema),
            column: Arc::from(column.into().as_str()),
            input,
            sorted_iter: Vec::new().into_iter(),
            materialized: false,
            max_rows_in_memory: 0, // Set in open() from context
        }
    }

    /// Materializes and sorts all input rows.
    fn materialize_and_sort(&mut self) -> OperatorResult<()> {
        let key = self.base.schema().resolve(&self.column)?;

        let mut rows = Vec::new();
        while let Some(row) = self.input.next()? {
            rows.push(row);

            // Check limit after each row (0 means no limit)
            if self.max_rows_in_memory > 0 && rows.len() > self.max_rows_in_memory {
                return Err(ExecError::QueryTooLarge {
                    actual: rows.len(),
                    limit: self.max_rows_in_memory,
                });
            }
        }

        rows.sort_by(|a, b| {
            let val_a = a.get(key).unwrap_or(&Value::Null);
            let val_b = b.get(key).unwrap_or(&Value::Null);
            compare_values(val_a, val_b)
        });

        // Convert to iterator for zero-copy consumption
        self.sorted_iter = rows.into_iter();
        self.materialized = true;
        Ok(())
    }
}

impl Operator for SortOp {
    fn open(&mut self, ctx: &ExecutionContext) -> OperatorResult<()> {
        self.input.open(ctx)?;
        self.sorted_iter = Vec::new().into_iter();
        self.materialized = false;
        self.max_rows_in_memory = ctx.max_rows_in_memory();
        self.base.set_open();
        Ok(())
    }

    fn next(&mut self) -> OperatorResult<Option<Row>> {
        // Materialize on first call
        if !self.materialized {
            self.materialize_and_sort()?;
        }

        // Iterator yields owned rows without cloning
        match self.sorted_iter.next() {
            Some(row) => {
                self.base.inc_rows_produced();
                Ok(Some(row))
            }
            None => {
                self.base.set_finished();
                Ok(None)
            }
        }
    }

    fn close(&mut self) -> OperatorResult<()> {
        self.input.close()?;
        self.sorted_iter = Vec::new().into_iter();
        self.base.set_closed();
        Ok(())
    }

    fn schema(&self) -> Arc<Schema> {
        self.base.schema()
    }

    fn state(&self) -> OperatorState {
        self.base.state()
    }

    fn name(&self) -> &'static str {
        "Sort"
    }

    fn sorted_by(&self) -> Vec<Arc<str>> {
        vec![Arc::clone(&self.column)]
    }

    fn materialized(&self) -> bool {
        true
    }
}

/// Compares two values with NULL handling.
///
/// NULL sorts after every non-null value. Int and Float cross-compare
/// numerically. NaN is treated as equal to maintain a stable sort order.
/// Values of unrelated types compare equal, leaving their relative order
/// to the sort's stability.
pub(crate) fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Greater,
        (_, Value::Null) => Ordering::Less,
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        (Value::Int(a), Value::Int(b)) => a.cmp(b),
        // NaN comparison: treat NaN as Equal to avoid sort instability
        (Value::Float(a), Value::Float(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
        (Value::Int(a), Value::Float(b)) => (*a as f64).partial_cmp(b).unwrap_or(Ordering::Equal),
        (Value::Float(a), Value::Int(b)) => a.partial_cmp(&(*b as f64)).unwrap_or(Ordering::Equal),
        (Value::String(a), Value::String(b)) => a.cmp(b),
        (Value::Bytes(a), Value::Bytes(b)) => a.cmp(b),
        _ => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::operators::values::ValuesOp;

    fn make_input() -> BoxedOperator {
        Box::new(ValuesOp::with_columns(
            vec!["name".to_string(), "age".to_string()],
            vec![
                vec![Value::from("Bob"), Value::Int(30)],
                vec![Value::from("Alice"), Value::Int(25)],
                vec![Value::from("Carol"), Value::Int(35)],
            ],
        ))
    }

    #[test]
    fn sort_ascending() {
        let mut op = SortOp::new("name", make_input());

        let ctx = ExecutionContext::new();
        op.open(&ctx).unwrap();

        let row1 = op.next().unwrap().unwrap();
        assert_eq!(row1.get_by_name("name"), Some(&Value::from("Alice")));

        let row2 = op.next().unwrap().unwrap();
        assert_eq!(row2.get_by_name("name"), Some(&Value::from("Bob")));

        let row3 = op.next().unwrap().unwrap();
        assert_eq!(row3.get_by_name("name"), Some(&Value::from("Carol")));

        assert!(op.next().unwrap().is_none());
        op.close().unwrap();
    }

    #[test]
    fn sort_reports_order_and_materialization() {
        let op = SortOp::new("age", make_input());
        assert_eq!(op.sorted_by(), vec![Arc::<str>::from("age")]);
        assert!(op.materialized());
    }

    #[test]
    fn sort_nulls_last() {
        let input: BoxedOperator = Box::new(ValuesOp::with_columns(
            vec!["x".to_string()],
            vec![
                vec![Value::Int(3)],
                vec![Value::Null],
                vec![Value::Int(1)],
                vec![Value::Null],
                vec![Value::Int(2)],
            ],
        ));

        let mut op = SortOp::new("x", input);

        let ctx = ExecutionContext::new();
        op.open(&ctx).unwrap();

        assert_eq!(op.next().unwrap().unwrap().get(0), Some(&Value::Int(1)));
        assert_eq!(op.next().unwrap().unwrap().get(0), Some(&Value::Int(2)));
        assert_eq!(op.next().unwrap().unwrap().get(0), Some(&Value::Int(3)));
        // NULLs last
        assert_eq!(op.next().unwrap().unwrap().get(0), Some(&Value::Null));
        assert_eq!(op.next().unwrap().unwrap().get(0), Some(&Value::Null));
        assert!(op.next().unwrap().is_none());

        op.close().unwrap();
    }

    #[test]
    fn sort_unknown_column_fails() {
        let mut op = SortOp::new("missing", make_input());

        let ctx = ExecutionContext::new();
        op.open(&ctx).unwrap();
        assert!(matches!(op.next(), Err(ExecError::ColumnNotFound(_))));
    }

    #[test]
    fn sort_respects_row_limit() {
        let mut op = SortOp::new("name", make_input());

        let ctx = ExecutionContext::new()
            .with_config(crate::exec::ExecutionConfig::new().with_max_rows_in_memory(2));
        op.open(&ctx).unwrap();
        assert!(matches!(op.next(), Err(ExecError::QueryTooLarge { limit: 2, .. })));
    }
}
