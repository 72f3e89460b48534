//! Materialize operator.
//!
//! Buffers its entire input in memory before producing any rows. The
//! join's input preparation inserts this stage in front of a right side
//! that is sorted but not yet cheap to re-read.

use std::sync::Arc;

use crate::error::ExecError;
use crate::exec::context::ExecutionContext;
use crate::exec::operator::{BoxedOperator, Operator, OperatorBase, OperatorResult, OperatorState};
use crate::exec::row::{Row, Schema};

/// Materialize operator.
///
/// A blocking pass-through: collects all input rows into memory on the
/// first `next()` call, then yields them unchanged. Preserves the input's
/// sort order.
pub struct MaterializeOp {
    /// Base operator state.
    base: OperatorBase,
    /// Input operator.
    input: BoxedOperator,
    /// Iterator over buffered rows (consumes without cloning).
    buffered_iter: std::vec::IntoIter<Row>,
    /// Whether rows have been materialized.
    materialized: bool,
    /// Maximum rows allowed in memory (0 = no limit).
    max_rows_in_memory: usize,
}

impl MaterializeOp {
    /// Creates a new materialize operator.
    #[must_use]
    pub fn new(input: BoxedOperator) -> Self {
        let schema = input.schema();
        Self {
            base: OperatorBase::new(schema),
            input,
            buffered_iter: Vec::new().into_iter(),
            materialized: false,
            max_rows_in_memory: 0, // Set in open() from context
        }
    }

    /// Collects all input rows into the buffer.
    fn materialize(&mut self) -> OperatorResult<()> {
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

        self.buffered_iter = rows.into_iter();
        self.materialized = true;
        Ok(())
    }
}

impl Operator for MaterializeOp {
    fn open(&mut self, ctx: &ExecutionContext) -> OperatorResult<()> {
        self.input.open(ctx)?;
        self.buffered_iter = Vec::new().into_iter();
        self.materialized = false;
        self.max_rows_in_memory = ctx.max_rows_in_memory();
        self.base.set_open();
        Ok(())
    }

    fn next(&mut self) -> OperatorResult<Option<Row>> {
        // Materialize on first call
        if !self.materialized {
            self.materialize()?;
        }

        match self.buffered_iter.next() {
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
        self.buffered_iter = Vec::new().into_iter();
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
        "Materialize"
    }

    fn sorted_by(&self) -> Vec<Arc<str>> {
        self.input.sorted_by()
    }

    fn materialized(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::operators::values::ValuesOp;
    use larkdb_core::Value;

    fn make_input() -> BoxedOperator {
        Box::new(
            ValuesOp::with_columns(
                vec!["id".to_string()],
                vec![vec![Value::Int(1)], vec![Value::Int(2)], vec![Value::Int(3)]],
            )
            .sorted_on("id"),
        )
    }

    #[test]
    fn materialize_passes_rows_through() {
        let mut op = MaterializeOp::new(make_input());

        let ctx = ExecutionContext::new();
        op.open(&ctx).unwrap();

        assert_eq!(op.next().unwrap().unwrap().get(0), Some(&Value::Int(1)));
        assert_eq!(op.next().unwrap().unwrap().get(0), Some(&Value::Int(2)));
        assert_eq!(op.next().unwrap().unwrap().get(0), Some(&Value::Int(3)));
        assert!(op.next().unwrap().is_none());

        op.close().unwrap();
    }

    #[test]
    fn materialize_preserves_input_sort_order() {
        let op = MaterializeOp::new(make_input());
        assert_eq!(op.sorted_by(), vec![Arc::<str>::from("id")]);
        assert!(op.materialized());
    }

    #[test]
    fn materialize_respects_row_limit() {
        let mut op = MaterializeOp::new(make_input());

        let ctx = ExecutionContext::new()
            .with_config(crate::exec::ExecutionConfig::new().with_max_rows_in_memory(2));
        op.open(&ctx).unwrap();
        assert!(matches!(op.next(), Err(ExecError::QueryTooLarge { limit: 2, .. })));
    }
}
