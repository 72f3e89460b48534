//! Main query executor.
//!
//! This module provides the [`Executor`] that drives a root operator
//! and collects its output.

use std::sync::Arc;

use super::context::ExecutionContext;
use super::operator::{BoxedOperator, OperatorResult, OperatorState};
use super::result::ResultSet;
use super::row::{Row, Schema};

/// The main query executor.
///
/// Owns the root of an operator tree and the execution context, and pulls
/// rows through the tree on demand.
pub struct Executor {
    /// The root operator of the tree.
    root: BoxedOperator,
    /// Execution context.
    ctx: ExecutionContext,
    /// Whether the executor has been opened.
    opened: bool,
}

impl Executor {
    /// Creates a new executor for the given root operator.
    #[must_use]
    pub fn new(root: BoxedOperator, ctx: ExecutionContext) -> Self {
        Self { root, ctx, opened: false }
    }

    /// Returns the output schema.
    #[must_use]
    pub fn schema(&self) -> Arc<Schema> {
        self.root.schema()
    }

    /// Opens the executor and prepares it to produce rows.
    pub fn open(&mut self) -> OperatorResult<()> {
        if !self.opened {
            self.root.open(&self.ctx)?;
            self.opened = true;
        }
        Ok(())
    }

    /// Returns the next row, or `None` if there are no more rows.
    pub fn next(&mut self) -> OperatorResult<Option<Row>> {
        if !self.opened {
            self.open()?;
        }

        // Check for cancellation
        if self.ctx.is_cancelled() {
            return Ok(None);
        }

        let row = self.root.next()?;

        if row.is_some() {
            self.ctx.record_rows_produced(1);
        }

        Ok(row)
    }

    /// Closes the executor and releases resources.
    pub fn close(&mut self) -> OperatorResult<()> {
        if self.opened {
            self.root.close()?;
            self.opened = false;
        }
        Ok(())
    }

    /// Returns the execution context.
    #[must_use]
    pub fn context(&self) -> &ExecutionContext {
        &self.ctx
    }

    /// Returns the current state of the root operator.
    #[must_use]
    pub fn state(&self) -> OperatorState {
        self.root.state()
    }

    /// Executes the query and collects all results into a result set.
    pub fn execute(&mut self) -> OperatorResult<ResultSet> {
        let schema = self.root.schema();
        let rows = self.collect()?;
        Ok(ResultSet::with_rows(schema, rows))
    }

    /// Executes and returns just the rows as a vector.
    pub fn collect(&mut self) -> OperatorResult<Vec<Row>> {
        self.open()?;

        let mut rows = Vec::new();
        while let Some(row) = self.next()? {
            rows.push(row);
        }

        self.close()?;
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::operators::ValuesOp;
    use larkdb_core::Value;

    fn make_values() -> BoxedOperator {
        Box::new(ValuesOp::with_columns(
            vec!["id".to_string()],
            vec![vec![Value::Int(1)], vec![Value::Int(2)]],
        ))
    }

    #[test]
    fn executor_collects_rows() {
        let mut executor = Executor::new(make_values(), ExecutionContext::new());
        let rows = executor.collect().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(executor.context().stats().rows_produced(), 2);
    }

    #[test]
    fn executor_builds_result_set() {
        let mut executor = Executor::new(make_values(), ExecutionContext::new());
        let rs = executor.execute().unwrap();
        assert_eq!(rs.len(), 2);
        assert_eq!(rs.schema().columns(), &["id"]);
    }

    #[test]
    fn cancelled_executor_stops_producing() {
        let mut executor = Executor::new(make_values(), ExecutionContext::new());
        executor.open().unwrap();
        executor.context().cancel();
        assert!(executor.next().unwrap().is_none());
    }
}
