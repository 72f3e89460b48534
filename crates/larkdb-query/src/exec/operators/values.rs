//! Values and Empty operators.
//!
//! These operators produce rows from inline data without reading from
//! storage.

use std::sync::Arc;

use larkdb_core::Value;

use crate::exec::context::ExecutionContext;
use crate::exec::operator::{Operator, OperatorBase, OperatorResult, OperatorState};
use crate::exec::row::{Row, Schema};

/// Values operator - produces rows from inline data.
pub struct ValuesOp {
    /// Base operator state.
    base: OperatorBase,
    /// The rows to produce.
    rows: Vec<Vec<Value>>,
    /// Current row index.
    current: usize,
    /// Columns the inline rows are declared to be sorted on.
    sorted_by: Vec<Arc<str>>,
}

impl ValuesOp {
    /// Creates a new values operator.
    #[must_use]
    pub fn new(schema: Arc<Schema>, rows: Vec<Vec<Value>>) -> Self {
        Self { base: OperatorBase::new(schema), rows, current: 0, sorted_by: Vec::new() }
    }

    /// Creates a values operator with auto-generated column names.
    #[must_use]
    pub fn with_columns(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        let schema = Arc::new(Schema::new(columns));
        Self::new(schema, rows)
    }

    /// Declares that the inline rows are already sorted on the given column.
    ///
    /// The caller is responsible for the declaration being true; the
    /// operator does not verify it.
    #[must_use]
    pub fn sorted_on(mut self, column: impl Into<String>) -> Self {
        self.sorted_by = vec![Arc::from(column.into().as_str())];
        self
    }
}

impl Operator for ValuesOp {
    fn open(&mut self, _ctx: &ExecutionContext) -> OperatorResult<()> {
        self.current = 0;
        self.base.set_open();
        Ok(())
    }

    fn next(&mut self) -> OperatorResult<Option<Row>> {
        if self.current >= self.rows.len() {
            self.base.set_finished();
            return Ok(None);
        }

        let values = self.rows[self.current].clone();
        self.current += 1;
        self.base.inc_rows_produced();

        let row = Row::new(self.base.schema(), values);
        Ok(Some(row))
    }

    fn close(&mut self) -> OperatorResult<()> {
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
        "Values"
    }

    fn sorted_by(&self) -> Vec<Arc<str>> {
        self.sorted_by.clone()
    }
}

/// Empty operator - produces no rows.
pub struct EmptyOp {
    /// Base operator state.
    base: OperatorBase,
}

impl EmptyOp {
    /// Creates a new empty operator.
    #[must_use]
    pub fn new(schema: Arc<Schema>) -> Self {
        Self { base: OperatorBase::new(schema) }
    }

    /// Creates an empty operator with column names.
    #[must_use]
    pub fn with_columns(columns: Vec<String>) -> Self {
        let schema = Arc::new(Schema::new(columns));
        Self::new(schema)
    }
}

impl Operator for EmptyOp {
    fn open(&mut self, _ctx: &ExecutionContext) -> OperatorResult<()> {
        self.base.set_open();
        Ok(())
    }

    fn next(&mut self) -> OperatorResult<Option<Row>> {
        self.base.set_finished();
        Ok(None)
    }

    fn close(&mut self) -> OperatorResult<()> {
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
        "Empty"
    }
}
