//! Query result types.

use std::sync::Arc;

use super::row::{Row, Schema};

/// A set of result rows collected from an operator tree.
#[derive(Debug, Clone)]
pub struct ResultSet {
    /// The schema of the result set.
    schema: Arc<Schema>,
    /// The rows in the result set.
    rows: Vec<Row>,
}

impl ResultSet {
    /// Creates an empty result set with the given schema.
    #[must_use]
    pub fn new(schema: Arc<Schema>) -> Self {
        Self { schema, rows: Vec::new() }
    }

    /// Creates a result set with the given rows.
    #[must_use]
    pub fn with_rows(schema: Arc<Schema>, rows: Vec<Row>) -> Self {
        Self { schema, rows }
    }

    /// Returns the schema.
    #[must_use]
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Returns the rows in the result set.
    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the result set has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Consumes the result set and returns the rows.
    #[must_use]
    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }
}

impl IntoIterator for ResultSet {
    type Item = Row;
    type IntoIter = std::vec::IntoIter<Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}
