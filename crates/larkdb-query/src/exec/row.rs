//! Row types for query execution.
//!
//! This module defines the [`Row`] type used as the unit of data
//! flowing through the execution operators.

use std::collections::HashMap;
use std::sync::Arc;

use larkdb_core::Value;

use crate::error::{ExecError, ExecResult};

/// A schema defines the column names and their order in a row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    /// Column names in order (using Arc<str> to avoid cloning).
    columns: Vec<Arc<str>>,
    /// Map from column name to index for fast lookup.
    name_to_index: HashMap<Arc<str>, usize>,
}

impl Schema {
    /// Creates a new schema from column names.
    #[must_use]
    pub fn new(columns: Vec<String>) -> Self {
        let arc_columns: Vec<Arc<str>> =
            columns.into_iter().map(|s| Arc::from(s.as_str())).collect();
        Self::from_arcs(arc_columns)
    }

    /// Creates a new schema from Arc<str> column names (avoids allocation).
    #[must_use]
    pub fn from_arcs(columns: Vec<Arc<str>>) -> Self {
        let name_to_index =
            columns.iter().enumerate().map(|(i, name)| (Arc::clone(name), i)).collect();
        Self { columns, name_to_index }
    }

    /// Creates an empty schema.
    #[must_use]
    pub fn empty() -> Self {
        Self { columns: Vec::new(), name_to_index: HashMap::new() }
    }

    /// Returns the column names as string slices.
    #[must_use]
    pub fn columns(&self) -> Vec<&str> {
        self.columns.iter().map(|s| s.as_ref()).collect()
    }

    /// Returns the Arc<str> column names (for efficient cloning).
    #[must_use]
    pub fn columns_arc(&self) -> &[Arc<str>] {
        &self.columns
    }

    /// Returns the number of columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns true if the schema has no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Gets the index for a column name.
    ///
    /// If the name appears more than once, the last occurrence wins;
    /// use [`resolve`](Self::resolve) when duplicates must be rejected.
    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.name_to_index.get(name).copied()
    }

    /// Gets the column name at an index.
    #[must_use]
    pub fn column_at(&self, index: usize) -> Option<&str> {
        self.columns.get(index).map(|s| s.as_ref())
    }

    /// Resolves a column name to its index, requiring exactly one match.
    ///
    /// # Errors
    ///
    /// Returns [`ExecError::ColumnNotFound`] if no column carries the name,
    /// or [`ExecError::AmbiguousColumn`] if more than one does.
    pub fn resolve(&self, name: &str) -> ExecResult<usize> {
        let mut found = None;
        let mut count = 0;
        for (i, column) in self.columns.iter().enumerate() {
            if column.as_ref() == name {
                found.get_or_insert(i);
                count += 1;
            }
        }
        match (found, count) {
            (Some(i), 1) => Ok(i),
            (Some(_), count) => {
                Err(ExecError::AmbiguousColumn { column: name.to_string(), count })
            }
            (None, _) => Err(ExecError::ColumnNotFound(name.to_string())),
        }
    }

    /// Creates a new schema by merging with another (efficiently clones Arc<str>).
    #[must_use]
    pub fn merge(&self, other: &Schema) -> Self {
        let mut columns: Vec<Arc<str>> = self.columns.iter().map(Arc::clone).collect();
        columns.extend(other.columns.iter().map(Arc::clone));
        Self::from_arcs(columns)
    }
}

impl Default for Schema {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<Vec<String>> for Schema {
    fn from(columns: Vec<String>) -> Self {
        Self::new(columns)
    }
}

impl From<Vec<&str>> for Schema {
    fn from(columns: Vec<&str>) -> Self {
        Self::new(columns.into_iter().map(String::from).collect())
    }
}

/// A row of values.
///
/// Rows are the unit of data flowing through execution operators.
/// Each row contains values that correspond to the schema columns.
/// Once produced, a row is never mutated by the execution layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    /// The schema describing the columns.
    schema: Arc<Schema>,
    /// The values in this row.
    values: Vec<Value>,
}

impl Row {
    /// Creates a new row with the given schema and values.
    #[must_use]
    pub fn new(schema: Arc<Schema>, values: Vec<Value>) -> Self {
        debug_assert_eq!(
            schema.len(),
            values.len(),
            "Row values count must match schema column count"
        );
        Self { schema, values }
    }

    /// Returns the schema of this row.
    #[must_use]
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Returns the shared schema reference.
    #[must_use]
    pub fn schema_arc(&self) -> Arc<Schema> {
        Arc::clone(&self.schema)
    }

    /// Returns the values in this row.
    #[must_use]
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Returns the number of columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if the row has no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Gets a value by column index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// Gets a value by column name.
    #[must_use]
    pub fn get_by_name(&self, name: &str) -> Option<&Value> {
        self.schema.index_of(name).and_then(|i| self.values.get(i))
    }

    /// Creates a new row by merging with another row.
    ///
    /// The result carries this row's values followed by the other row's
    /// values, under the merged schema.
    #[must_use]
    pub fn merge(&self, other: &Row) -> Self {
        let schema = Arc::new(self.schema.merge(&other.schema));
        let mut values = self.values.clone();
        values.extend(other.values.iter().cloned());
        Self { schema, values }
    }

    /// Consumes the row and returns the values.
    #[must_use]
    pub fn into_values(self) -> Vec<Value> {
        self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_basic() {
        let schema = Schema::new(vec!["id".to_string(), "name".to_string()]);
        assert_eq!(schema.len(), 2);
        assert_eq!(schema.index_of("id"), Some(0));
        assert_eq!(schema.index_of("name"), Some(1));
        assert_eq!(schema.index_of("unknown"), None);
        assert_eq!(schema.column_at(1), Some("name"));
    }

    #[test]
    fn schema_merge() {
        let s1 = Schema::new(vec!["a".to_string()]);
        let s2 = Schema::new(vec!["b".to_string()]);
        let merged = s1.merge(&s2);
        assert_eq!(merged.columns(), &["a", "b"]);
    }

    #[test]
    fn schema_resolve() {
        let schema = Schema::new(vec!["id".to_string(), "name".to_string()]);
        assert_eq!(schema.resolve("name").unwrap(), 1);

        assert!(matches!(schema.resolve("missing"), Err(ExecError::ColumnNotFound(_))));

        let dup = Schema::new(vec!["id".to_string(), "id".to_string()]);
        assert!(matches!(
            dup.resolve("id"),
            Err(ExecError::AmbiguousColumn { count: 2, .. })
        ));
    }

    #[test]
    fn row_basic() {
        let schema = Arc::new(Schema::new(vec!["id".to_string(), "name".to_string()]));
        let row = Row::new(Arc::clone(&schema), vec![Value::Int(1), Value::from("Alice")]);

        assert_eq!(row.len(), 2);
        assert_eq!(row.get(0), Some(&Value::Int(1)));
        assert_eq!(row.get_by_name("name"), Some(&Value::from("Alice")));
    }

    #[test]
    fn row_merge() {
        let s1 = Arc::new(Schema::new(vec!["a".to_string()]));
        let s2 = Arc::new(Schema::new(vec!["b".to_string()]));
        let r1 = Row::new(s1, vec![Value::Int(1)]);
        let r2 = Row::new(s2, vec![Value::Int(2)]);

        let merged = r1.merge(&r2);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged.schema().columns(), &["a", "b"]);
        assert_eq!(merged.into_values(), vec![Value::Int(1), Value::Int(2)]);
    }
}
