//! Error types for query execution.

use thiserror::Error;

/// Errors that can occur during query execution.
#[derive(Debug, Error)]
pub enum ExecError {
    /// A referenced column does not exist in the schema.
    #[error("column not found: {0}")]
    ColumnNotFound(String),

    /// A referenced column name matches more than one schema column.
    #[error("ambiguous column: {column} appears {count} times in schema")]
    AmbiguousColumn {
        /// The column name that was looked up.
        column: String,
        /// How many schema columns carry that name.
        count: usize,
    },

    /// A row was requested from an exhausted cursor.
    ///
    /// Callers must check `has_next` before calling `take_next`.
    #[error("no more rows")]
    NoMoreRows,

    /// An operation the iteration contract permanently rejects.
    #[error("unsupported operation: {0}")]
    Unsupported(String),

    /// An operator tried to materialize more rows than the configured limit.
    #[error("query too large: {actual} rows exceeds the in-memory limit of {limit}")]
    QueryTooLarge {
        /// The number of rows the operator tried to hold.
        actual: usize,
        /// The configured limit.
        limit: usize,
    },
}

/// Result type for execution operations.
pub type ExecResult<T> = Result<T, ExecError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ExecError::ColumnNotFound("user_id".to_string());
        assert!(err.to_string().contains("column not found"));
        assert!(err.to_string().contains("user_id"));
    }

    #[test]
    fn ambiguous_column_display() {
        let err = ExecError::AmbiguousColumn { column: "id".to_string(), count: 2 };
        assert!(err.to_string().contains("ambiguous column"));
        assert!(err.to_string().contains("2 times"));
    }

    #[test]
    fn query_too_large_display() {
        let err = ExecError::QueryTooLarge { actual: 11, limit: 10 };
        assert!(err.to_string().contains("11"));
        assert!(err.to_string().contains("limit of 10"));
    }
}
