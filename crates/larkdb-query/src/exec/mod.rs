//! Query execution engine.
//!
//! This module provides the executor, operators, and row cursors for
//! running operator trees.
//!
//! # Architecture
//!
//! The execution engine uses a **pull-based iterator model** where each
//! operator implements the [`Operator`] trait with `open()`, `next()`,
//! and `close()` methods. Data flows from leaf operators (inline values)
//! up through intermediate operators (sort, materialize, join) to the root.
//!
//! # Modules
//!
//! - [`context`] - Execution context (parameters, cancellation, limits)
//! - [`row`] - Row and schema types for intermediate results
//! - [`operator`] - Operator trait and base types
//! - [`cursor`] - Forward and backtracking cursors over operator streams
//! - [`operators`] - Concrete operator implementations
//! - [`result`] - Query result types
//! - [`executor`] - Main executor that drives a root operator
//!
//! # Example
//!
//! ```ignore
//! use larkdb_query::exec::{Executor, ExecutionContext};
//!
//! let mut executor = Executor::new(root, ExecutionContext::new());
//! while let Some(row) = executor.next()? {
//!     println!("{:?}", row);
//! }
//! ```

mod context;
mod cursor;
mod executor;
mod operator;
mod result;
mod row;

pub mod operators;

// Re-exports
pub use context::{ExecutionConfig, ExecutionContext, ExecutionStats, DEFAULT_MAX_ROWS_IN_MEMORY};
pub use cursor::{BacktrackingCursor, ForwardCursor, RowCursor};
pub use executor::Executor;
pub use operator::{BoxedOperator, Operator, OperatorBase, OperatorResult, OperatorState};
pub use result::ResultSet;
pub use row::{Row, Schema};
