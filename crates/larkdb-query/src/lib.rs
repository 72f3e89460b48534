//! `LarkDB` Query
//!
//! This crate provides the pull-based query execution engine for `LarkDB`.
//!
//! # Overview
//!
//! The execution engine is organized around the [`exec::Operator`] trait:
//! operators form a tree, each pulling rows from its children via
//! `open()`/`next()`/`close()`. The join operators consume their inputs
//! through row cursors, which add lookahead and backtracking on top of the
//! operator contract.
//!
//! # Modules
//!
//! - [`exec`] - Query execution (operators, cursors, context, results)
//! - [`error`] - Error types for execution
//!
//! # Quick Start
//!
//! Join two sorted inline relations on a key column:
//!
//! ```
//! use larkdb_core::Value;
//! use larkdb_query::exec::operators::{SortMergeJoinOp, ValuesOp};
//! use larkdb_query::exec::{ExecutionContext, Executor};
//!
//! let users = Box::new(
//!     ValuesOp::with_columns(
//!         vec!["id".to_string(), "name".to_string()],
//!         vec![
//!             vec![Value::Int(1), Value::from("Alice")],
//!             vec![Value::Int(2), Value::from("Bob")],
//!         ],
//!     )
//!     .sorted_on("id"),
//! );
//! let orders = Box::new(ValuesOp::with_columns(
//!     vec!["user_id".to_string(), "total".to_string()],
//!     vec![
//!         vec![Value::Int(1), Value::Int(30)],
//!         vec![Value::Int(2), Value::Int(15)],
//!     ],
//! ));
//!
//! let join = SortMergeJoinOp::try_new(users, orders, "id", "user_id").unwrap();
//! let mut executor = Executor::new(Box::new(join), ExecutionContext::new());
//! let rows = executor.collect().unwrap();
//! assert_eq!(rows.len(), 2);
//! ```

pub mod error;
pub mod exec;

// Re-export commonly used items at the crate root
pub use error::{ExecError, ExecResult};
pub use exec::{ExecutionContext, Executor, Operator, ResultSet, Row};
