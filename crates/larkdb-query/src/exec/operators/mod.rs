//! Concrete operator implementations.
//!
//! This module contains the implementations of the physical operators.
//!
//! # Operator Categories
//!
//! - **Inline data operators**: [`values`] - Rows from inline data
//! - **Sort operators**: [`sort`] - Blocking single-column sort
//! - **Materialize operators**: [`materialize`] - In-memory buffering
//! - **Join operators**: [`merge_join`] - Sort-merge equi-join

pub mod materialize;
pub mod merge_join;
pub mod sort;
pub mod values;

// Re-exports for convenience
pub use materialize::MaterializeOp;
pub use merge_join::SortMergeJoinOp;
pub use sort::SortOp;
pub use values::{EmptyOp, ValuesOp};
