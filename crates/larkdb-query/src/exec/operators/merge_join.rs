//! Sort-merge join operator.
//!
//! Joins two row streams on key equality by merging them in sorted order.
//! The left side is consumed in a single forward pass; the right side is
//! read through a backtracking cursor so that a run of rows sharing one
//! key (a group) can be replayed against every matching left row.

use std::cmp::Ordering;
use std::sync::Arc;

use larkdb_core::Value;

use crate::error::ExecResult;
use crate::exec::context::ExecutionContext;
use crate::exec::cursor::{BacktrackingCursor, ForwardCursor, RowCursor};
use crate::exec::operator::{BoxedOperator, Operator, OperatorBase, OperatorResult, OperatorState};
use crate::exec::operators::materialize::MaterializeOp;
use crate::exec::operators::sort::{compare_values, SortOp};
use crate::exec::row::{Row, Schema};

/// The phase the merge is in between two `next()` calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MergeState {
    /// Advancing the side with the lesser key until the keys are equal.
    Aligning,
    /// Emitting the current left row against the marked right-side group.
    EmittingGroup,
    /// One side ran out with nothing left to replay; terminal.
    Exhausted,
}

/// Orders two rows by their projected join-key values.
///
/// The order is the sort order of [`compare_values`]: natural per-type
/// comparison, Int and Float cross-compare, nulls last. A null key is
/// never `Equal` to any key, another null included; a pair of null keys
/// orders `Less` so the merge advances the left side past its null run.
#[derive(Debug, Clone, Copy)]
pub struct KeyComparator {
    /// Index of the join column in left-side rows.
    left_key: usize,
    /// Index of the join column in right-side rows.
    right_key: usize,
}

impl KeyComparator {
    /// Creates a comparator over the given column indices.
    #[must_use]
    pub const fn new(left_key: usize, right_key: usize) -> Self {
        Self { left_key, right_key }
    }

    /// Compares the join keys of a left-side and a right-side row.
    #[must_use]
    pub fn compare(&self, left: &Row, right: &Row) -> Ordering {
        let a = left.get(self.left_key).unwrap_or(&Value::Null);
        let b = right.get(self.right_key).unwrap_or(&Value::Null);
        if a.is_null() && b.is_null() {
            return Ordering::Less;
        }
        compare_values(a, b)
    }
}

/// Passes the left source through if it already reports the join column
/// in its sort order, otherwise wraps it in a sort stage.
fn prepare_left(source: BoxedOperator, column: &Arc<str>) -> BoxedOperator {
    if source.sorted_by().contains(column) {
        source
    } else {
        Box::new(SortOp::new(column.to_string(), source))
    }
}

/// Wraps the right source in a sort stage if it is unsorted; otherwise in
/// a materialize stage if it is not cheap to re-read; otherwise passes it
/// through. The merge backtracks over the right side, unlike the left, so
/// the right side always ends up materialized.
fn prepare_right(source: BoxedOperator, column: &Arc<str>) -> BoxedOperator {
    if !source.sorted_by().contains(column) {
        Box::new(SortOp::new(column.to_string(), source))
    } else if !source.materialized() {
        Box::new(MaterializeOp::new(source))
    } else {
        source
    }
}

/// Sort-merge join operator.
///
/// An equi-join over inputs ordered on the join key. Inputs that do not
/// report the required order or re-readability are wrapped at construction
/// time; the merge itself is oblivious to the wrapping.
///
/// Duplicate keys on both sides are supported: the right-side group is
/// marked when the keys first compare equal and replayed for every
/// consecutive left row carrying the same key, so a key appearing m times
/// on the left and n times on the right yields m×n output rows.
///
/// The output is ordered on the join key and the operator reports both
/// join columns in `sorted_by()`.
pub struct SortMergeJoinOp {
    /// Base operator state.
    base: OperatorBase,
    /// The join column on the left side.
    left_column: Arc<str>,
    /// The join column on the right side.
    right_column: Arc<str>,
    /// Join-key comparator.
    comparator: KeyComparator,
    /// Forward cursor over the prepared left input.
    left: ForwardCursor,
    /// Backtracking cursor over the prepared right input.
    right: BacktrackingCursor,
    /// Current left row, if any.
    left_row: Option<Row>,
    /// Current right row; `None` when the cursor ran out mid-group.
    right_row: Option<Row>,
    /// Current merge phase.
    state: MergeState,
}

impl SortMergeJoinOp {
    /// Creates a new sort-merge join operator.
    ///
    /// Resolves both join columns against their side's schema and prepares
    /// each input per its reported sort order and re-readability.
    ///
    /// # Errors
    ///
    /// Fails with a schema error if either column is missing from or
    /// ambiguous in its input's schema.
    pub fn try_new(
        left: BoxedOperator,
        right: BoxedOperator,
        left_column: &str,
        right_column: &str,
    ) -> ExecResult<Self> {
        let left_key = left.schema().resolve(left_column)?;
        let right_key = right.schema().resolve(right_column)?;

        let left_column: Arc<str> = Arc::from(left_column);
        let right_column: Arc<str> = Arc::from(right_column);

        let left = prepare_left(left, &left_column);
        let right = prepare_right(right, &right_column);

        let schema = Arc::new(left.schema().merge(&right.schema()));
        Ok(Self {
            base: OperatorBase::new(schema),
            left_column,
            right_column,
            comparator: KeyComparator::new(left_key, right_key),
            left: ForwardCursor::new(left),
            right: BacktrackingCursor::new(right),
            left_row: None,
            right_row: None,
            state: MergeState::Exhausted,
        })
    }
}

impl Operator for SortMergeJoinOp {
    fn open(&mut self, ctx: &ExecutionContext) -> OperatorResult<()> {
        self.left.open(ctx)?;
        self.right.open(ctx)?;
        self.left_row = self.left.advance()?;
        self.right_row = self.right.advance()?;
        self.state = if self.left_row.is_some() && self.right_row.is_some() {
            MergeState::Aligning
        } else {
            MergeState::Exhausted
        };
        self.base.set_open();
        Ok(())
    }

    fn next(&mut self) -> OperatorResult<Option<Row>> {
        loop {
            match self.state {
                MergeState::Exhausted => {
                    self.base.set_finished();
                    return Ok(None);
                }
                MergeState::Aligning => {
                    let (Some(left), Some(right)) = (&self.left_row, &self.right_row) else {
                        self.state = MergeState::Exhausted;
                        continue;
                    };
                    match self.comparator.compare(left, right) {
                        Ordering::Less => self.left_row = self.left.advance()?,
                        Ordering::Greater => self.right_row = self.right.advance()?,
                        Ordering::Equal => {
                            // The current right row starts the group.
                            self.right.mark_prev();
                            self.state = MergeState::EmittingGroup;
                        }
                    }
                }
                MergeState::EmittingGroup => {
                    let Some(left) = &self.left_row else {
                        self.state = MergeState::Exhausted;
                        continue;
                    };
                    if let Some(right) = &self.right_row {
                        if self.comparator.compare(left, right) == Ordering::Equal {
                            let joined = left.merge(right);
                            self.right_row = self.right.advance()?;
                            self.base.inc_rows_produced();
                            return Ok(Some(joined));
                        }
                    }

                    // The group ended for this left row: replay it against
                    // the next left row.
                    self.right.reset();
                    self.right_row = self.right.advance()?;
                    self.left_row = self.left.advance()?;
                    match (&self.left_row, &self.right_row) {
                        (Some(l), Some(r))
                            if self.comparator.compare(l, r) == Ordering::Equal =>
                        {
                            // A run of duplicate left keys joins the same
                            // group again.
                        }
                        (Some(_), _) => self.state = MergeState::Aligning,
                        (None, _) => self.state = MergeState::Exhausted,
                    }
                }
            }
        }
    }

    fn close(&mut self) -> OperatorResult<()> {
        self.left.close()?;
        self.right.close()?;
        self.left_row = None;
        self.right_row = None;
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
        "SortMergeJoin"
    }

    fn sorted_by(&self) -> Vec<Arc<str>> {
        vec![Arc::clone(&self.left_column), Arc::clone(&self.right_column)]
    }
}
