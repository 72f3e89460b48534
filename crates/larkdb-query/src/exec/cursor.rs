//! Row cursors over operator streams.
//!
//! Cursors adapt the [`Operator`](super::operator::Operator) pull contract
//! (`next()` returning `Ok(None)` at the end) into an explicit
//! has-next / take-next surface, and add backtracking for consumers that
//! must replay a bounded range of already-seen rows.

use crate::error::{ExecError, ExecResult};

use super::context::ExecutionContext;
use super::operator::{BoxedOperator, OperatorResult};
use super::row::{Row, Schema};
use std::sync::Arc;

/// The pull contract for row cursors.
///
/// `has_next` is a query: it may fetch ahead internally but never skips a
/// row. `take_next` returns the next row and fails with
/// [`ExecError::NoMoreRows`] once the cursor is exhausted; callers check
/// `has_next` first. Exhaustion is permanent.
pub trait RowCursor {
    /// Returns true if another row is available.
    fn has_next(&mut self) -> ExecResult<bool>;

    /// Returns the next row.
    ///
    /// # Errors
    ///
    /// Fails with [`ExecError::NoMoreRows`] if the cursor is exhausted.
    fn take_next(&mut self) -> ExecResult<Row>;

    /// Returns the next row, or `None` if the cursor is exhausted.
    fn advance(&mut self) -> ExecResult<Option<Row>> {
        if self.has_next()? {
            Ok(Some(self.take_next()?))
        } else {
            Ok(None)
        }
    }

    /// Removes the current row from the underlying stream.
    ///
    /// Rows are immutable once produced; removal through a cursor is
    /// rejected unconditionally.
    fn remove_current(&mut self) -> ExecResult<()> {
        Err(ExecError::Unsupported("remove through a row cursor".to_string()))
    }
}

/// A single-pass cursor over an operator's output with one row of lookahead.
pub struct ForwardCursor {
    /// The operator producing the rows.
    input: BoxedOperator,
    /// The row fetched ahead by `has_next`, if any.
    lookahead: Option<Row>,
    /// Whether the input has reported exhaustion.
    done: bool,
}

impl ForwardCursor {
    /// Creates a new forward cursor over the given operator.
    #[must_use]
    pub fn new(input: BoxedOperator) -> Self {
        Self { input, lookahead: None, done: false }
    }

    /// Opens the underlying operator.
    pub fn open(&mut self, ctx: &ExecutionContext) -> OperatorResult<()> {
        self.lookahead = None;
        self.done = false;
        self.input.open(ctx)
    }

    /// Closes the underlying operator.
    pub fn close(&mut self) -> OperatorResult<()> {
        self.lookahead = None;
        self.input.close()
    }

    /// Returns the schema of the rows this cursor yields.
    #[must_use]
    pub fn schema(&self) -> Arc<Schema> {
        self.input.schema()
    }
}

impl RowCursor for ForwardCursor {
    fn has_next(&mut self) -> ExecResult<bool> {
        if self.lookahead.is_some() {
            return Ok(true);
        }
        if self.done {
            return Ok(false);
        }
        match self.input.next()? {
            Some(row) => {
                self.lookahead = Some(row);
                Ok(true)
            }
            None => {
                self.done = true;
                Ok(false)
            }
        }
    }

    fn take_next(&mut self) -> ExecResult<Row> {
        if !self.has_next()? {
            return Err(ExecError::NoMoreRows);
        }
        self.lookahead.take().ok_or(ExecError::NoMoreRows)
    }
}

/// A cursor that can rewind to a marked position and replay rows.
///
/// The cursor buffers every row read from the input since the active mark.
/// `reset` rewinds to the mark; subsequent reads replay the buffered rows
/// in their original order before pulling fresh rows from the input. At
/// most one mark is active at a time: placing a new mark moves it forward
/// and releases the rows buffered before it. The buffer is owned
/// exclusively by the cursor and is subject to the execution config's
/// in-memory row limit.
pub struct BacktrackingCursor {
    /// The operator producing the rows.
    input: BoxedOperator,
    /// Rows read from the input since the mark, in read order.
    buffer: Vec<Row>,
    /// Index into the buffer of the next row to serve.
    pos: usize,
    /// Whether the input has reported exhaustion.
    done: bool,
    /// Maximum rows the buffer may hold (0 = no limit).
    max_rows: usize,
}

impl BacktrackingCursor {
    /// Creates a new backtracking cursor over the given operator.
    #[must_use]
    pub fn new(input: BoxedOperator) -> Self {
        Self { input, buffer: Vec::new(), pos: 0, done: false, max_rows: 0 }
    }

    /// Opens the underlying operator and adopts the context's row limit.
    pub fn open(&mut self, ctx: &ExecutionContext) -> OperatorResult<()> {
        self.buffer.clear();
        self.pos = 0;
        self.done = false;
        self.max_rows = ctx.max_rows_in_memory();
        self.input.open(ctx)
    }

    /// Closes the underlying operator and releases the buffer.
    pub fn close(&mut self) -> OperatorResult<()> {
        self.buffer.clear();
        self.pos = 0;
        self.input.close()
    }

    /// Returns the schema of the rows this cursor yields.
    #[must_use]
    pub fn schema(&self) -> Arc<Schema> {
        self.input.schema()
    }

    /// Moves the mark to the most recently returned row.
    ///
    /// After `reset`, that row is the first one replayed. Rows buffered
    /// before the new mark are released. Without a preceding read this is
    /// a no-op: the mark stays at the front of the buffer.
    pub fn mark_prev(&mut self) {
        let keep_from = self.pos.saturating_sub(1);
        self.buffer.drain(..keep_from);
        self.pos -= keep_from;
    }

    /// Moves the mark to just before the next unread row.
    ///
    /// After `reset`, reading resumes at the row that had not yet been
    /// returned when the mark was placed.
    pub fn mark_next(&mut self) {
        self.buffer.drain(..self.pos);
        self.pos = 0;
    }

    /// Rewinds to the mark; reads replay the buffered rows from there.
    pub fn reset(&mut self) {
        self.pos = 0;
    }

    /// Pulls one row from the input into the buffer.
    ///
    /// Returns false if the input is exhausted.
    fn fill_one(&mut self) -> ExecResult<bool> {
        if self.done {
            return Ok(false);
        }
        match self.input.next()? {
            Some(row) => {
                self.buffer.push(row);
                if self.max_rows > 0 && self.buffer.len() > self.max_rows {
                    return Err(ExecError::QueryTooLarge {
                        actual: self.buffer.len(),
                        limit: self.max_rows,
                    });
                }
                Ok(true)
            }
            None => {
                self.done = true;
                Ok(false)
            }
        }
    }
}

impl RowCursor for BacktrackingCursor {
    fn has_next(&mut self) -> ExecResult<bool> {
        if self.pos < self.buffer.len() {
            return Ok(true);
        }
        self.fill_one()
    }

    fn take_next(&mut self) -> ExecResult<Row> {
        if !self.has_next()? {
            return Err(ExecError::NoMoreRows);
        }
        let row = self.buffer[self.pos].clone();
        self.pos += 1;
        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::operators::ValuesOp;
    use larkdb_core::Value;

    fn int_rows(values: &[i64]) -> BoxedOperator {
        Box::new(ValuesOp::with_columns(
            vec!["x".to_string()],
            values.iter().map(|&v| vec![Value::Int(v)]).collect(),
        ))
    }

    fn key(row: &Row) -> i64 {
        row.get(0).and_then(Value::as_int).unwrap()
    }

    #[test]
    fn forward_cursor_basic() {
        let mut cursor = ForwardCursor::new(int_rows(&[1, 2]));
        cursor.open(&ExecutionContext::new()).unwrap();

        assert!(cursor.has_next().unwrap());
        assert_eq!(key(&cursor.take_next().unwrap()), 1);
        assert_eq!(key(&cursor.take_next().unwrap()), 2);

        assert!(!cursor.has_next().unwrap());
        cursor.close().unwrap();
    }

    #[test]
    fn forward_cursor_exhaustion_is_permanent() {
        let mut cursor = ForwardCursor::new(int_rows(&[7]));
        cursor.open(&ExecutionContext::new()).unwrap();

        assert_eq!(key(&cursor.take_next().unwrap()), 7);
        assert!(!cursor.has_next().unwrap());
        assert!(matches!(cursor.take_next(), Err(ExecError::NoMoreRows)));
        // Still false and still failing afterwards.
        assert!(!cursor.has_next().unwrap());
        assert!(matches!(cursor.take_next(), Err(ExecError::NoMoreRows)));
    }

    #[test]
    fn remove_is_rejected() {
        let mut cursor = ForwardCursor::new(int_rows(&[1]));
        cursor.open(&ExecutionContext::new()).unwrap();
        assert!(matches!(cursor.remove_current(), Err(ExecError::Unsupported(_))));
    }

    #[test]
    fn backtracking_mark_prev_replays_current_row() {
        let mut cursor = BacktrackingCursor::new(int_rows(&[1, 2, 3]));
        cursor.open(&ExecutionContext::new()).unwrap();

        assert_eq!(key(&cursor.take_next().unwrap()), 1);
        cursor.mark_prev();

        assert_eq!(key(&cursor.take_next().unwrap()), 2);
        cursor.reset();

        // Replays from the marked row onward.
        assert_eq!(key(&cursor.take_next().unwrap()), 1);
        assert_eq!(key(&cursor.take_next().unwrap()), 2);
        assert_eq!(key(&cursor.take_next().unwrap()), 3);
        assert!(!cursor.has_next().unwrap());
    }

    #[test]
    fn backtracking_mark_next_skips_returned_rows() {
        let mut cursor = BacktrackingCursor::new(int_rows(&[1, 2, 3]));
        cursor.open(&ExecutionContext::new()).unwrap();

        assert_eq!(key(&cursor.take_next().unwrap()), 1);
        cursor.mark_next();

        assert_eq!(key(&cursor.take_next().unwrap()), 2);
        cursor.reset();

        // The mark sits after row 1, so replay starts at row 2.
        assert_eq!(key(&cursor.take_next().unwrap()), 2);
        assert_eq!(key(&cursor.take_next().unwrap()), 3);
    }

    #[test]
    fn marking_again_moves_the_mark_forward() {
        let mut cursor = BacktrackingCursor::new(int_rows(&[1, 2, 3, 4]));
        cursor.open(&ExecutionContext::new()).unwrap();

        cursor.take_next().unwrap();
        cursor.mark_prev(); // mark at 1
        cursor.take_next().unwrap();
        cursor.take_next().unwrap();
        cursor.mark_prev(); // mark moves to 3

        cursor.reset();
        assert_eq!(key(&cursor.take_next().unwrap()), 3);
        assert_eq!(key(&cursor.take_next().unwrap()), 4);
    }

    #[test]
    fn reset_replays_deterministically() {
        let mut cursor = BacktrackingCursor::new(int_rows(&[5, 6]));
        cursor.open(&ExecutionContext::new()).unwrap();

        cursor.take_next().unwrap();
        cursor.mark_prev();

        for _ in 0..3 {
            cursor.reset();
            assert_eq!(key(&cursor.take_next().unwrap()), 5);
            assert_eq!(key(&cursor.take_next().unwrap()), 6);
            assert!(!cursor.has_next().unwrap());
        }
    }

    #[test]
    fn buffer_limit_is_enforced() {
        let mut cursor = BacktrackingCursor::new(int_rows(&[1, 2, 3, 4, 5]));
        let ctx = ExecutionContext::new()
            .with_config(crate::exec::ExecutionConfig::new().with_max_rows_in_memory(2));
        cursor.open(&ctx).unwrap();

        cursor.take_next().unwrap();
        cursor.take_next().unwrap();
        assert!(matches!(cursor.take_next(), Err(ExecError::QueryTooLarge { limit: 2, .. })));
    }

    #[test]
    fn advance_returns_none_at_end() {
        let mut cursor = ForwardCursor::new(int_rows(&[9]));
        cursor.open(&ExecutionContext::new()).unwrap();

        assert_eq!(cursor.advance().unwrap().map(|r| key(&r)), Some(9));
        assert_eq!(cursor.advance().unwrap().map(|r| key(&r)), None);
    }
}
