use std::ops::ControlFlow;
use std::rc::Rc;

use tracing::debug;

use crate::connection::Connection;
use crate::driver::ResultFrame;
use crate::results::{NULL_SENTINEL, Row};

/// Per-row consumer. Return `ControlFlow::Break(())` to stop the stream
/// early; the connection is released and the frame disposed either way.
pub type RowSink = Box<dyn FnMut(Row) -> ControlFlow<()>>;

/// What one call to [`RowStream::step`] accomplished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The connection is held by another stream; no progress was made.
    /// Step again after yielding to the scheduler.
    WaitingForConnection,
    /// One row was built and fed to the sink.
    RowEmitted,
    /// The stream is finished: connection released, frame disposed.
    /// Further steps keep returning `Done`.
    Done,
}

enum GenState {
    WaitForConnection,
    StreamRow(usize),
    Finished,
}

/// Cooperative row-streaming generator.
///
/// A step function, not a task: each [`step`](RowStream::step) call does a
/// bounded unit of work - at most one row - and returns control to
/// whatever scheduler is driving it. The two suspension points are waiting
/// for a busy connection and the gap after each emitted row; the schema
/// read is O(columns) and shares a step with the first row.
///
/// The stream owns the result frame exclusively. On exhaustion, early
/// abort, or drop, the connection's BUSY flag is cleared and the frame
/// dropped, each exactly once. Once dispatch has succeeded there is no
/// per-row failure path: every cell is a string or the NULL sentinel.
pub struct RowStream {
    conn: Connection,
    frame: Option<Box<dyn ResultFrame>>,
    sink: Option<RowSink>,
    columns: Option<Rc<Vec<String>>>,
    state: GenState,
    holds_busy: bool,
}

impl RowStream {
    pub(crate) fn new(conn: Connection, frame: Box<dyn ResultFrame>, sink: Option<RowSink>) -> Self {
        Self {
            conn,
            frame: Some(frame),
            sink,
            columns: None,
            state: GenState::WaitForConnection,
            holds_busy: false,
        }
    }

    /// Advance the stream by one bounded unit of work.
    pub fn step(&mut self) -> Step {
        match self.state {
            GenState::WaitForConnection => {
                if !self.conn.try_mark_busy() {
                    return Step::WaitingForConnection;
                }
                self.holds_busy = true;

                // Completion-only use: nothing consumes rows, so dispose
                // the frame and let go immediately.
                if self.sink.is_none() {
                    self.finish();
                    return Step::Done;
                }

                let columns = self
                    .frame
                    .as_deref()
                    .map(|frame| Rc::new(frame.column_names().to_vec()));
                let Some(columns) = columns else {
                    self.finish();
                    return Step::Done;
                };
                self.columns = Some(columns);
                self.emit(0)
            }
            GenState::StreamRow(index) => self.emit(index),
            GenState::Finished => Step::Done,
        }
    }

    /// Build and deliver the row at `index`, or finish on exhaustion.
    fn emit(&mut self, index: usize) -> Step {
        let Some(columns) = self.columns.clone() else {
            self.finish();
            return Step::Done;
        };

        let values: Option<Vec<String>> = self.frame.as_deref().and_then(|frame| {
            if index >= frame.row_count() {
                return None;
            }
            Some(
                (0..columns.len())
                    .map(|col| {
                        frame
                            .value(index, col)
                            .map_or_else(|| NULL_SENTINEL.to_string(), str::to_string)
                    })
                    .collect(),
            )
        });
        let Some(values) = values else {
            self.finish();
            return Step::Done;
        };

        let stopped = match self.sink.as_mut() {
            Some(sink) => sink(Row::new(columns, values)).is_break(),
            None => true,
        };
        if stopped {
            debug!(row = index, "consumer stopped the stream early");
            self.finish();
            return Step::Done;
        }

        self.state = GenState::StreamRow(index + 1);
        Step::RowEmitted
    }

    /// Release the connection and dispose the frame, exactly once.
    fn finish(&mut self) {
        if self.holds_busy {
            self.conn.release();
            self.holds_busy = false;
        }
        self.frame = None;
        self.sink = None;
        self.state = GenState::Finished;
    }
}

impl Drop for RowStream {
    fn drop(&mut self) {
        // An abandoned stream must not wedge the connection.
        self.finish();
    }
}
