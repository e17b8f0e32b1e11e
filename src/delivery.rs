// Result-delivery contracts - three thin adapters over one generator:
// - exec_blocking: drive to completion synchronously, collect rows
// - exec (future): dispatch, then drive cooperatively, resolve with rows
// - exec_emit: return after dispatch, rows flow to a callback as the
//   scheduler advances the stream
//
// All three preserve server row order and add no buffering semantics of
// their own. Dispatch-time errors are the only errors any of them can
// surface; a stream that has started cannot fail per-row.

use std::cell::RefCell;
use std::ops::ControlFlow;
use std::rc::Rc;

use crate::connection::Connection;
use crate::error::SqlRowStreamError;
use crate::executor;
use crate::generator::{RowSink, RowStream, Step};
use crate::results::Row;

/// Dispatch `command` and hand back the raw generator, for hosts that
/// drive their own scheduler. `Ok(None)` means the command succeeded
/// without rows and there is nothing to stream.
///
/// # Errors
/// Propagates the dispatch-time error classes from [`executor::dispatch`].
pub fn exec_streamed(
    conn: &Connection,
    command: &str,
    sink: Option<RowSink>,
) -> Result<Option<RowStream>, SqlRowStreamError> {
    let Some(frame) = executor::dispatch(conn, command)? else {
        return Ok(None);
    };
    Ok(Some(RowStream::new(conn.clone(), frame, sink)))
}

/// Blocking collect: drive the generator to completion on the calling
/// thread and return the rows in server order.
///
/// A busy connection is refused outright rather than waited on: whatever
/// stream holds it lives on this same thread (handles are `!Send`) and
/// cannot run while this call occupies the stack, so a wait here could
/// never end. The cooperative contracts are the ones that can overlap
/// streams on one connection.
///
/// # Errors
/// Returns the dispatch-time error, if any, or
/// [`SqlRowStreamError::ConnectionBusy`] when another stream holds the
/// connection; row iteration itself cannot fail.
pub fn exec_blocking(conn: &Connection, command: &str) -> Result<Vec<Row>, SqlRowStreamError> {
    let rows = Rc::new(RefCell::new(Vec::new()));
    let Some(mut stream) = exec_streamed(conn, command, Some(collect_sink(&rows)))? else {
        return Ok(Vec::new());
    };
    loop {
        match stream.step() {
            Step::Done => break,
            Step::RowEmitted => {}
            Step::WaitingForConnection => {
                // The holder is on this thread and cannot release while
                // we hold the stack; bail instead of spinning forever.
                // Dropping the stream disposes the undelivered frame.
                return Err(SqlRowStreamError::ConnectionBusy(
                    "connection is busy with another stream".to_string(),
                ));
            }
        }
    }
    drop(stream);
    Ok(rows.take())
}

/// Future contract: dispatch synchronously, then drive the generator
/// yielding to the scheduler after every step; resolves with the full
/// ordered sequence on exhaustion.
///
/// The dispatch round trip does not suspend - only row iteration is
/// cooperative. Rejection happens only for dispatch-time errors, never
/// mid-stream.
///
/// # Errors
/// Returns the dispatch-time error, if any.
pub async fn exec(conn: &Connection, command: &str) -> Result<Vec<Row>, SqlRowStreamError> {
    let rows = Rc::new(RefCell::new(Vec::new()));
    let Some(stream) = exec_streamed(conn, command, Some(collect_sink(&rows)))? else {
        return Ok(Vec::new());
    };
    drive(stream).await;
    Ok(rows.take())
}

/// Callback contract: returns right after dispatch; rows are delivered to
/// `callback` one at a time as the scheduler advances the generator.
/// There is no per-row error channel.
///
/// Must be called within a `tokio::task::LocalSet`, which is where the
/// stream task is registered.
///
/// # Errors
/// Returns the dispatch-time error, if any.
pub fn exec_emit<F>(
    conn: &Connection,
    command: &str,
    mut callback: F,
) -> Result<(), SqlRowStreamError>
where
    F: FnMut(Row) + 'static,
{
    let sink: RowSink = Box::new(move |row| {
        callback(row);
        ControlFlow::Continue(())
    });
    if let Some(stream) = exec_streamed(conn, command, Some(sink))? {
        tokio::task::spawn_local(drive(stream));
    }
    Ok(())
}

/// Fire-and-discard: dispatch, then let a sink-less stream release the
/// connection and dispose the frame off the caller's path.
///
/// Must be called within a `tokio::task::LocalSet`.
///
/// # Errors
/// Returns the dispatch-time error, if any.
pub fn exec_discard(conn: &Connection, command: &str) -> Result<(), SqlRowStreamError> {
    if let Some(stream) = exec_streamed(conn, command, None)? {
        tokio::task::spawn_local(drive(stream));
    }
    Ok(())
}

/// Drive a stream to exhaustion, yielding to the scheduler between steps.
/// This is the per-row suspension point of the future and callback
/// contracts.
pub async fn drive(mut stream: RowStream) {
    while stream.step() != Step::Done {
        tokio::task::yield_now().await;
    }
}

fn collect_sink(rows: &Rc<RefCell<Vec<Row>>>) -> RowSink {
    let rows = Rc::clone(rows);
    Box::new(move |row| {
        rows.borrow_mut().push(row);
        ControlFlow::Continue(())
    })
}

impl Connection {
    /// Blocking collect contract. See [`exec_blocking`].
    ///
    /// # Errors
    /// Returns the dispatch-time error, if any.
    pub fn exec_blocking(&self, command: &str) -> Result<Vec<Row>, SqlRowStreamError> {
        exec_blocking(self, command)
    }

    /// Future contract. See [`exec`].
    ///
    /// # Errors
    /// Returns the dispatch-time error, if any.
    pub async fn exec(&self, command: &str) -> Result<Vec<Row>, SqlRowStreamError> {
        exec(self, command).await
    }

    /// Callback contract. See [`exec_emit`].
    ///
    /// # Errors
    /// Returns the dispatch-time error, if any.
    pub fn exec_emit<F>(&self, command: &str, callback: F) -> Result<(), SqlRowStreamError>
    where
        F: FnMut(Row) + 'static,
    {
        exec_emit(self, command, callback)
    }

    /// Fire-and-discard contract. See [`exec_discard`].
    ///
    /// # Errors
    /// Returns the dispatch-time error, if any.
    pub fn exec_discard(&self, command: &str) -> Result<(), SqlRowStreamError> {
        exec_discard(self, command)
    }

    /// Raw generator access. See [`exec_streamed`].
    ///
    /// # Errors
    /// Returns the dispatch-time error, if any.
    pub fn exec_streamed(
        &self,
        command: &str,
        sink: Option<RowSink>,
    ) -> Result<Option<RowStream>, SqlRowStreamError> {
        exec_streamed(self, command, sink)
    }
}
