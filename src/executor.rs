use tracing::debug;

use crate::connection::Connection;
use crate::driver::{Dispatch, ResultFrame};
use crate::error::SqlRowStreamError;

/// Validate preconditions, dispatch one command, classify the outcome.
///
/// Returns `Some(frame)` when the result carries rows (the frame is to be
/// handed to exactly one row stream), `None` for a successful no-rows
/// command (DDL/DML - the empty-sequence success).
///
/// The round trip itself is blocking at the call site: the command goes
/// out and the server's complete response comes back before this returns.
/// Only row iteration above this point is cooperative; that asymmetry is
/// inherited, not a feature.
///
/// # Errors
/// - [`SqlRowStreamError::ClosedConnection`] if `command` is empty or the
///   connection is closed or never opened - no driver call is made.
/// - [`SqlRowStreamError::DatabaseError`] if the server rejects the
///   command; the driver has already disposed any partial result.
pub fn dispatch(
    conn: &Connection,
    command: &str,
) -> Result<Option<Box<dyn ResultFrame>>, SqlRowStreamError> {
    if command.is_empty() {
        return Err(SqlRowStreamError::ClosedConnection(
            "empty command".to_string(),
        ));
    }
    if conn.is_closed() {
        return Err(SqlRowStreamError::ClosedConnection(
            "connection is closed".to_string(),
        ));
    }

    match conn.with_native(|native| native.dispatch(command))? {
        Dispatch::Rows(frame) => {
            debug!(rows = frame.row_count(), "dispatch returned rows");
            Ok(Some(frame))
        }
        Dispatch::Done => {
            debug!("dispatch completed without rows");
            Ok(None)
        }
        Dispatch::Failed(message) => {
            debug!(%message, "dispatch rejected by server");
            Err(SqlRowStreamError::DatabaseError(message))
        }
    }
}
