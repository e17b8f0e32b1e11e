use thiserror::Error;

/// Error surface for the row-streaming layer.
///
/// One variant per failure class; each carries the human-readable message
/// from the native driver's last-error text where one exists. Nothing at
/// this layer retries, and nothing aborts the process: every failure is
/// returned, rejected, or reported through the chosen delivery adapter.
#[derive(Debug, Error)]
pub enum SqlRowStreamError {
    /// The native connect failed. The handle is left permanently unusable.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Exec was attempted with an empty command, or on a closed or
    /// never-opened connection. Raised before any driver call is made.
    #[error("Connection closed: {0}")]
    ClosedConnection(String),

    /// The server rejected the dispatched command. The result handle has
    /// been disposed and the connection released by the time this surfaces.
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// Blocking collect was invoked while another stream held the
    /// connection. The holder lives on the same single-scheduler thread
    /// and cannot progress while the collect occupies the stack, so
    /// waiting could never end; the call refuses instead. The cooperative
    /// contracts are unaffected - they yield and let the holder drain.
    #[error("Connection busy: {0}")]
    ConnectionBusy(String),
}

impl SqlRowStreamError {
    /// Check whether this error was raised before any driver call.
    #[must_use]
    pub fn is_precondition(&self) -> bool {
        matches!(self, Self::ClosedConnection(_))
    }
}
