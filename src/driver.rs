// Native driver seam - everything wire-protocol-shaped lives behind these
// traits. The streaming layer never sees driver types directly:
// - NativeDriver: opens a connection from a ConnectConfig
// - NativeConnection: one synchronous dispatch per command
// - ResultFrame: the opaque, fully-buffered server response

use crate::config::ConnectConfig;

/// Outcome of dispatching one command to the server, classified at the
/// driver boundary.
pub enum Dispatch {
    /// The result carries rows; the frame is handed to a row stream.
    Rows(Box<dyn ResultFrame>),
    /// Successful command with no rows to return (DDL/DML).
    Done,
    /// The server rejected the command; the text is the driver's
    /// last-error message. Any partial result has already been disposed.
    Failed(String),
}

/// Factory for native connections.
pub trait NativeDriver {
    /// Attempt the native connect.
    ///
    /// # Errors
    /// Returns the driver's last-error text if the connect fails.
    fn connect(config: &ConnectConfig) -> Result<Box<dyn NativeConnection>, String>;
}

/// An open native connection.
///
/// `dispatch` is a synchronous round trip: the command is sent and the
/// server's complete initial response is awaited before returning. Only
/// row iteration above this seam is cooperative; the dispatch itself is
/// not. Physical close happens when the box is dropped.
pub trait NativeConnection {
    fn dispatch(&mut self, command: &str) -> Dispatch;
}

/// Opaque server response holding the full set of returned rows.
///
/// Owned exclusively by whichever row stream is processing it; dropping
/// the box is the disposal, so it happens exactly once by construction.
/// A `None` cell is a genuine SQL NULL - the string conflation with the
/// `"NULL"` sentinel happens later, when a [`Row`](crate::results::Row)
/// record is built.
pub trait ResultFrame {
    /// Column names in server-returned order.
    fn column_names(&self) -> &[String];

    /// Number of rows in the response.
    fn row_count(&self) -> usize;

    /// Cell value at (`row`, `col`); `None` for SQL NULL.
    fn value(&self, row: usize, col: usize) -> Option<&str>;
}
