//! Convenient imports for common functionality.
//!
//! Re-exports the types most callers need to open a connection and run
//! queries through any of the delivery contracts.

pub use crate::config::{ConnectConfig, TlsPaths};
pub use crate::connection::{ConnState, Connection};
pub use crate::error::SqlRowStreamError;
pub use crate::generator::{RowSink, RowStream, Step};
pub use crate::results::{NULL_SENTINEL, Row};

#[cfg(feature = "sqlite")]
pub use crate::sqlite::SqliteDriver;
