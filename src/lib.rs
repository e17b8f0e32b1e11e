//! Cooperative row-streaming wrappers over native SQL drivers.
//!
//! One query-execution pipeline: a shared-ownership [`Connection`] with an
//! explicit state machine, a blocking dispatch step, and a cooperative
//! [`RowStream`] generator that turns the server's result into row records
//! one step at a time - so huge result sets stream without starving other
//! work on the scheduler. Three equivalent delivery contracts (blocking
//! collect, future, per-row callback) sit on the one generator.
//!
//! ```rust
//! use sql_rowstream::prelude::*;
//!
//! # fn demo() -> Result<(), SqlRowStreamError> {
//! let conn = Connection::open::<SqliteDriver>(&ConnectConfig::new(":memory:"))?;
//! conn.exec_blocking("CREATE TABLE t (id INTEGER, name TEXT)")?;
//! conn.exec_blocking("INSERT INTO t VALUES (1, 'alice')")?;
//!
//! let rows = conn.exec_blocking("SELECT id, name FROM t")?;
//! assert_eq!(rows[0].get("name"), Some("alice"));
//! # Ok(()) }
//! # demo().unwrap();
//! ```
//!
//! Out of scope, by design: parameter binding, pooling, retries, and
//! transactions. URI parsing, TLS provisioning, the wire protocol, and
//! the scheduler itself are external collaborators - this crate only
//! produces step functions for a scheduler to drive.
//!
//! Known rough edges, documented rather than papered over: the dispatch
//! round trip is synchronous (only row iteration is cooperative), and a
//! delivered NULL is the literal string `"NULL"`, indistinguishable from
//! a text value spelling the same word.

pub mod config;
pub mod connection;
pub mod delivery;
pub mod driver;
pub mod error;
pub mod executor;
pub mod generator;
pub mod results;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub mod prelude;

pub use config::{ConnectConfig, TlsPaths};
pub use connection::{ConnState, Connection};
pub use delivery::{drive, exec, exec_blocking, exec_discard, exec_emit, exec_streamed};
pub use error::SqlRowStreamError;
pub use generator::{RowSink, RowStream, Step};
pub use results::{NULL_SENTINEL, Row};

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteDriver;
