// SQLite backend - implements the native-driver seam over rusqlite.
//
// - mod: driver and connection types
// - query: statement classification and frame materialization
//
// SQLite is an embedded engine, so only `dbname` from the config is
// meaningful (it is the database path; `:memory:` works). Host, user,
// password, port, and TLS paths are accepted and ignored.

mod query;

use tracing::debug;

use crate::config::ConnectConfig;
use crate::driver::{Dispatch, NativeConnection, NativeDriver};

/// Native driver over `rusqlite`.
pub struct SqliteDriver;

impl NativeDriver for SqliteDriver {
    fn connect(config: &ConnectConfig) -> Result<Box<dyn NativeConnection>, String> {
        let conn = rusqlite::Connection::open(&config.dbname).map_err(|e| e.to_string())?;
        debug!(path = %config.dbname, "sqlite database opened");
        Ok(Box::new(SqliteConnection { conn }))
    }
}

struct SqliteConnection {
    conn: rusqlite::Connection,
}

impl NativeConnection for SqliteConnection {
    fn dispatch(&mut self, command: &str) -> Dispatch {
        query::dispatch(&self.conn, command)
    }
}
