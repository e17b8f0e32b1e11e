use rusqlite::types::Value;

use crate::driver::{Dispatch, ResultFrame};

/// Fully-buffered response frame, the embedded analogue of a server
/// result handle: all rows are read at dispatch time, cells stay `None`
/// for SQL NULL until a row record is built above the seam.
struct SqliteFrame {
    columns: Vec<String>,
    cells: Vec<Vec<Option<String>>>,
}

impl ResultFrame for SqliteFrame {
    fn column_names(&self) -> &[String] {
        &self.columns
    }

    fn row_count(&self) -> usize {
        self.cells.len()
    }

    fn value(&self, row: usize, col: usize) -> Option<&str> {
        self.cells.get(row)?.get(col)?.as_deref()
    }
}

/// Run one command and classify the outcome.
///
/// Statements that can return rows (column count > 0) are evaluated and
/// materialized into a frame; everything else (DDL/DML) is executed for
/// its side effect and reports `Done`. Any engine error becomes `Failed`
/// carrying the engine's message.
pub(super) fn dispatch(conn: &rusqlite::Connection, command: &str) -> Dispatch {
    let mut stmt = match conn.prepare(command) {
        Ok(stmt) => stmt,
        Err(e) => return Dispatch::Failed(e.to_string()),
    };

    if stmt.column_count() == 0 {
        return match stmt.execute([]) {
            Ok(_) => Dispatch::Done,
            Err(e) => Dispatch::Failed(e.to_string()),
        };
    }

    let columns: Vec<String> = stmt
        .column_names()
        .iter()
        .map(std::string::ToString::to_string)
        .collect();
    let column_count = columns.len();

    let mut rows = match stmt.query([]) {
        Ok(rows) => rows,
        Err(e) => return Dispatch::Failed(e.to_string()),
    };

    let mut cells = Vec::new();
    loop {
        match rows.next() {
            Ok(Some(row)) => {
                let mut out = Vec::with_capacity(column_count);
                for idx in 0..column_count {
                    match row.get::<_, Value>(idx) {
                        Ok(value) => out.push(render(value)),
                        Err(e) => return Dispatch::Failed(e.to_string()),
                    }
                }
                cells.push(out);
            }
            Ok(None) => break,
            Err(e) => return Dispatch::Failed(e.to_string()),
        }
    }

    Dispatch::Rows(Box::new(SqliteFrame { columns, cells }))
}

/// Render an engine value to its text form; `None` is SQL NULL.
fn render(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::Integer(i) => Some(i.to_string()),
        Value::Real(f) => Some(f.to_string()),
        Value::Text(s) => Some(s),
        Value::Blob(b) => Some(String::from_utf8_lossy(&b).into_owned()),
    }
}
