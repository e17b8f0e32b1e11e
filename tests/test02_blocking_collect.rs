#![cfg(feature = "sqlite")]

use sql_rowstream::prelude::*;

fn seeded_conn() -> Connection {
    let conn =
        Connection::open::<SqliteDriver>(&ConnectConfig::new(":memory:")).expect("open :memory:");
    conn.exec_blocking("CREATE TABLE people (id INTEGER, name TEXT, nickname TEXT)")
        .expect("ddl");
    conn.exec_blocking(
        "INSERT INTO people VALUES (1, 'alice', 'al'), (2, 'bob', NULL), (3, 'carol', 'NULL')",
    )
    .expect("seed");
    conn
}

#[test]
fn select_one_literal() -> Result<(), SqlRowStreamError> {
    let conn = Connection::open::<SqliteDriver>(&ConnectConfig::new(":memory:"))?;
    let rows = conn.exec_blocking("SELECT 1")?;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].len(), 1);
    assert_eq!(rows[0].values()[0], "1");
    Ok(())
}

#[test]
fn rows_arrive_in_server_order_with_all_columns() -> Result<(), SqlRowStreamError> {
    let conn = seeded_conn();
    let rows = conn.exec_blocking("SELECT id, name, nickname FROM people ORDER BY id")?;

    assert_eq!(rows.len(), 3);
    for row in &rows {
        assert_eq!(row.columns(), ["id", "name", "nickname"]);
        assert_eq!(row.len(), 3);
    }
    assert_eq!(rows[0].get("name"), Some("alice"));
    assert_eq!(rows[1].get("name"), Some("bob"));
    assert_eq!(rows[2].get("name"), Some("carol"));
    Ok(())
}

#[test]
fn null_is_the_sentinel_and_collides_with_literal_text() -> Result<(), SqlRowStreamError> {
    let conn = seeded_conn();
    let rows = conn.exec_blocking("SELECT nickname FROM people ORDER BY id")?;

    // bob's nickname is a true SQL NULL; carol's is the text 'NULL'.
    // Both arrive as the sentinel - the collision is a documented
    // property of the record format, not something this layer resolves.
    assert_eq!(rows[1].get("nickname"), Some(NULL_SENTINEL));
    assert_eq!(rows[2].get("nickname"), Some(NULL_SENTINEL));
    assert_eq!(rows[1].get("nickname"), rows[2].get("nickname"));
    Ok(())
}

#[test]
fn empty_command_is_rejected_before_dispatch() {
    let conn = seeded_conn();
    let err = conn.exec_blocking("").unwrap_err();
    assert!(matches!(err, SqlRowStreamError::ClosedConnection(_)));
    assert!(err.is_precondition());
}

#[test]
fn malformed_sql_surfaces_the_engine_message() {
    let conn = seeded_conn();
    let err = conn.exec_blocking("SELEC 1").unwrap_err();
    match err {
        SqlRowStreamError::DatabaseError(message) => {
            assert!(message.contains("syntax error"), "got: {message}");
        }
        other => panic!("expected DatabaseError, got {other:?}"),
    }

    // The failure must leave the connection open and not busy.
    assert!(!conn.is_closed());
    assert!(!conn.is_busy());
    assert!(conn.exec_blocking("SELECT 1").is_ok());
}

#[test]
fn ddl_and_dml_yield_an_empty_sequence() -> Result<(), SqlRowStreamError> {
    let conn = seeded_conn();
    assert!(conn.exec_blocking("CREATE TABLE empty_t (x INTEGER)")?.is_empty());
    assert!(conn.exec_blocking("UPDATE people SET name = 'dave' WHERE id = 99")?.is_empty());
    assert!(!conn.is_busy());
    Ok(())
}

#[test]
fn zero_row_select_still_reports_columns_upstream() -> Result<(), SqlRowStreamError> {
    let conn = seeded_conn();
    let rows = conn.exec_blocking("SELECT id FROM people WHERE id = 42")?;
    assert!(rows.is_empty());
    assert!(!conn.is_busy());
    Ok(())
}
