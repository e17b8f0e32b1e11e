#![cfg(feature = "sqlite")]

use std::cell::RefCell;
use std::rc::Rc;

use sql_rowstream::prelude::*;

fn seeded_conn() -> Result<Connection, SqlRowStreamError> {
    let conn = Connection::open::<SqliteDriver>(&ConnectConfig::new(":memory:"))?;
    conn.exec_blocking("CREATE TABLE nums (n INTEGER)")?;
    conn.exec_blocking("INSERT INTO nums VALUES (1), (2), (3)")?;
    Ok(conn)
}

#[tokio::test]
async fn future_contract_resolves_with_ordered_rows() -> Result<(), SqlRowStreamError> {
    let conn = seeded_conn()?;
    let rows = conn.exec("SELECT n FROM nums ORDER BY n").await?;

    let values: Vec<&str> = rows.iter().filter_map(|r| r.get("n")).collect();
    assert_eq!(values, ["1", "2", "3"]);
    assert!(!conn.is_busy());
    Ok(())
}

#[tokio::test]
async fn future_contract_rejects_on_dispatch_error() -> Result<(), SqlRowStreamError> {
    let conn = seeded_conn()?;
    let err = conn.exec("SELEC oops").await.unwrap_err();
    assert!(matches!(err, SqlRowStreamError::DatabaseError(_)));
    assert!(!conn.is_busy());
    Ok(())
}

#[tokio::test]
async fn concurrent_futures_on_one_connection_both_complete()
-> Result<(), SqlRowStreamError> {
    let conn = seeded_conn()?;
    // Both dispatch immediately; the single-flight guard serializes row
    // processing, and cooperative yielding lets the two interleave on
    // one task without deadlock.
    let (a, b) = tokio::join!(
        conn.exec("SELECT n FROM nums ORDER BY n"),
        conn.exec("SELECT n FROM nums ORDER BY n DESC"),
    );
    assert_eq!(a?.len(), 3);
    assert_eq!(b?.len(), 3);
    assert!(!conn.is_busy());
    Ok(())
}

#[tokio::test]
async fn emit_contract_returns_before_rows_flow() -> Result<(), Box<dyn std::error::Error>> {
    let local = tokio::task::LocalSet::new();
    local
        .run_until(async {
            let conn = seeded_conn()?;
            let seen: Rc<RefCell<Vec<Row>>> = Rc::new(RefCell::new(Vec::new()));

            {
                let seen = Rc::clone(&seen);
                conn.exec_emit("SELECT n FROM nums ORDER BY n", move |row| {
                    seen.borrow_mut().push(row);
                })?;
            }

            // exec_emit returns right after dispatch; nothing has been
            // delivered until the scheduler advances the stream.
            assert!(seen.borrow().is_empty());

            for _ in 0..64 {
                if seen.borrow().len() == 3 {
                    break;
                }
                tokio::task::yield_now().await;
            }

            let seen = seen.borrow();
            assert_eq!(seen.len(), 3);
            assert_eq!(seen[0].get("n"), Some("1"));
            assert_eq!(seen[2].get("n"), Some("3"));
            Ok::<_, SqlRowStreamError>(())
        })
        .await?;
    Ok(())
}

#[tokio::test]
async fn emit_contract_reports_dispatch_errors_synchronously()
-> Result<(), Box<dyn std::error::Error>> {
    let local = tokio::task::LocalSet::new();
    local
        .run_until(async {
            let conn = seeded_conn()?;
            let err = conn.exec_emit("SELEC oops", |_row| {}).unwrap_err();
            assert!(matches!(err, SqlRowStreamError::DatabaseError(_)));
            Ok::<_, SqlRowStreamError>(())
        })
        .await?;
    Ok(())
}

#[tokio::test]
async fn discard_contract_releases_the_connection() -> Result<(), Box<dyn std::error::Error>> {
    let local = tokio::task::LocalSet::new();
    local
        .run_until(async {
            let conn = seeded_conn()?;
            conn.exec_discard("SELECT n FROM nums")?;

            for _ in 0..64 {
                if !conn.is_busy() {
                    break;
                }
                tokio::task::yield_now().await;
            }
            assert!(!conn.is_busy());

            // The connection is immediately reusable.
            let rows = conn.exec("SELECT n FROM nums").await?;
            assert_eq!(rows.len(), 3);
            Ok::<_, SqlRowStreamError>(())
        })
        .await?;
    Ok(())
}
