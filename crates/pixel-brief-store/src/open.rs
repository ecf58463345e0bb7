//! Connection bootstrap.

use std::path::Path;
use std::time::{Duration, Instant};

use rusqlite::Connection;

use crate::migrations::apply_migrations;
use crate::orders::OrderStore;
use crate::StoreResult;

/// Open (or create) the store file and apply pending migrations.
pub fn open_store(path: impl AsRef<Path>) -> StoreResult<OrderStore> {
    let path = path.as_ref();
    let started_at = Instant::now();

    let conn = Connection::open(path).map_err(|err| {
        tracing::error!(
            path = %path.display(),
            error = %err,
            "event=store_open status=error mode=file"
        );
        err
    })?;

    let conn = bootstrap(conn, "file", started_at)?;
    tracing::info!(path = %path.display(), "Opened record store");
    Ok(OrderStore::new(conn))
}

/// Open an in-memory store.
pub fn open_store_in_memory() -> StoreResult<OrderStore> {
    let started_at = Instant::now();
    let conn = Connection::open_in_memory()?;
    let conn = bootstrap(conn, "memory", started_at)?;
    Ok(OrderStore::new(conn))
}

fn bootstrap(
    mut conn: Connection,
    mode: &'static str,
    started_at: Instant,
) -> StoreResult<Connection> {
    match configure(&mut conn) {
        Ok(()) => {
            tracing::debug!(
                mode,
                duration_ms = started_at.elapsed().as_millis() as u64,
                "event=store_open status=ok"
            );
            Ok(conn)
        }
        Err(err) => {
            tracing::error!(
                mode,
                duration_ms = started_at.elapsed().as_millis() as u64,
                error = %err,
                "event=store_open status=error"
            );
            Err(err)
        }
    }
}

fn configure(conn: &mut Connection) -> StoreResult<()> {
    conn.busy_timeout(Duration::from_secs(5))?;
    apply_migrations(conn)
}
