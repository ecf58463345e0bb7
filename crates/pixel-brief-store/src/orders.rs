//! Saved order rows.
//!
//! Rows are append-only: a save inserts one summarized row, history reads
//! them back newest first.

use std::sync::{Mutex, MutexGuard};

use pixel_brief_model::Brief;
use rusqlite::{params, Connection, Row};
use serde::Serialize;

use crate::{StoreError, StoreResult};

const HISTORY_DEFAULT_LIMIT: u32 = 50;
const HISTORY_LIMIT_MAX: u32 = 500;

const ORDER_SELECT_SQL: &str = "SELECT
    id,
    order_name,
    platform,
    deadline,
    content_summary,
    created_at
FROM orders";

/// A row to append to the log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub order_name: String,
    /// Platform name only, the layout is not stored.
    pub platform: String,
    /// Deadline display string, `dd/mm/YYYY HH:MM`
    pub deadline: String,
    pub content_summary: String,
}

impl NewOrder {
    /// Summarize a validated brief into a row.
    pub fn from_brief(brief: &Brief) -> Self {
        Self {
            order_name: brief.order_name.clone(),
            platform: brief.platform.name().to_string(),
            deadline: brief.deadline.display(),
            content_summary: brief.summary(),
        }
    }
}

/// A stored row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderRecord {
    pub id: i64,
    pub order_name: Option<String>,
    pub platform: Option<String>,
    pub deadline: Option<String>,
    pub content_summary: Option<String>,
    /// SQLite `CURRENT_TIMESTAMP`, UTC `YYYY-MM-DD HH:MM:SS`
    pub created_at: Option<String>,
}

/// SQLite-backed order log.
///
/// The connection sits behind a mutex so one store can be shared across
/// request handlers.
pub struct OrderStore {
    conn: Mutex<Connection>,
}

impl OrderStore {
    /// Wrap a migrated connection.
    pub(crate) fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    /// Append one row and return its id.
    pub fn save(&self, order: &NewOrder) -> StoreResult<i64> {
        if order.order_name.trim().is_empty() {
            return Err(StoreError::MissingOrderName);
        }

        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO orders (order_name, platform, deadline, content_summary)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                order.order_name,
                order.platform,
                order.deadline,
                order.content_summary,
            ],
        )?;
        let id = conn.last_insert_rowid();

        tracing::info!(id, order = %order.order_name, "event=order_save status=ok");
        Ok(id)
    }

    /// All rows, newest first.
    pub fn history(&self) -> StoreResult<Vec<OrderRecord>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "{ORDER_SELECT_SQL} ORDER BY created_at DESC, id DESC;"
        ))?;
        let rows = stmt
            .query_map([], parse_order_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// One page of rows, newest first. Limit defaults to 50 and clamps to 500.
    pub fn history_page(&self, limit: Option<u32>, offset: u32) -> StoreResult<Vec<OrderRecord>> {
        let limit = normalize_limit(limit);
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "{ORDER_SELECT_SQL} ORDER BY created_at DESC, id DESC LIMIT ?1 OFFSET ?2;"
        ))?;
        let rows = stmt
            .query_map(params![i64::from(limit), i64::from(offset)], parse_order_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Number of saved rows.
    pub fn count(&self) -> StoreResult<u64> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM orders;", [], |row| row.get(0))?;
        Ok(u64::try_from(count).unwrap_or(0))
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }
}

fn normalize_limit(limit: Option<u32>) -> u32 {
    match limit {
        None | Some(0) => HISTORY_DEFAULT_LIMIT,
        Some(value) => value.min(HISTORY_LIMIT_MAX),
    }
}

fn parse_order_row(row: &Row<'_>) -> rusqlite::Result<OrderRecord> {
    Ok(OrderRecord {
        id: row.get(0)?,
        order_name: row.get(1)?,
        platform: row.get(2)?,
        deadline: row.get(3)?,
        content_summary: row.get(4)?,
        created_at: row.get(5)?,
    })
}
