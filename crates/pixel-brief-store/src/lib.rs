//! Local record store for submitted briefs.
//!
//! One SQLite table, `orders`, holds a summarized row per saved brief.

pub mod migrations;
mod open;
pub mod orders;

pub use open::{open_store, open_store_in_memory};
pub use orders::{NewOrder, OrderRecord, OrderStore};

pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur in the record store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    #[error("database schema version {db_version} is newer than supported {latest_supported}")]
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },

    #[error("Order name is required")]
    MissingOrderName,

    #[error("Store connection lock poisoned")]
    Poisoned,
}
