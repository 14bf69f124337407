#![forbid(unsafe_code)]

mod accounts;
mod budgets;
mod categories;
mod currencies;
mod error;
mod operations;
mod ordering;
mod requests;
mod support;
mod types;

pub use error::StoreError;
pub use requests::*;
pub use types::*;

use rusqlite::Connection;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

const DB_FILE: &str = "tally.db";
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

#[derive(Clone, Debug, Deserialize)]
pub struct StoreConfig {
    pub storage_dir: PathBuf,
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
}

impl StoreConfig {
    pub fn new(storage_dir: impl Into<PathBuf>) -> Self {
        Self {
            storage_dir: storage_dir.into(),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
        }
    }
}

fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}

/// SQLite-backed store for the budgeting tables.
///
/// Every mutating operation takes `&mut self` and runs inside a single
/// SQLite transaction, so multi-statement sequences either apply fully or
/// not at all, and writes through one handle never interleave. Callers that
/// share a store across threads put it behind a lock or a single-writer
/// queue.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
    storage_dir: PathBuf,
}

impl SqliteStore {
    pub fn open(storage_dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        Self::open_with(StoreConfig::new(storage_dir.as_ref()))
    }

    pub fn open_with(config: StoreConfig) -> Result<Self, StoreError> {
        let storage_dir = config.storage_dir;
        std::fs::create_dir_all(&storage_dir)?;

        let db_path = storage_dir.join(DB_FILE);
        let conn = Connection::open(db_path)?;
        conn.busy_timeout(Duration::from_millis(config.busy_timeout_ms))?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;

        support::install_schema(&conn)?;
        tracing::info!(dir = %storage_dir.display(), "store opened");

        Ok(Self { conn, storage_dir })
    }

    pub fn storage_dir(&self) -> &Path {
        &self.storage_dir
    }
}
