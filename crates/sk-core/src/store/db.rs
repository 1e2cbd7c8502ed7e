//! SQLite state database
//!
//! Holds one install receipt per skill: where it came from and when.

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use thiserror::Error;

/// State database failure.
#[derive(Error, Debug)]
pub enum DbError {
    /// Open, schema or query failure.
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// The parent directory could not be created.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Install receipt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    /// Local skill name.
    pub name: String,
    /// Identifier or descriptor the skill was installed from.
    pub source: String,
    /// When the install completed, to the second.
    pub installed_at: DateTime<Utc>,
}

impl Receipt {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        let secs: i64 = row.get(2)?;
        Ok(Self {
            name: row.get(0)?,
            source: row.get(1)?,
            installed_at: DateTime::from_timestamp(secs, 0).unwrap_or_default(),
        })
    }
}

/// State database for tracking installations
#[derive(Debug)]
pub struct StateDb {
    conn: Connection,
}

impl StateDb {
    /// Open or create the database at `path`, creating parent directories.
    pub fn open_at(path: &Path) -> Result<Self, DbError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;

        let db = Self { conn };
        db.init_schema()?;
        Ok(db)
    }

    fn init_schema(&self) -> Result<(), DbError> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS receipts (
                name TEXT PRIMARY KEY,
                source TEXT NOT NULL,
                installed_at INTEGER NOT NULL
            );
            ",
        )?;
        Ok(())
    }

    /// Record (or replace) the receipt for `name`, stamped now.
    pub fn record(&self, name: &str, source: &str) -> Result<Receipt, DbError> {
        let receipt = Receipt {
            name: name.to_string(),
            source: source.to_string(),
            installed_at: DateTime::from_timestamp(Utc::now().timestamp(), 0).unwrap_or_default(),
        };
        self.conn.execute(
            "INSERT OR REPLACE INTO receipts (name, source, installed_at)
             VALUES (?1, ?2, ?3)",
            params![receipt.name, receipt.source, receipt.installed_at.timestamp()],
        )?;
        Ok(receipt)
    }

    /// Receipt for `name`, if any.
    pub fn get(&self, name: &str) -> Result<Option<Receipt>, DbError> {
        self.conn
            .query_row(
                "SELECT name, source, installed_at FROM receipts WHERE name = ?1",
                params![name],
                Receipt::from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// All receipts, ordered by name
    pub fn list(&self) -> Result<Vec<Receipt>, DbError> {
        let mut stmt = self
            .conn
            .prepare("SELECT name, source, installed_at FROM receipts ORDER BY name")?;
        let receipts = stmt.query_map([], Receipt::from_row)?;
        receipts.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Delete the receipt for `name`. Returns whether one existed.
    pub fn remove(&self, name: &str) -> Result<bool, DbError> {
        let deleted = self
            .conn
            .execute("DELETE FROM receipts WHERE name = ?1", params![name])?;
        Ok(deleted > 0)
    }
}
