//! SQLite-backed key-value store.

use super::KeyValueStore;
use crate::timetable::TimetableError;
use rusqlite::{Connection, OptionalExtension};
use std::sync::{Mutex, MutexGuard};
use tracing::info;

const SCHEMA_SQL: &str = include_str!("../../../../sql/init_store.sql");

pub struct SqliteStore {
    db: Mutex<Connection>,
}

impl SqliteStore {
    /// Opens (or creates) the database at `db_path` and initializes the schema
    pub fn open(db_path: &str) -> Result<Self, TimetableError> {
        let conn = Connection::open(db_path)?;
        info!(path = %db_path, "Opened plan store");
        Self::with_connection(conn)
    }

    /// Creates a store backed by a private in-memory database
    pub fn open_in_memory() -> Result<Self, TimetableError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, TimetableError> {
        conn.execute_batch(SCHEMA_SQL)?;
        Ok(Self {
            db: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, TimetableError> {
        self.db.lock().map_err(|_| TimetableError::Store {
            message: "database mutex poisoned".to_string(),
        })
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>, TimetableError> {
        let db = self.lock()?;
        let value = db
            .query_row("SELECT value FROM kv WHERE key = ?", [key], |row| row.get(0))
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), TimetableError> {
        let db = self.lock()?;
        db.execute(
            "INSERT OR REPLACE INTO kv (key, value, updated_at)
             VALUES (?1, ?2, datetime('now'))",
            (key, value),
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sqlite_store_roundtrip_in_memory() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert_eq!(store.get("saved-timetables").unwrap(), None);

        store.set("saved-timetables", "[]").unwrap();
        store.set("saved-timetables", "[1]").unwrap();

        assert_eq!(store.get("saved-timetables").unwrap().as_deref(), Some("[1]"));
    }

    #[test]
    fn test_sqlite_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plans.db");
        let path = path.to_str().unwrap();

        {
            let store = SqliteStore::open(path).unwrap();
            store.set("k", "v").unwrap();
        }

        let reopened = SqliteStore::open(path).unwrap();
        assert_eq!(reopened.get("k").unwrap().as_deref(), Some("v"));
    }
}
