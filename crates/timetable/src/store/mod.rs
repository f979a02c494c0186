/// Key-value storage backends for persisted timetable state

mod sqlite;

pub use sqlite::SqliteStore;

use crate::timetable::TimetableError;
use dashmap::DashMap;

/// A string key-value store with whole-value overwrite semantics.
pub trait KeyValueStore: Send + Sync {
    /// Reads the value under `key`, `None` if it was never written.
    fn get(&self, key: &str) -> Result<Option<String>, TimetableError>;

    /// Replaces the value under `key` in a single write.
    fn set(&self, key: &str, value: &str) -> Result<(), TimetableError>;
}

/// In-memory store, for tests and sessions that need no durability.
///
/// Uses DashMap for concurrent access without external locking.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: DashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, TimetableError> {
        Ok(self.entries.get(key).map(|entry| entry.value().clone()))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), TimetableError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_overwrites() {
        let store = MemoryStore::new();
        assert_eq!(store.get("k").unwrap(), None);

        store.set("k", "one").unwrap();
        store.set("k", "two").unwrap();

        assert_eq!(store.get("k").unwrap().as_deref(), Some("two"));
        assert_eq!(store.len(), 1);
    }
}
