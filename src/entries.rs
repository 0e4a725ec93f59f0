use thiserror::Error;
use tracing::{debug, info, warn};

use crate::models::Entry;
use crate::storage::{LocalStore, StorageError};

/// Name of the slot holding the serialized entry collection
pub const ENTRIES_KEY: &str = "recoveryEntries";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage error: {0}")]
    StorageError(#[from] StorageError),
    #[error("Failed to serialize entries: {0}")]
    SerializeError(#[from] serde_json::Error),
}

/// Ordered, append-only collection of committed entries, newest first.
///
/// The whole collection is written back to its slot after every append.
pub struct EntryStore<S: LocalStore> {
    backend: S,
    entries: Vec<Entry>,
}

impl<S: LocalStore> EntryStore<S> {
    /// Load the collection from `backend`.
    ///
    /// A missing slot, a read failure or a payload that does not parse as a
    /// list of entries all yield an empty collection.
    pub fn load(backend: S) -> Self {
        let entries = match backend.get(ENTRIES_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<Entry>>(&raw) {
                Ok(entries) => {
                    info!(count = entries.len(), "loaded journal entries");
                    entries
                }
                Err(e) => {
                    warn!(error = %e, "stored entries are unreadable, starting empty");
                    Vec::new()
                }
            },
            Ok(None) => {
                debug!("no stored entries yet");
                Vec::new()
            }
            Err(e) => {
                warn!(error = %e, "failed to read stored entries, starting empty");
                Vec::new()
            }
        };

        Self { backend, entries }
    }

    /// Insert `entry` at the head and persist the full collection.
    ///
    /// The entry stays in memory even if persisting fails.
    pub fn append(&mut self, entry: Entry) -> Result<(), StoreError> {
        debug!(id = %entry.id, date = %entry.date, mood = %entry.mood, "appending entry");
        self.entries.insert(0, entry);
        self.persist()
    }

    pub fn all(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    fn persist(&mut self) -> Result<(), StoreError> {
        let payload = serde_json::to_string(&self.entries)?;
        self.backend.set(ENTRIES_KEY, &payload)?;
        debug!(count = self.entries.len(), bytes = payload.len(), "persisted entries");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Mood;
    use crate::storage::MemoryStore;
    use chrono::NaiveDate;

    struct FailingStore;

    impl LocalStore for FailingStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::DirectoryError("unavailable".to_string()))
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::DirectoryError("unavailable".to_string()))
        }
    }

    fn entry(id: &str, date: &str) -> Entry {
        Entry {
            id: id.to_string(),
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            mood: Mood::Good,
            notes: String::new(),
            goals: Vec::new(),
            completed: true,
        }
    }

    #[test]
    fn empty_slot_loads_empty() {
        let store = EntryStore::load(MemoryStore::new());
        assert!(store.is_empty());
    }

    #[test]
    fn corrupt_slot_loads_empty() {
        for payload in ["not json", "{\"id\": 1}", "[{\"mood\":\"ecstatic\"}]", ""] {
            let mut backend = MemoryStore::new();
            backend.set(ENTRIES_KEY, payload).unwrap();
            let store = EntryStore::load(backend);
            assert!(store.is_empty(), "payload {payload:?} should be discarded");
        }
    }

    #[test]
    fn unreadable_backend_loads_empty() {
        let store = EntryStore::load(FailingStore);
        assert!(store.is_empty());
    }

    #[test]
    fn append_places_newest_first() {
        let mut store = EntryStore::load(MemoryStore::new());
        for id in ["a", "b", "c"] {
            store.append(entry(id, "2024-03-01")).unwrap();
        }
        let ids: Vec<&str> = store.all().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "b", "a"]);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn append_overwrites_slot_with_full_collection() {
        let mut store = EntryStore::load(MemoryStore::new());
        store.append(entry("a", "2024-03-01")).unwrap();
        store.append(entry("b", "2024-03-02")).unwrap();

        let raw = store.backend().get(ENTRIES_KEY).unwrap().unwrap();
        let saved: Vec<Entry> = serde_json::from_str(&raw).unwrap();
        assert_eq!(saved, store.all());
    }

    #[test]
    fn reload_yields_equal_collection() {
        let mut store = EntryStore::load(MemoryStore::new());
        store.append(entry("a", "2024-03-01")).unwrap();
        store.append(entry("b", "2024-03-02")).unwrap();
        let before = store.all().to_vec();

        let reloaded = EntryStore::load(store.backend().clone());
        assert_eq!(reloaded.all(), before.as_slice());
    }

    #[test]
    fn failed_persist_keeps_entry_in_memory() {
        let mut store = EntryStore::load(FailingStore);
        let result = store.append(entry("a", "2024-03-01"));
        assert!(matches!(result, Err(StoreError::StorageError(_))));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn loads_entries_written_with_numeric_style_ids() {
        let mut backend = MemoryStore::new();
        backend
            .set(
                ENTRIES_KEY,
                r#"[{"id":"1717000000000","date":"2024-05-29","mood":"difficult","notes":"rough","goals":["call sponsor"],"completed":true}]"#,
            )
            .unwrap();
        let store = EntryStore::load(backend);
        assert_eq!(store.len(), 1);
        assert_eq!(store.all()[0].mood, Mood::Difficult);
        assert_eq!(store.all()[0].goals, vec!["call sponsor".to_string()]);
    }
}
