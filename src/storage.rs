use rusqlite::{Connection, ErrorCode, OptionalExtension};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

/// Suffix given to a store file that SQLite cannot read
pub const CORRUPT_SUFFIX: &str = "corrupt";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    SqliteError(#[from] rusqlite::Error),
    #[error("Failed to create storage directory: {0}")]
    DirectoryError(String),
    #[error("Failed to move unreadable store aside: {0}")]
    RecoveryError(#[from] std::io::Error),
}

impl StorageError {
    /// The file exists but is not a usable SQLite database
    pub fn is_corrupt_file(&self) -> bool {
        match self {
            StorageError::SqliteError(e) => matches!(
                e.sqlite_error_code(),
                Some(ErrorCode::NotADatabase | ErrorCode::DatabaseCorrupt)
            ),
            _ => false,
        }
    }
}

/// Durable named text slots surviving across sessions on the same device
pub trait LocalStore {
    /// Read a slot. `Ok(None)` means the slot was never written.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Overwrite a slot with `value`
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// SQLite-backed slot store: a single `slots` table keyed by slot name
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) the store file and initialize the schema
    pub fn new(path: &str) -> Result<Self, StorageError> {
        let db_path = PathBuf::from(path);

        // Create parent directory if it doesn't exist
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| StorageError::DirectoryError(e.to_string()))?;
            }
        }

        let conn = Connection::open(&db_path)?;
        let store = SqliteStore { conn };
        store.initialize_schema()?;

        Ok(store)
    }

    /// Open the store file, moving it to `<path>.corrupt` and starting a fresh
    /// one when SQLite cannot read it. Returns the new location of the
    /// unreadable file when that happened.
    pub fn open_or_recover(path: &str) -> Result<(Self, Option<PathBuf>), StorageError> {
        match Self::new(path) {
            Ok(store) => Ok((store, None)),
            Err(e) if e.is_corrupt_file() => {
                let moved = corrupt_path(Path::new(path));
                warn!(error = %e, moved = %moved.display(), "store file unreadable, starting empty");
                std::fs::rename(path, &moved)?;
                let store = Self::new(path)?;
                Ok((store, Some(moved)))
            }
            Err(e) => Err(e),
        }
    }

    /// Open a private in-memory database, discarded on drop
    pub fn in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        let store = SqliteStore { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    fn initialize_schema(&self) -> Result<(), StorageError> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS slots (
                key             TEXT PRIMARY KEY,
                value           TEXT NOT NULL,
                updated_at      TEXT NOT NULL
            )",
            [],
        )?;
        Ok(())
    }
}

impl LocalStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM slots WHERE key = ?1",
                rusqlite::params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let now = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string();
        self.conn.execute(
            "INSERT INTO slots (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            rusqlite::params![key, value, now],
        )?;
        Ok(())
    }
}

fn corrupt_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".");
    name.push(CORRUPT_SUFFIX);
    PathBuf::from(name)
}

/// Process-local slot store, used for tests and throwaway sessions
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    slots: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocalStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.slots.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.slots.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sqlite_slot_starts_empty() {
        let store = SqliteStore::in_memory().unwrap();
        assert_eq!(store.get("recoveryEntries").unwrap(), None);
    }

    #[test]
    fn sqlite_set_overwrites_whole_slot() {
        let mut store = SqliteStore::in_memory().unwrap();
        store.set("k", "[1,2,3]").unwrap();
        store.set("k", "[]").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn corrupt_path_keeps_file_name() {
        assert_eq!(
            corrupt_path(Path::new("/data/rtrack/journal.db")),
            PathBuf::from("/data/rtrack/journal.db.corrupt")
        );
    }

    #[test]
    fn directory_errors_are_not_corruption() {
        assert!(!StorageError::DirectoryError("denied".to_string()).is_corrupt_file());
    }

    #[test]
    fn slots_are_independent() {
        let mut store = MemoryStore::new();
        store.set("a", "1").unwrap();
        store.set("b", "2").unwrap();
        assert_eq!(store.get("a").unwrap().as_deref(), Some("1"));
        assert_eq!(store.get("b").unwrap().as_deref(), Some("2"));
        assert_eq!(store.get("c").unwrap(), None);
    }
}
