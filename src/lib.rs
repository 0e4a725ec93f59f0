pub mod cli;
pub mod config;
pub mod draft;
pub mod entries;
pub mod logging;
pub mod models;
pub mod stats;
pub mod storage;
pub mod tui;
pub mod utils;

pub use config::Config;
pub use draft::Draft;
pub use entries::{EntryStore, StoreError, ENTRIES_KEY};
pub use models::{Entry, Mood};
pub use stats::Stats;
pub use storage::{LocalStore, MemoryStore, SqliteStore, StorageError};
pub use utils::Profile;
