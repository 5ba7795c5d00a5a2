pub mod instant;
pub mod migrations;
pub mod queries;

use anyhow::Result;
use rusqlite::Connection;
use serde_json::Value;
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::info;

pub use instant::{InstantAdapter, coerce_instant};
pub use queries::is_unique_violation;

const READER_POOL_SIZE: usize = 4;

/// A stored record: its id plus the schemaless JSON object it holds.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub data: Value,
}

impl Document {
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }
}

/// Create/read/update/delete over named collections of JSON documents.
///
/// Calls are blocking; async callers go through `spawn_blocking`.
pub trait DocumentStore: InstantAdapter + Send + Sync {
    /// Insert `data` under `id`, or under a fresh uuid when `id` is `None`.
    /// Returns the id the document was stored under.
    fn create_document(&self, collection: &str, data: Value, id: Option<&str>) -> Result<String>;

    /// Every document in the collection, in insertion order.
    fn get_documents(&self, collection: &str) -> Result<Vec<Document>>;

    fn get_document_by_id(&self, collection: &str, id: &str) -> Result<Option<Document>>;

    /// Shallow merge: top-level keys of `partial` overwrite the stored ones.
    fn update_document(&self, collection: &str, id: &str, partial: Value) -> Result<()>;

    fn delete_document(&self, collection: &str, id: &str) -> Result<()>;
}

/// SQLite-backed document store with a reader/writer split.
pub struct Database {
    writer: Mutex<Connection>,
    readers: Vec<Mutex<Connection>>,
    reader_idx: AtomicUsize,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        let writer = Connection::open(path)?;

        // WAL mode for concurrent reads
        writer.pragma_update(None, "journal_mode", "WAL")?;

        migrations::run(&writer)?;

        let mut readers = Vec::with_capacity(READER_POOL_SIZE);
        for _ in 0..READER_POOL_SIZE {
            let conn = Connection::open_with_flags(
                path,
                rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY
                    | rusqlite::OpenFlags::SQLITE_OPEN_NO_MUTEX,
            )?;
            readers.push(Mutex::new(conn));
        }

        info!(
            "Database opened at {} (1 writer + {} readers)",
            path.display(),
            READER_POOL_SIZE
        );
        Ok(Self {
            writer: Mutex::new(writer),
            readers,
            reader_idx: AtomicUsize::new(0),
        })
    }

    /// Private in-memory database. Reads share the writer connection since
    /// a second `:memory:` connection would be a different database.
    pub fn open_in_memory() -> Result<Self> {
        let writer = Connection::open_in_memory()?;
        migrations::run(&writer)?;

        Ok(Self {
            writer: Mutex::new(writer),
            readers: Vec::new(),
            reader_idx: AtomicUsize::new(0),
        })
    }

    pub fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        if self.readers.is_empty() {
            return self.with_conn_mut(f);
        }

        let idx = self.reader_idx.fetch_add(1, Ordering::Relaxed) % self.readers.len();
        let conn = self.readers[idx]
            .lock()
            .map_err(|e| anyhow::anyhow!("Reader lock poisoned: {}", e))?;
        f(&conn)
    }

    pub fn with_conn_mut<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self
            .writer
            .lock()
            .map_err(|e| anyhow::anyhow!("Writer lock poisoned: {}", e))?;
        f(&conn)
    }
}
