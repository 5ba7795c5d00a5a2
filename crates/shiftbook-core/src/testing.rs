//! In-memory store that records every call, for unit tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use anyhow::{Result, anyhow};
use serde_json::Value;
use shiftbook_db::{Document, DocumentStore, InstantAdapter};

#[derive(Default)]
pub struct MemoryStore {
    docs: Mutex<Vec<(String, Document)>>,
    calls: Mutex<Vec<String>>,
    next_id: AtomicUsize,
    offline: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, collection: &str, id: &str, data: Value) {
        self.docs.lock().unwrap().push((
            collection.to_string(),
            Document {
                id: id.to_string(),
                data,
            },
        ));
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of recorded calls whose name starts with `prefix`.
    pub fn count(&self, prefix: &str) -> usize {
        self.calls().iter().filter(|c| c.starts_with(prefix)).count()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub fn raw(&self, collection: &str, id: &str) -> Option<Value> {
        self.docs
            .lock()
            .unwrap()
            .iter()
            .find(|(c, d)| c == collection && d.id == id)
            .map(|(_, d)| d.data.clone())
    }

    fn record(&self, call: String) -> Result<()> {
        self.calls.lock().unwrap().push(call);
        if self.offline.load(Ordering::SeqCst) {
            return Err(anyhow!("store offline"));
        }
        Ok(())
    }
}

impl InstantAdapter for MemoryStore {}

impl DocumentStore for MemoryStore {
    fn create_document(&self, collection: &str, data: Value, id: Option<&str>) -> Result<String> {
        self.record(format!("create:{collection}"))?;
        let id = id.map_or_else(
            || format!("gen-{}", self.next_id.fetch_add(1, Ordering::SeqCst)),
            str::to_string,
        );
        self.seed(collection, &id, data);
        Ok(id)
    }

    fn get_documents(&self, collection: &str) -> Result<Vec<Document>> {
        self.record(format!("list:{collection}"))?;
        Ok(self
            .docs
            .lock()
            .unwrap()
            .iter()
            .filter(|(c, _)| c == collection)
            .map(|(_, d)| d.clone())
            .collect())
    }

    fn get_document_by_id(&self, collection: &str, id: &str) -> Result<Option<Document>> {
        self.record(format!("get:{collection}/{id}"))?;
        Ok(self
            .docs
            .lock()
            .unwrap()
            .iter()
            .find(|(c, d)| c == collection && d.id == id)
            .map(|(_, d)| d.clone()))
    }

    fn update_document(&self, collection: &str, id: &str, partial: Value) -> Result<()> {
        self.record(format!("update:{collection}/{id}"))?;
        let mut docs = self.docs.lock().unwrap();
        let (_, doc) = docs
            .iter_mut()
            .find(|(c, d)| c == collection && d.id == id)
            .ok_or_else(|| anyhow!("missing {collection}/{id}"))?;
        if let (Some(stored), Value::Object(fields)) = (doc.data.as_object_mut(), partial) {
            stored.extend(fields);
        }
        Ok(())
    }

    fn delete_document(&self, collection: &str, id: &str) -> Result<()> {
        self.record(format!("delete:{collection}/{id}"))?;
        self.docs
            .lock()
            .unwrap()
            .retain(|(c, d)| !(c == collection && d.id == id));
        Ok(())
    }
}
