//! In-process document store for offline use and tests.

use std::collections::HashMap;

use canvas::clock::now_ms;
use canvas::document::{Document, SavePayload};
use tokio::sync::RwLock;

use super::store::{PersistenceAdapter, StoreError};

struct Entry {
    document: Document,
    /// Monotonic touch counter; higher is newer.
    touched: u64,
}

#[derive(Default)]
struct Inner {
    next_id: u64,
    clock: u64,
    entries: HashMap<String, Entry>,
}

/// Documents held in a map behind an async lock. Ids are sequential
/// integers rendered as strings, like the REST backend's.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait::async_trait]
impl PersistenceAdapter for MemoryStore {
    async fn list(&self) -> Result<Vec<Document>, StoreError> {
        let inner = self.inner.read().await;
        let mut entries: Vec<&Entry> = inner.entries.values().collect();
        entries.sort_by(|a, b| b.touched.cmp(&a.touched));
        Ok(entries.into_iter().map(|e| e.document.clone()).collect())
    }

    async fn load(&self, id: &str) -> Result<Document, StoreError> {
        let inner = self.inner.read().await;
        inner.entries.get(id).map(|e| e.document.clone()).ok_or_else(|| StoreError::NotFound(id.to_owned()))
    }

    async fn create(&self, payload: &SavePayload) -> Result<Document, StoreError> {
        let mut inner = self.inner.write().await;
        inner.next_id += 1;
        inner.clock += 1;
        let id = inner.next_id.to_string();
        let stamp = now_ms().to_string();
        let document = Document {
            id: id.clone(),
            name: payload.name.clone(),
            data: payload.data.clone(),
            created_at: Some(stamp.clone()),
            updated_at: Some(stamp),
        };
        let touched = inner.clock;
        inner.entries.insert(id, Entry { document: document.clone(), touched });
        Ok(document)
    }

    async fn save(&self, id: &str, payload: &SavePayload) -> Result<Document, StoreError> {
        let mut inner = self.inner.write().await;
        inner.clock += 1;
        let touched = inner.clock;
        let entry = inner.entries.get_mut(id).ok_or_else(|| StoreError::NotFound(id.to_owned()))?;
        entry.document.name.clone_from(&payload.name);
        entry.document.data.clone_from(&payload.data);
        entry.document.updated_at = Some(now_ms().to_string());
        entry.touched = touched;
        Ok(entry.document.clone())
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        match inner.entries.remove(id) {
            Some(_) => Ok(()),
            None => Err(StoreError::NotFound(id.to_owned())),
        }
    }
}

#[cfg(test)]
#[path = "memory_test.rs"]
mod memory_test;
