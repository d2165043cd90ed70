use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;

use super::{Collection, DocumentStore, Records};
use crate::error::AppError;

/// In-process store with the same keying and merge rules as the remote one.
/// Used when no base URL is configured and in tests.
#[derive(Default)]
pub struct MemoryStore {
    collections: Mutex<HashMap<Collection, Records>>,
    next_key: AtomicUsize,
    reads: AtomicUsize,
    writes: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of collection reads served so far.
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// Number of create/put/patch/delete calls served so far.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub async fn record(&self, collection: Collection, key: &str) -> Option<Value> {
        let collections = self.collections.lock().await;
        collections
            .get(&collection)
            .and_then(|records| records.get(key))
            .cloned()
    }

    fn generate_key(&self) -> String {
        // Zero-padded so lexical key order is insertion order, like push keys.
        let n = self.next_key.fetch_add(1, Ordering::SeqCst);
        format!("-M{:010}", n)
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn fetch_all(&self, collection: Collection) -> Result<Records, AppError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        let collections = self.collections.lock().await;
        Ok(collections.get(&collection).cloned().unwrap_or_default())
    }

    async fn create(&self, collection: Collection, data: &Value) -> Result<String, AppError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        let key = self.generate_key();
        let mut collections = self.collections.lock().await;
        collections
            .entry(collection)
            .or_default()
            .insert(key.clone(), data.clone());
        Ok(key)
    }

    async fn put(&self, collection: Collection, key: &str, data: &Value) -> Result<(), AppError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        let mut collections = self.collections.lock().await;
        collections
            .entry(collection)
            .or_default()
            .insert(key.to_string(), data.clone());
        Ok(())
    }

    async fn patch(&self, collection: Collection, key: &str, data: &Value) -> Result<(), AppError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        let Value::Object(fields) = data else {
            return Err(AppError::BadRequest("patch body must be an object".to_string()));
        };

        let mut collections = self.collections.lock().await;
        let record = collections
            .entry(collection)
            .or_default()
            .entry(key.to_string())
            .or_insert_with(|| Value::Object(Records::new()));

        match record {
            Value::Object(existing) => {
                for (field, value) in fields {
                    existing.insert(field.clone(), value.clone());
                }
            }
            other => *other = data.clone(),
        }
        Ok(())
    }

    async fn delete(&self, collection: Collection, key: &str) -> Result<(), AppError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        let mut collections = self.collections.lock().await;
        if let Some(records) = collections.get_mut(&collection) {
            records.remove(key);
        }
        Ok(())
    }
}
