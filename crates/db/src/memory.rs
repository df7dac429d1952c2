//! In-process [`PassStore`] used by tests and single-node development runs.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::store::{PassStore, StoreOp};

/// Map-backed store. Contents are lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<(String, String), Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys stored under `resource`.
    pub async fn key_count(&self, resource: &str) -> usize {
        self.records
            .read()
            .await
            .keys()
            .filter(|(r, _)| r == resource)
            .count()
    }
}

#[async_trait]
impl PassStore for MemoryStore {
    async fn get(&self, resource: &str, key: &str) -> Result<Option<Value>, StoreError> {
        let records = self.records.read().await;
        Ok(records
            .get(&(resource.to_string(), key.to_string()))
            .cloned())
    }

    async fn apply(&self, resource: &str, ops: Vec<StoreOp>) -> Result<(), StoreError> {
        // One write guard for the whole batch keeps it atomic for readers.
        let mut records = self.records.write().await;
        for op in ops {
            match op {
                StoreOp::Put { key, value } => {
                    records.insert((resource.to_string(), key), value);
                }
                StoreOp::Delete { key } => {
                    records.remove(&(resource.to_string(), key));
                }
            }
        }
        Ok(())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
