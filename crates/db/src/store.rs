use async_trait::async_trait;
use serde_json::Value;

use crate::error::StoreError;

/// A single write in a batch.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreOp {
    Put { key: String, value: Value },
    Delete { key: String },
}

impl StoreOp {
    pub fn put(key: &str, value: Value) -> Self {
        StoreOp::Put {
            key: key.to_string(),
            value,
        }
    }

    pub fn delete(key: &str) -> Self {
        StoreOp::Delete {
            key: key.to_string(),
        }
    }
}

/// Key-value storage partitioned by resource name.
///
/// Implementations must apply a batch atomically: either every operation in
/// [`PassStore::apply`] is visible afterwards or none is. Deleting an absent
/// key is not an error.
#[async_trait]
pub trait PassStore: Send + Sync {
    /// Read one value.
    async fn get(&self, resource: &str, key: &str) -> Result<Option<Value>, StoreError>;

    /// Apply a batch of writes in order.
    async fn apply(&self, resource: &str, ops: Vec<StoreOp>) -> Result<(), StoreError>;

    /// Check that the backend is reachable.
    async fn health_check(&self) -> Result<(), StoreError>;
}
