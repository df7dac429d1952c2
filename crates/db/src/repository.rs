//! Typed access to one resource name's records.

use std::sync::Arc;

use hallpass_core::audit_log::SessionLog;
use hallpass_core::lock::LockState;
use serde_json::Value;

use crate::error::StoreError;
use crate::keys::{LOG_KEY, STATE_KEY};
use crate::store::{PassStore, StoreOp};

/// Pending writes produced by one request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PassWrite {
    /// New lock state. An empty state deletes the record.
    pub state: Option<LockState>,
    /// New log contents, replacing the stored collection.
    pub log: Option<SessionLog>,
}

impl PassWrite {
    pub fn is_empty(&self) -> bool {
        self.state.is_none() && self.log.is_none()
    }
}

/// Handle on the records of a single resource name.
///
/// Cheap to clone. Does not cache anything; every read goes to the store.
#[derive(Clone)]
pub struct PassStorage {
    store: Arc<dyn PassStore>,
    resource: String,
}

impl PassStorage {
    pub fn new(store: Arc<dyn PassStore>, resource: impl Into<String>) -> Self {
        Self {
            store,
            resource: resource.into(),
        }
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    /// Read a raw value under this resource.
    pub async fn get_raw(&self, key: &str) -> Result<Option<Value>, StoreError> {
        self.store.get(&self.resource, key).await
    }

    /// Apply raw writes under this resource as one batch.
    pub async fn apply_raw(&self, ops: Vec<StoreOp>) -> Result<(), StoreError> {
        self.store.apply(&self.resource, ops).await
    }

    /// Load the lock state. A missing record is the empty state.
    pub async fn load_state(&self) -> Result<LockState, StoreError> {
        match self.get_raw(STATE_KEY).await? {
            Some(value) => Ok(serde_json::from_value(value)?),
            None => Ok(LockState::default()),
        }
    }

    /// Load the session log. A missing record is an empty log.
    pub async fn load_log(&self) -> Result<SessionLog, StoreError> {
        match self.get_raw(LOG_KEY).await? {
            Some(value) => Ok(serde_json::from_value(value)?),
            None => Ok(SessionLog::default()),
        }
    }

    /// Persist every change from one request in a single batch.
    pub async fn commit(&self, write: PassWrite) -> Result<(), StoreError> {
        if write.is_empty() {
            return Ok(());
        }

        let mut ops = Vec::with_capacity(2);
        if let Some(state) = write.state {
            if state.is_empty() {
                ops.push(StoreOp::delete(STATE_KEY));
            } else {
                ops.push(StoreOp::put(STATE_KEY, serde_json::to_value(state)?));
            }
        }
        if let Some(log) = write.log {
            ops.push(StoreOp::put(LOG_KEY, serde_json::to_value(log)?));
        }

        self.apply_raw(ops).await
    }

    pub async fn health_check(&self) -> Result<(), StoreError> {
        self.store.health_check().await
    }
}

impl std::fmt::Debug for PassStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PassStorage")
            .field("resource", &self.resource)
            .finish_non_exhaustive()
    }
}
