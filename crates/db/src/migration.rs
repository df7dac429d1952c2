//! One-time upgrade of records written by the previous schema.
//!
//! Runs when the actor for a resource name starts. The persisted flag makes
//! later runs a single read. Every step is idempotent, so a crash before the
//! flag lands only means the same harmless work is repeated.

use serde_json::Value;

use crate::error::StoreError;
use crate::keys::{DEPRECATED_STATE_FIELD, LEGACY_LOG_KEY, MIGRATION_FLAG_KEY, STATE_KEY};
use crate::repository::PassStorage;
use crate::store::StoreOp;

/// What [`run_once`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationOutcome {
    /// The flag was already set.
    AlreadyApplied,
    /// The upgrade ran and the flag is now set.
    Applied { stripped_state_field: bool },
}

/// Apply the upgrade unless the migration flag is already set.
///
/// Steps, written in one batch with the flag last:
/// 1. delete the legacy log record;
/// 2. drop the deprecated field from the stored state record, if present;
/// 3. set the migration flag.
pub async fn run_once(storage: &PassStorage) -> Result<MigrationOutcome, StoreError> {
    if is_applied(storage).await? {
        return Ok(MigrationOutcome::AlreadyApplied);
    }

    let mut ops = vec![StoreOp::delete(LEGACY_LOG_KEY)];

    let mut stripped_state_field = false;
    if let Some(Value::Object(mut record)) = storage.get_raw(STATE_KEY).await? {
        if record.remove(DEPRECATED_STATE_FIELD).is_some() {
            stripped_state_field = true;
            ops.push(StoreOp::put(STATE_KEY, Value::Object(record)));
        }
    }

    ops.push(StoreOp::put(MIGRATION_FLAG_KEY, Value::Bool(true)));
    storage.apply_raw(ops).await?;

    tracing::info!(
        resource = %storage.resource(),
        stripped_state_field,
        "Applied one-time pass store migration"
    );

    Ok(MigrationOutcome::Applied {
        stripped_state_field,
    })
}

/// Whether the migration flag is set.
pub async fn is_applied(storage: &PassStorage) -> Result<bool, StoreError> {
    Ok(matches!(
        storage.get_raw(MIGRATION_FLAG_KEY).await?,
        Some(Value::Bool(true))
    ))
}
