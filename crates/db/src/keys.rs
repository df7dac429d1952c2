//! Record keys under a resource name.

/// Current [`LockState`](hallpass_core::lock::LockState) record. Absent when
/// the pass is free and not blocked.
pub const STATE_KEY: &str = "hallpass-state";

/// Session log, a JSON array of log entries.
pub const LOG_KEY: &str = "hallpass-events";

/// Log from the previous schema. Removed by the one-time migration.
pub const LEGACY_LOG_KEY: &str = "hallpass-log";

/// Set to `true` once the one-time migration has completed. Never cleared.
pub const MIGRATION_FLAG_KEY: &str = "hallpass-migrated-v1";

/// Field dropped from stored state records by the one-time migration.
pub const DEPRECATED_STATE_FIELD: &str = "studentId";
