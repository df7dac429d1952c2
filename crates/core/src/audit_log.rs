//! Session history: completed hall pass sessions with bounded retention.
//!
//! Entries are appended only when a session ends (release or force release)
//! and are immutable afterwards. The collection is bounded both by age and by
//! count; [`SessionLog::prune`] enforces both bounds and is idempotent.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::lock::Holder;
use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Retention limits
// ---------------------------------------------------------------------------

/// Maximum number of entries kept in the log.
pub const MAX_LOG_ENTRIES: usize = 300;

/// Entries whose end time is older than this many days are dropped.
pub const RETENTION_DAYS: i64 = 30;

// ---------------------------------------------------------------------------
// LogEntry
// ---------------------------------------------------------------------------

/// One completed hall pass session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub id: String,
    /// Empty when the holder did not identify themselves.
    #[serde(default)]
    pub student_id: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub started_at: Timestamp,
    /// Always set for entries written by this crate; older records may lack it.
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub ended_at: Option<Timestamp>,
    #[serde(default)]
    pub duration_ms: i64,
    #[serde(default)]
    pub forced: bool,
}

impl LogEntry {
    /// Build the entry for a session that ended at `ended_at`.
    pub fn completed(holder: &Holder, ended_at: Timestamp, forced: bool) -> Self {
        let duration_ms = (ended_at - holder.started_at).num_milliseconds().max(0);
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            student_id: holder.student_id.clone().unwrap_or_default(),
            started_at: holder.started_at,
            ended_at: Some(ended_at),
            duration_ms,
            forced,
        }
    }

    /// The instant retention age is measured from.
    pub fn reference_time(&self) -> Timestamp {
        self.ended_at.unwrap_or(self.started_at)
    }
}

// ---------------------------------------------------------------------------
// SessionLog
// ---------------------------------------------------------------------------

/// Append-ordered collection of [`LogEntry`] values, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionLog {
    entries: Vec<LogEntry>,
}

impl SessionLog {
    pub fn new(entries: Vec<LogEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append a completed session and re-apply the retention bounds.
    pub fn append(&mut self, entry: LogEntry, now: Timestamp) {
        self.entries.push(entry);
        self.prune(now);
    }

    /// Drop entries older than [`RETENTION_DAYS`], then trim from the front
    /// until at most [`MAX_LOG_ENTRIES`] remain.
    ///
    /// Returns `true` if any entry was removed.
    pub fn prune(&mut self, now: Timestamp) -> bool {
        let before = self.entries.len();
        let cutoff = now - Duration::days(RETENTION_DAYS);

        self.entries.retain(|e| e.reference_time() >= cutoff);

        if self.entries.len() > MAX_LOG_ENTRIES {
            let excess = self.entries.len() - MAX_LOG_ENTRIES;
            self.entries.drain(..excess);
        }

        self.entries.len() != before
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn at(ms: i64) -> Timestamp {
        Utc.timestamp_millis_opt(ms).unwrap()
    }

    fn entry(id: &str, ended_at: Timestamp) -> LogEntry {
        LogEntry {
            id: id.to_string(),
            student_id: String::new(),
            started_at: ended_at - Duration::minutes(5),
            ended_at: Some(ended_at),
            duration_ms: 300_000,
            forced: false,
        }
    }

    #[test]
    fn completed_computes_duration() {
        let holder = Holder {
            token: "t".into(),
            started_at: at(1_000),
            student_id: Some("1234".into()),
        };
        let e = LogEntry::completed(&holder, at(4_500), true);

        assert_eq!(e.duration_ms, 3_500);
        assert_eq!(e.student_id, "1234");
        assert_eq!(e.ended_at, Some(at(4_500)));
        assert!(e.forced);
        assert!(!e.id.is_empty());
    }

    #[test]
    fn completed_clamps_negative_duration() {
        let holder = Holder {
            token: "t".into(),
            started_at: at(10_000),
            student_id: None,
        };
        let e = LogEntry::completed(&holder, at(9_000), false);

        assert_eq!(e.duration_ms, 0);
        assert_eq!(e.student_id, "");
    }

    #[test]
    fn prune_drops_entries_past_retention() {
        let now = Utc::now();
        let mut log = SessionLog::new(vec![
            entry("old", now - Duration::days(RETENTION_DAYS + 1)),
            entry("fresh", now - Duration::days(1)),
        ]);

        assert!(log.prune(now));
        assert_eq!(log.len(), 1);
        assert_eq!(log.entries()[0].id, "fresh");
    }

    #[test]
    fn prune_falls_back_to_started_at() {
        let now = Utc::now();
        let mut stale = entry("stale", now);
        stale.ended_at = None;
        stale.started_at = now - Duration::days(RETENTION_DAYS + 2);
        let mut log = SessionLog::new(vec![stale]);

        assert!(log.prune(now));
        assert!(log.is_empty());
    }

    #[test]
    fn prune_caps_count_dropping_oldest() {
        let now = Utc::now();
        let entries = (0..MAX_LOG_ENTRIES + 5)
            .map(|i| entry(&format!("e{i}"), now - Duration::seconds(1_000 - i as i64)))
            .collect();
        let mut log = SessionLog::new(entries);

        assert!(log.prune(now));
        assert_eq!(log.len(), MAX_LOG_ENTRIES);
        assert_eq!(log.entries()[0].id, "e5");
        assert_eq!(log.entries().last().unwrap().id, format!("e{}", MAX_LOG_ENTRIES + 4));
    }

    #[test]
    fn prune_is_idempotent() {
        let now = Utc::now();
        let mut log = SessionLog::new(vec![
            entry("old", now - Duration::days(40)),
            entry("a", now - Duration::hours(2)),
            entry("b", now - Duration::hours(1)),
        ]);

        assert!(log.prune(now));
        let after_first = log.clone();
        assert!(!log.prune(now));
        assert_eq!(log, after_first);
    }

    #[test]
    fn append_keeps_order_and_bounds() {
        let now = Utc::now();
        let mut log = SessionLog::default();
        for i in 0..MAX_LOG_ENTRIES + 1 {
            log.append(entry(&format!("e{i}"), now), now);
        }

        assert_eq!(log.len(), MAX_LOG_ENTRIES);
        assert_eq!(log.entries()[0].id, "e1");
    }

    #[test]
    fn deserializes_legacy_entry_without_end_time() {
        let json = serde_json::json!({
            "id": "x",
            "startedAt": 1_000,
            "durationMs": 0
        });
        let e: LogEntry = serde_json::from_value(json).unwrap();

        assert_eq!(e.ended_at, None);
        assert_eq!(e.reference_time(), at(1_000));
        assert_eq!(e.student_id, "");
        assert!(!e.forced);
    }

    #[test]
    fn serializes_timestamps_as_millis() {
        let e = entry("x", at(600_000));
        let json = serde_json::to_value(&e).unwrap();

        assert_eq!(json["endedAt"], 600_000);
        assert_eq!(json["startedAt"], 300_000);
        assert_eq!(json["durationMs"], 300_000);
    }
}
