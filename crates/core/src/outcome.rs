//! Reply payloads for hall pass requests.
//!
//! Every recognized request, including negative outcomes such as `denied` or
//! `in_use`, produces a [`PassOutcome`]. These are business results, not
//! errors.

use serde::Serialize;

use crate::audit_log::{LogEntry, SessionLog};
use crate::summary::Summary;
use crate::types::Timestamp;

/// The `status` string of a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PassStatus {
    Available,
    InUse,
    Blocked,
    Claimed,
    Released,
    Denied,
    InvalidStudentId,
    Ok,
}

impl PassStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PassStatus::Available => "available",
            PassStatus::InUse => "in_use",
            PassStatus::Blocked => "blocked",
            PassStatus::Claimed => "claimed",
            PassStatus::Released => "released",
            PassStatus::Denied => "denied",
            PassStatus::InvalidStudentId => "invalid_student_id",
            PassStatus::Ok => "ok",
        }
    }
}

impl std::fmt::Display for PassStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// JSON reply body. Absent fields are omitted from the serialized form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PassOutcome {
    pub status: PassStatus,
    #[serde(
        skip_serializing_if = "Option::is_none",
        with = "chrono::serde::ts_milliseconds_option"
    )]
    pub started_at: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_holder: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocked: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forced: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub events: Option<Vec<LogEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<Summary>,
}

impl PassOutcome {
    /// A reply carrying only a status.
    pub fn new(status: PassStatus) -> Self {
        Self {
            status,
            started_at: None,
            is_holder: None,
            blocked: None,
            token: None,
            forced: None,
            student_id: None,
            events: None,
            summary: None,
        }
    }

    /// The `log` reply: the retained entries plus their summary.
    pub fn log(log: &SessionLog) -> Self {
        Self {
            events: Some(log.entries().to_vec()),
            summary: Some(Summary::from_entries(log.entries())),
            ..Self::new(PassStatus::Ok)
        }
    }

    pub fn with_started_at(mut self, started_at: Timestamp) -> Self {
        self.started_at = Some(started_at);
        self
    }

    pub fn with_blocked(mut self, blocked: bool) -> Self {
        self.blocked = Some(blocked);
        self
    }

    pub fn with_holder(mut self, is_holder: bool) -> Self {
        self.is_holder = Some(is_holder);
        self
    }

    pub fn with_token(mut self, token: String) -> Self {
        self.token = Some(token);
        self
    }

    pub fn with_forced(mut self) -> Self {
        self.forced = Some(true);
        self
    }

    pub fn with_student_id(mut self, student_id: Option<String>) -> Self {
        self.student_id = student_id;
        self
    }
}
