//! The hall pass state machine.
//!
//! [`LockState`] is the complete persisted possession record. Each transition
//! is a pure function from the current state to a [`Transition`] that carries
//! the reply, the next state (if anything changed) and the log entry for a
//! session that just ended. Callers persist the whole transition in one write.
//!
//! A failed precondition never produces a next state.

use serde::{Deserialize, Serialize};

use crate::audit_log::LogEntry;
use crate::outcome::{PassOutcome, PassStatus};
use crate::student_id;
use crate::types::{Timestamp, Token};

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// The current holder of the pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Holder {
    pub token: Token,
    pub started_at: Timestamp,
    pub student_id: Option<String>,
}

/// Possession record for one resource name.
///
/// `holder` is present exactly while the pass is in use, so the token and
/// start time can never be set independently. `blocked` is orthogonal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StoredLockState", into = "StoredLockState")]
pub struct LockState {
    pub holder: Option<Holder>,
    pub blocked: bool,
}

impl LockState {
    pub fn in_use(&self) -> bool {
        self.holder.is_some()
    }

    /// An empty record carries no information and is removed from storage.
    pub fn is_empty(&self) -> bool {
        self.holder.is_none() && !self.blocked
    }

    fn holds(&self, token: &str) -> bool {
        !token.is_empty()
            && self
                .holder
                .as_ref()
                .is_some_and(|h| h.token.as_str() == token)
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// Public status projection, personalized by an optional holder token.
    pub fn status(&self, token: Option<&str>) -> PassOutcome {
        match &self.holder {
            Some(holder) => PassOutcome::new(PassStatus::InUse)
                .with_started_at(holder.started_at)
                .with_holder(token.is_some_and(|t| self.holds(t)))
                .with_blocked(self.blocked),
            None if self.blocked => PassOutcome::new(PassStatus::Blocked).with_blocked(true),
            None => PassOutcome::new(PassStatus::Available).with_blocked(false),
        }
    }

    /// Status projection that also reveals the holder's student id.
    pub fn admin_status(&self) -> PassOutcome {
        let student_id = self.holder.as_ref().and_then(|h| h.student_id.clone());
        self.status(None).with_student_id(student_id)
    }

    // -----------------------------------------------------------------------
    // Transitions
    // -----------------------------------------------------------------------

    /// Take the pass.
    ///
    /// Rejections are checked in order: blocked, already in use, malformed
    /// student id.
    pub fn claim(&self, student_id: Option<&str>, now: Timestamp) -> Transition {
        if self.blocked {
            return Transition::reply(PassOutcome::new(PassStatus::Blocked).with_blocked(true));
        }
        if let Some(holder) = &self.holder {
            return Transition::reply(
                PassOutcome::new(PassStatus::InUse).with_started_at(holder.started_at),
            );
        }
        let Ok(student_id) = student_id::normalize(student_id) else {
            return Transition::reply(PassOutcome::new(PassStatus::InvalidStudentId));
        };

        let token = uuid::Uuid::new_v4().to_string();
        let next = LockState {
            holder: Some(Holder {
                token: token.clone(),
                started_at: now,
                student_id,
            }),
            blocked: self.blocked,
        };
        Transition::mutate(
            PassOutcome::new(PassStatus::Claimed)
                .with_token(token)
                .with_started_at(now),
            next,
        )
    }

    /// End the session if `token` proves ownership.
    pub fn release(&self, token: &str, now: Timestamp) -> Transition {
        let Some(holder) = &self.holder else {
            return Transition::reply(self.status(None));
        };
        if !self.holds(token) {
            return Transition::reply(
                PassOutcome::new(PassStatus::Denied).with_started_at(holder.started_at),
            );
        }
        self.end_session(holder, now, false)
    }

    /// End the session regardless of token.
    pub fn force_release(&self, now: Timestamp) -> Transition {
        match &self.holder {
            Some(holder) => self.end_session(holder, now, true),
            None => Transition::reply(self.status(None)),
        }
    }

    /// Suspend new claims. A held pass stays held.
    pub fn block(&self) -> Transition {
        self.set_blocked(true)
    }

    /// Allow claims again. A held pass stays held.
    pub fn unblock(&self) -> Transition {
        self.set_blocked(false)
    }

    fn set_blocked(&self, blocked: bool) -> Transition {
        let next = LockState {
            holder: self.holder.clone(),
            blocked,
        };
        let outcome = next.status(None);
        if next == *self {
            Transition::reply(outcome)
        } else {
            Transition::mutate(outcome, next)
        }
    }

    fn end_session(&self, holder: &Holder, now: Timestamp, forced: bool) -> Transition {
        let entry = LogEntry::completed(holder, now, forced);
        let next = LockState {
            holder: None,
            blocked: self.blocked,
        };
        let mut outcome = PassOutcome::new(PassStatus::Released).with_blocked(self.blocked);
        if forced {
            outcome = outcome.with_forced();
        }
        Transition {
            outcome,
            next_state: Some(next),
            completed: Some(entry),
        }
    }
}

// ---------------------------------------------------------------------------
// Transition
// ---------------------------------------------------------------------------

/// Result of applying a request to a [`LockState`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub outcome: PassOutcome,
    /// `Some` only when the state changed.
    pub next_state: Option<LockState>,
    /// The session that ended, to be appended to the log.
    pub completed: Option<LogEntry>,
}

impl Transition {
    pub fn reply(outcome: PassOutcome) -> Self {
        Self {
            outcome,
            next_state: None,
            completed: None,
        }
    }

    pub fn mutate(outcome: PassOutcome, next: LockState) -> Self {
        Self {
            outcome,
            next_state: Some(next),
            completed: None,
        }
    }

    pub fn is_mutation(&self) -> bool {
        self.next_state.is_some() || self.completed.is_some()
    }
}

// ---------------------------------------------------------------------------
// Stored form
// ---------------------------------------------------------------------------

/// Flat JSON record as kept in the store.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredLockState {
    #[serde(default)]
    in_use: bool,
    #[serde(default)]
    blocked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    token: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "chrono::serde::ts_milliseconds_option"
    )]
    started_at: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    student_id: Option<String>,
}

impl From<StoredLockState> for LockState {
    fn from(stored: StoredLockState) -> Self {
        // A record claiming possession without both token and start time
        // cannot be released by anyone; treat it as not held.
        let holder = match (stored.in_use, stored.token, stored.started_at) {
            (true, Some(token), Some(started_at)) if !token.is_empty() => Some(Holder {
                token,
                started_at,
                student_id: stored.student_id,
            }),
            _ => None,
        };
        LockState {
            holder,
            blocked: stored.blocked,
        }
    }
}

impl From<LockState> for StoredLockState {
    fn from(state: LockState) -> Self {
        match state.holder {
            Some(holder) => StoredLockState {
                in_use: true,
                blocked: state.blocked,
                token: Some(holder.token),
                started_at: Some(holder.started_at),
                student_id: holder.student_id,
            },
            None => StoredLockState {
                blocked: state.blocked,
                ..StoredLockState::default()
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
