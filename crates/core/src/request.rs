//! Typed hall pass requests.
//!
//! Incoming JSON bodies are loosely shaped (`{ action, token?, studentId? }`).
//! [`PassRequest::from_payload`] turns them into a closed set of variants
//! before any transition logic runs.

use std::str::FromStr;

use serde::Deserialize;

use crate::error::CoreError;

/// Action selector carried in a write request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PassAction {
    Status,
    AdminStatus,
    Log,
    Claim,
    Release,
    ForceRelease,
    Block,
    Unblock,
}

impl PassAction {
    pub fn as_str(self) -> &'static str {
        match self {
            PassAction::Status => "status",
            PassAction::AdminStatus => "admin_status",
            PassAction::Log => "log",
            PassAction::Claim => "claim",
            PassAction::Release => "release",
            PassAction::ForceRelease => "force_release",
            PassAction::Block => "block",
            PassAction::Unblock => "unblock",
        }
    }

    /// Actions that unauthenticated callers may invoke.
    pub fn is_public(self) -> bool {
        matches!(
            self,
            PassAction::Status | PassAction::Claim | PassAction::Release
        )
    }
}

impl FromStr for PassAction {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "status" => Ok(PassAction::Status),
            "admin_status" => Ok(PassAction::AdminStatus),
            "log" => Ok(PassAction::Log),
            "claim" => Ok(PassAction::Claim),
            "release" => Ok(PassAction::Release),
            "force_release" => Ok(PassAction::ForceRelease),
            "block" => Ok(PassAction::Block),
            "unblock" => Ok(PassAction::Unblock),
            "" => Err(CoreError::Validation("Missing action".to_string())),
            other => Err(CoreError::Validation(format!("Unknown action: {other}"))),
        }
    }
}

impl std::fmt::Display for PassAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw write request body.
///
/// Unknown fields are ignored. Fields of the wrong JSON type make the whole
/// body malformed.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PassPayload {
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub student_id: Option<String>,
}

/// A validated request, ready for the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PassRequest {
    Status { token: Option<String> },
    AdminStatus,
    Log,
    Claim { student_id: Option<String> },
    Release { token: String },
    ForceRelease,
    Block,
    Unblock,
}

impl PassRequest {
    /// Build a request from a parsed body.
    pub fn from_payload(payload: PassPayload) -> Result<Self, CoreError> {
        let action: PassAction = payload.action.as_deref().unwrap_or_default().parse()?;
        Ok(match action {
            PassAction::Status => PassRequest::Status {
                token: payload.token,
            },
            PassAction::AdminStatus => PassRequest::AdminStatus,
            PassAction::Log => PassRequest::Log,
            PassAction::Claim => PassRequest::Claim {
                student_id: payload.student_id,
            },
            PassAction::Release => PassRequest::Release {
                token: payload.token.unwrap_or_default(),
            },
            PassAction::ForceRelease => PassRequest::ForceRelease,
            PassAction::Block => PassRequest::Block,
            PassAction::Unblock => PassRequest::Unblock,
        })
    }

    pub fn action(&self) -> PassAction {
        match self {
            PassRequest::Status { .. } => PassAction::Status,
            PassRequest::AdminStatus => PassAction::AdminStatus,
            PassRequest::Log => PassAction::Log,
            PassRequest::Claim { .. } => PassAction::Claim,
            PassRequest::Release { .. } => PassAction::Release,
            PassRequest::ForceRelease => PassAction::ForceRelease,
            PassRequest::Block => PassAction::Block,
            PassRequest::Unblock => PassAction::Unblock,
        }
    }
}
