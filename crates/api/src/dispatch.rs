//! The single mutation boundary for a resource name.
//!
//! [`execute`] is the only code that writes pass state or the session log.
//! It runs inside the resource's [`PassActor`](crate::actor::PassActor), so a
//! load, decide and persist sequence never interleaves with another request
//! for the same name.
//!
//! [`parse_request`] turns the HTTP shape (method, query token, body) into a
//! typed [`PassRequest`] before anything reaches the actor.
//! [`parse_public_request`] does the same for unauthenticated callers and
//! gates the raw action string before it is interpreted.

use axum::http::Method;
use hallpass_core::lock::Transition;
use hallpass_core::outcome::PassOutcome;
use hallpass_core::request::{PassAction, PassPayload, PassRequest};
use hallpass_core::types::Timestamp;
use hallpass_db::{PassStorage, PassWrite, StoreError};

use serde_json::Value;

use crate::error::{AppError, AppResult};

// ---------------------------------------------------------------------------
// Request parsing
// ---------------------------------------------------------------------------

/// Interpret method, optional query token and body.
///
/// - `GET` is a status read personalized by `query_token`.
/// - `POST` must carry a JSON body with a recognized `action`.
/// - Anything else is rejected as [`AppError::MethodNotAllowed`].
pub fn parse_request(
    method: &Method,
    query_token: Option<String>,
    body: &[u8],
) -> AppResult<PassRequest> {
    if method == Method::GET {
        return Ok(PassRequest::Status { token: query_token });
    }
    if method != Method::POST {
        return Err(AppError::MethodNotAllowed);
    }
    parse_body(body)
}

/// Like [`parse_request`], but a `POST` whose action is missing, unknown or
/// not in [`PassAction::is_public`] is [`AppError::Forbidden`].
pub fn parse_public_request(
    method: &Method,
    query_token: Option<String>,
    body: &[u8],
) -> AppResult<PassRequest> {
    if method != Method::POST {
        return parse_request(method, query_token, body);
    }

    let payload = parse_payload(body)?;
    let action = payload.action.as_deref().unwrap_or_default();
    if !action.parse::<PassAction>().is_ok_and(PassAction::is_public) {
        return Err(AppError::Forbidden(format!("Action '{action}' is not allowed")));
    }
    Ok(PassRequest::from_payload(payload)?)
}

/// Parse a write request body.
pub fn parse_body(body: &[u8]) -> AppResult<PassRequest> {
    Ok(PassRequest::from_payload(parse_payload(body)?)?)
}

/// Decode a body that must be a JSON object.
///
/// Arrays are rejected up front; serde would otherwise fill the payload
/// fields by position.
pub fn parse_payload(body: &[u8]) -> AppResult<PassPayload> {
    let value: Value = serde_json::from_slice(body).map_err(malformed)?;
    if !value.is_object() {
        return Err(AppError::BadRequest(
            "Malformed request body: expected a JSON object".to_string(),
        ));
    }
    serde_json::from_value(value).map_err(malformed)
}

fn malformed(e: serde_json::Error) -> AppError {
    AppError::BadRequest(format!("Malformed request body: {e}"))
}

// ---------------------------------------------------------------------------
// Execution
// ---------------------------------------------------------------------------

/// Handle one request against the stored state at time `now`.
///
/// Everything is reloaded from `storage`; nothing is cached between calls.
/// A transition's state and log changes are committed in one batch.
pub async fn execute(
    storage: &PassStorage,
    request: PassRequest,
    now: Timestamp,
) -> Result<PassOutcome, StoreError> {
    match request {
        PassRequest::Status { token } => {
            let state = storage.load_state().await?;
            Ok(state.status(token.as_deref()))
        }
        PassRequest::AdminStatus => Ok(storage.load_state().await?.admin_status()),
        PassRequest::Log => {
            let mut log = storage.load_log().await?;
            if log.prune(now) {
                storage
                    .commit(PassWrite {
                        state: None,
                        log: Some(log.clone()),
                    })
                    .await?;
            }
            Ok(PassOutcome::log(&log))
        }
        PassRequest::Claim { student_id } => {
            let state = storage.load_state().await?;
            apply(storage, state.claim(student_id.as_deref(), now), now).await
        }
        PassRequest::Release { token } => {
            let state = storage.load_state().await?;
            apply(storage, state.release(&token, now), now).await
        }
        PassRequest::ForceRelease => {
            let state = storage.load_state().await?;
            apply(storage, state.force_release(now), now).await
        }
        PassRequest::Block => {
            let state = storage.load_state().await?;
            apply(storage, state.block(), now).await
        }
        PassRequest::Unblock => {
            let state = storage.load_state().await?;
            apply(storage, state.unblock(), now).await
        }
    }
}

async fn apply(
    storage: &PassStorage,
    transition: Transition,
    now: Timestamp,
) -> Result<PassOutcome, StoreError> {
    if !transition.is_mutation() {
        return Ok(transition.outcome);
    }

    let mut write = PassWrite {
        state: transition.next_state,
        log: None,
    };
    if let Some(entry) = transition.completed {
        let mut log = storage.load_log().await?;
        log.append(entry, now);
        write.log = Some(log);
    }
    storage.commit(write).await?;

    tracing::info!(
        resource = %storage.resource(),
        status = %transition.outcome.status,
        forced = transition.outcome.forced.unwrap_or(false),
        "Hall pass state changed"
    );
    Ok(transition.outcome)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
