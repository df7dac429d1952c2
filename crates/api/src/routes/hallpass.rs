//! Public hall pass endpoint.

use axum::body::Bytes;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::Method;
use axum::routing::any;
use axum::Router;

use super::TokenQuery;
use crate::dispatch;
use crate::error::{AppError, AppResult};
use crate::response::PassReply;
use crate::state::AppState;

/// GET|POST /api/hallpass
///
/// Reads are open. Writes are limited to the actions in
/// [`PassAction::is_public`](hallpass_core::request::PassAction::is_public);
/// anything else, including a missing or unknown action, is 403.
async fn public_pass(
    State(state): State<AppState>,
    method: Method,
    query: Result<Query<TokenQuery>, QueryRejection>,
    body: Bytes,
) -> AppResult<PassReply> {
    let passes = state.passes()?;
    let token = TokenQuery::token(query)?;
    let request = dispatch::parse_public_request(&method, token, &body).inspect_err(|e| {
        if matches!(e, AppError::Forbidden(_)) {
            tracing::warn!(error = %e, "Rejected non-public action on public route");
        }
    })?;

    let outcome = passes
        .dispatch(&state.config.resource_name, request)
        .await?;
    Ok(PassReply(outcome))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/hallpass", any(public_pass))
}
