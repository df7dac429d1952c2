//! Administrative hall pass endpoints. Every handler requires
//! [`RequireAdmin`].

use axum::body::Bytes;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::Method;
use axum::routing::any;
use axum::Router;
use hallpass_core::request::PassRequest;

use super::TokenQuery;
use crate::dispatch;
use crate::error::{AppError, AppResult};
use crate::middleware::admin::RequireAdmin;
use crate::response::PassReply;
use crate::state::AppState;

/// GET|POST /admin/api/hallpass
///
/// Accepts every recognized action, including `admin_status`, `log`,
/// `block`, `unblock` and `force_release`.
async fn admin_pass(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    method: Method,
    query: Result<Query<TokenQuery>, QueryRejection>,
    body: Bytes,
) -> AppResult<PassReply> {
    let passes = state.passes()?;
    let token = TokenQuery::token(query)?;
    let request = dispatch::parse_request(&method, token, &body)?;

    tracing::info!(action = %request.action(), "Admin pass request");
    let outcome = passes
        .dispatch(&state.config.resource_name, request)
        .await?;
    Ok(PassReply(outcome))
}

/// POST /admin/release
///
/// Ends the current session regardless of token.
async fn force_release(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    method: Method,
) -> AppResult<PassReply> {
    if method != Method::POST {
        return Err(AppError::MethodNotAllowed);
    }
    let passes = state.passes()?;

    tracing::info!("Admin force release");
    let outcome = passes
        .dispatch(&state.config.resource_name, PassRequest::ForceRelease)
        .await?;
    Ok(PassReply(outcome))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin/api/hallpass", any(admin_pass))
        .route("/admin/release", any(force_release))
}
