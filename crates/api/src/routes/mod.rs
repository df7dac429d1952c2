pub mod admin;
pub mod hallpass;
pub mod health;

use axum::extract::rejection::QueryRejection;
use axum::extract::Query;
use axum::Router;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Build the hall pass route tree.
///
/// Route hierarchy:
///
/// ```text
/// /api/hallpass                 GET status, POST claim|status|release (public)
/// /admin/api/hallpass           GET status, POST any action (admin only)
/// /admin/release                POST force release (admin only)
/// ```
pub fn pass_routes() -> Router<AppState> {
    Router::new()
        .merge(hallpass::router())
        .merge(admin::router())
}

/// Optional holder token carried out of band (`?token=`).
#[derive(Debug, Default, Deserialize)]
pub struct TokenQuery {
    pub token: Option<String>,
}

impl TokenQuery {
    /// Unwrap the extractor result, turning a rejected query string into a
    /// JSON 400 instead of axum's plain-text rejection.
    pub fn token(query: Result<Query<Self>, QueryRejection>) -> AppResult<Option<String>> {
        let Query(query) = query.map_err(|e| AppError::BadRequest(e.body_text()))?;
        Ok(query.token)
    }
}
