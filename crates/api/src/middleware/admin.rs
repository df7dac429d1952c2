//! Basic-auth gate for administrative routes.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::AppError;
use crate::state::AppState;

/// Marker extractor proving the caller presented the configured admin
/// credentials.
///
/// Rejects with 500 when no credentials are configured and with 401 (plus a
/// `www-authenticate` challenge) on any authentication failure.
///
/// ```ignore
/// async fn admin_only(_admin: RequireAdmin) -> AppResult<PassReply> {
///     // caller is authenticated here
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RequireAdmin;

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(expected) = state.config.admin.as_ref() else {
            return Err(AppError::Configuration(
                "Admin credentials are not configured.".into(),
            ));
        };

        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();

        let Some((user, pass)) = decode_basic(header) else {
            tracing::warn!("Rejected admin request with missing or malformed credentials");
            return Err(AppError::Unauthorized);
        };

        if !expected.matches(&user, &pass) {
            tracing::warn!(user = %user, "Rejected admin request with wrong credentials");
            return Err(AppError::Unauthorized);
        }

        Ok(RequireAdmin)
    }
}

/// Decode a `Basic <base64(user:pass)>` header value.
///
/// The password is everything after the first `:` and may itself contain `:`.
pub fn decode_basic(header: &str) -> Option<(String, String)> {
    let encoded = header.strip_prefix("Basic ")?;
    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (user, pass) = decoded.split_once(':')?;
    Some((user.to_string(), pass.to_string()))
}
