use axum::http::header::WWW_AUTHENTICATE;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use hallpass_core::error::CoreError;
use hallpass_db::StoreError;
use serde::Serialize;

use crate::actor::ActorError;
use crate::response::json_response;

/// Challenge sent with every 401 from the admin gate.
pub const ADMIN_REALM: &str = "Basic realm=\"Hall Pass Admin\"";

/// Application-level error type for HTTP handlers.
///
/// Covers transport and configuration failures only. Negative business
/// outcomes (`denied`, `in_use`, ...) are successful
/// [`PassReply`](crate::response::PassReply) values, not errors.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level validation error from `hallpass_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A storage fault.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The pass actor could not process the request.
    #[error(transparent)]
    Actor(#[from] ActorError),

    /// The request body is not valid JSON of the expected shape.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The action is not allowed on this route.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// The HTTP method is not supported on this route.
    #[error("Method not allowed")]
    MethodNotAllowed,

    /// Admin authentication failed.
    #[error("Unauthorized")]
    Unauthorized,

    /// A required collaborator or credential is not configured.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

#[derive(Serialize)]
struct ErrorBody {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(CoreError::Validation(msg)) => {
                (StatusCode::BAD_REQUEST, "bad_request", Some(msg.clone()))
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", Some(msg.clone())),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", Some(msg.clone())),
            AppError::MethodNotAllowed => {
                (StatusCode::METHOD_NOT_ALLOWED, "method_not_allowed", None)
            }
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized", None),
            AppError::Configuration(msg) => {
                tracing::error!(error = %msg, "Missing configuration");
                (StatusCode::INTERNAL_SERVER_ERROR, "error", Some(msg.clone()))
            }
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal()
            }
            AppError::Store(err) => {
                tracing::error!(error = %err, "Pass store error");
                internal()
            }
            AppError::Actor(err) => {
                tracing::error!(error = %err, "Pass actor error");
                internal()
            }
        };

        let mut response = json_response(
            status,
            &ErrorBody {
                status: code,
                message,
            },
        );
        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(WWW_AUTHENTICATE, HeaderValue::from_static(ADMIN_REALM));
        }
        response
    }
}

fn internal() -> (StatusCode, &'static str, Option<String>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "error",
        Some("An internal error occurred".to_string()),
    )
}
