//! JSON response helpers.
//!
//! Every hall pass response, success or failure, is JSON with
//! `cache-control: no-store`. Business outcomes (including `denied`,
//! `in_use`, `blocked`) are 200 responses.

use axum::http::header::{CACHE_CONTROL, CONTENT_TYPE};
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use hallpass_core::outcome::{PassOutcome, PassStatus};
use serde::Serialize;

pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";
pub const NO_STORE: &str = "no-store";

/// Serialize `body` with the standard headers.
pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response {
    let bytes = match serde_json::to_vec(body) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::error!(error = %e, "Failed to serialize response body");
            return (StatusCode::INTERNAL_SERVER_ERROR, [(CACHE_CONTROL, NO_STORE)]).into_response();
        }
    };

    let mut response = (status, bytes).into_response();
    let headers = response.headers_mut();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
    headers.insert(CACHE_CONTROL, HeaderValue::from_static(NO_STORE));
    response
}

/// A hall pass outcome rendered as an HTTP response.
#[derive(Debug)]
pub struct PassReply(pub PassOutcome);

impl PassReply {
    /// `invalid_student_id` is a validation failure; everything else is a
    /// business outcome.
    pub fn status_code(&self) -> StatusCode {
        match self.0.status {
            PassStatus::InvalidStudentId => StatusCode::BAD_REQUEST,
            _ => StatusCode::OK,
        }
    }
}

impl IntoResponse for PassReply {
    fn into_response(self) -> Response {
        json_response(self.status_code(), &self.0)
    }
}
