//! Structured error bodies for HTTP responses.
//!
//! Every error a handler can return implements [`ErrorCode`], which gives it
//! a grepable code and a retryable flag. [`error_response`] turns one into
//! `{ "error", "code", "retryable" }` with the chosen status.

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Grepable error code and retryable flag for structured error bodies.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;

    fn retryable(&self) -> bool {
        false
    }
}

/// JSON body sent with every non-2xx API response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub code: &'static str,
    pub retryable: bool,
}

impl ErrorBody {
    #[must_use]
    pub fn from_error(err: &dyn ErrorCode) -> Self {
        Self { error: err.to_string(), code: err.error_code(), retryable: err.retryable() }
    }
}

/// Build an error response with `status` and a body describing `err`.
pub fn error_response(status: StatusCode, err: &dyn ErrorCode) -> Response {
    (status, Json(ErrorBody::from_error(err))).into_response()
}
