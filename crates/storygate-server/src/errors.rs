//! HTTP error mapping.
//!
//! Every failure renders as `{ "success": false, "error": "<message>" }`.
//! Internal failures carry only the endpoint's generic message; the cause is
//! logged where it is converted.

use std::fmt::Display;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use storygate_core::FlowError;
use thiserror::Error;
use tracing::error;

/// An error answered to the client.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ApiError {
    /// Missing, empty or wrong-typed input (400).
    #[error("{0}")]
    Validation(String),
    /// Missing or wrong admin credential (401).
    #[error("{0}")]
    Unauthorized(String),
    /// Visitor may not see this yet (403).
    #[error("{0}")]
    Forbidden(String),
    /// The visitor has no response row (404).
    #[error("{0}")]
    NotFound(String),
    /// Storage or runtime failure (500).
    #[error("{0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    success: bool,
    error: &'a str,
}

impl ApiError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Build a `map_err` adapter that logs the cause and answers a generic
    /// 500 with `message`.
    pub fn internal<E: Display>(message: &'static str) -> impl FnOnce(E) -> Self {
        move |cause| {
            error!(error = %cause, "{message}");
            Self::Internal(message.to_string())
        }
    }
}

impl From<FlowError> for ApiError {
    fn from(err: FlowError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();
        let body = ErrorBody {
            success: false,
            error: &message,
        };
        (status, Json(body)).into_response()
    }
}
