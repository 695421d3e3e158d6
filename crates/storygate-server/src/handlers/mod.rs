//! Route handlers and their JSON envelopes.

pub mod admin;
pub mod visitor;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use serde::Serialize;

use crate::errors::ApiError;

/// `{ "success": true }`
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    /// Always true.
    pub success: bool,
}

impl SuccessResponse {
    /// The bare success envelope.
    pub fn ok() -> Json<Self> {
        Json(Self { success: true })
    }
}

/// Unwrap a JSON body, turning any rejection into a 400 with `message`.
pub(crate) fn json_body<T>(
    body: Result<Json<T>, JsonRejection>,
    message: &str,
) -> Result<T, ApiError> {
    body.map(|Json(inner)| inner).map_err(|rejection| {
        tracing::debug!(%rejection, "rejected request body");
        ApiError::Validation(message.to_string())
    })
}
