//! `/health` endpoint.

use std::time::Instant;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Serialize;
use storygate_store::Store;
use tracing::error;

use crate::state::AppState;

/// Health check response body.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// `"ok"` when the store answers, `"degraded"` otherwise.
    pub status: String,
    /// Seconds since the server started.
    pub uptime_secs: u64,
}

/// Build a health response.
pub fn health_check(start_time: Instant, store_ok: bool) -> HealthResponse {
    HealthResponse {
        status: if store_ok { "ok" } else { "degraded" }.into(),
        uptime_secs: start_time.elapsed().as_secs(),
    }
}

/// GET /health
pub async fn health_handler(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let store_ok = match state.with_store(Store::health_check).await {
        Ok(()) => true,
        Err(e) => {
            error!(error = %e, "health check failed");
            false
        }
    };
    let status = if store_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(health_check(state.start_time, store_ok)))
}
