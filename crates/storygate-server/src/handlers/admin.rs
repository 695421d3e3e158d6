//! Admin endpoints. Everything except login requires the admin cookie.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};
use storygate_store::{ResponseRow, Store};
use tracing::{info, warn};

use super::{SuccessResponse, json_body};
use crate::auth::require_admin;
use crate::cookies::{admin_cookie, admin_removal_cookie};
use crate::errors::ApiError;
use crate::state::AppState;

/// POST /api/admin/auth body.
#[derive(Debug, Deserialize)]
pub struct AuthRequest {
    /// Candidate shared secret.
    pub password: Option<String>,
}

/// POST /api/admin/story body.
#[derive(Debug, Deserialize)]
pub struct StoryUpdateRequest {
    /// New story text.
    pub content: Option<String>,
}

/// GET /api/admin/responses reply.
#[derive(Debug, Serialize)]
pub struct ResponsesResponse {
    /// Always true.
    pub success: bool,
    /// Every response row, newest first.
    pub responses: Vec<ResponseRow>,
}

/// GET /api/admin/story reply.
#[derive(Debug, Serialize)]
pub struct AdminStoryResponse {
    /// Always true.
    pub success: bool,
    /// Current story text.
    pub story: String,
}

/// POST /api/admin/auth
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    body: Result<Json<AuthRequest>, JsonRejection>,
) -> Result<(CookieJar, Json<SuccessResponse>), ApiError> {
    let invalid = || ApiError::Unauthorized("Invalid password".to_string());
    let password = json_body(body, "Invalid password")
        .map_err(|_| invalid())?
        .password
        .unwrap_or_default();

    let secret = &state.settings.admin.password;
    if password != *secret {
        warn!("failed admin login");
        return Err(invalid());
    }

    info!("admin logged in");
    let base_path = state.settings.server.normalized_base_path();
    let cookie = admin_cookie(secret, &base_path, &state.settings.cookies);
    Ok((jar.add(cookie), SuccessResponse::ok()))
}

/// DELETE /api/admin/auth
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Json<SuccessResponse>) {
    let base_path = state.settings.server.normalized_base_path();
    (jar.add(admin_removal_cookie(&base_path)), SuccessResponse::ok())
}

/// GET /api/admin/responses
pub async fn responses(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Json<ResponsesResponse>, ApiError> {
    require_admin(&state, &jar)?;
    let responses = state
        .with_store(Store::list_responses)
        .await
        .map_err(ApiError::internal("Failed to get responses"))?;
    Ok(Json(ResponsesResponse {
        success: true,
        responses,
    }))
}

/// GET /api/admin/story
pub async fn get_story(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Json<AdminStoryResponse>, ApiError> {
    require_admin(&state, &jar)?;
    let story = state
        .with_store(Store::get_story)
        .await
        .map_err(ApiError::internal("Failed to get story"))?;
    Ok(Json(AdminStoryResponse {
        success: true,
        story: story.content,
    }))
}

/// POST /api/admin/story
pub async fn update_story(
    State(state): State<AppState>,
    jar: CookieJar,
    body: Result<Json<StoryUpdateRequest>, JsonRejection>,
) -> Result<Json<SuccessResponse>, ApiError> {
    const REQUIRED: &str = "Story content is required";
    require_admin(&state, &jar)?;
    let content = json_body(body, REQUIRED)?
        .content
        .filter(|c| !c.is_empty())
        .ok_or_else(|| ApiError::Validation(REQUIRED.to_string()))?;

    let row = state
        .with_store(move |store| store.update_story(&content))
        .await
        .map_err(ApiError::internal("Failed to update story"))?;
    info!(length = row.content.len(), "story updated");
    Ok(SuccessResponse::ok())
}

/// POST /api/admin/reset
pub async fn reset(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Json<SuccessResponse>, ApiError> {
    require_admin(&state, &jar)?;
    state
        .with_store(Store::reset_all)
        .await
        .map_err(ApiError::internal("Failed to reset data"))?;
    info!("admin reset all responses and the story");
    Ok(SuccessResponse::ok())
}
