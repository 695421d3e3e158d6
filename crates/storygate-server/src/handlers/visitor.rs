//! Visitor endpoints: session bootstrap, the three form steps, the timer
//! poll and the gated story read.
//!
//! Step endpoints on a record already locked to the final view answer
//! success without writing, so a late call can neither move the page cursor
//! back nor restart the countdown.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum_extra::extract::cookie::CookieJar;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use storygate_core::{Page, ResponsePatch, TimerStatus, flow};
use tracing::info;

use super::{SuccessResponse, json_body};
use crate::errors::ApiError;
use crate::session::resolve_session;
use crate::state::AppState;

/// Flow position shown to the client on load.
#[derive(Debug, Serialize)]
pub struct SessionView {
    /// Page cursor, 1 to 4.
    pub current_page: Page,
    /// Client should go straight to the final view.
    pub locked_to_final: bool,
    /// Visitor qualified for the reveal.
    pub is_qualified: bool,
    /// Countdown already observed at zero.
    pub timer_completed: bool,
}

/// GET /api/session body.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    /// Always true.
    pub success: bool,
    /// Flow position.
    pub response: SessionView,
}

/// POST /api/submit-name body.
#[derive(Debug, Deserialize)]
pub struct NameRequest {
    /// Visitor name.
    pub name: Option<String>,
}

/// POST /api/submit-sender body.
#[derive(Debug, Deserialize)]
pub struct SenderRequest {
    /// Who the visitor thinks sent the link.
    #[serde(rename = "senderGuess")]
    pub sender_guess: Option<String>,
}

/// POST /api/submit-feelings body.
#[derive(Debug, Deserialize)]
pub struct FeelingsRequest {
    /// Answer to the feelings question.
    pub feelings: Option<bool>,
}

/// POST /api/submit-feelings reply.
#[derive(Debug, Serialize)]
pub struct FeelingsResponse {
    /// Always true.
    pub success: bool,
    /// Visitor qualified for the reveal.
    pub qualified: bool,
}

/// GET /api/timer reply.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerResponse {
    /// Always true.
    pub success: bool,
    /// Seconds left, never negative.
    pub remaining_seconds: i64,
    /// Countdown at zero.
    pub timer_completed: bool,
    /// Story readable.
    pub story_revealed: bool,
}

/// GET /api/story reply.
#[derive(Debug, Serialize)]
pub struct StoryResponse {
    /// Always true.
    pub success: bool,
    /// Story text.
    pub story: String,
}

/// GET /api/session
pub async fn session(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<SessionResponse>), ApiError> {
    const FAILED: &str = "Failed to initialize session";
    let (jar, session) = resolve_session(&state, jar)
        .await
        .map_err(ApiError::internal(FAILED))?;
    let row = state
        .with_store(move |store| store.get_or_create_response(&session.id))
        .await
        .map_err(ApiError::internal(FAILED))?;

    let response = SessionView {
        current_page: row.current_page,
        locked_to_final: row.locked_to_final,
        is_qualified: row.is_qualified,
        timer_completed: row.timer_completed,
    };
    Ok((
        jar,
        Json(SessionResponse {
            success: true,
            response,
        }),
    ))
}

/// POST /api/submit-name
pub async fn submit_name(
    State(state): State<AppState>,
    jar: CookieJar,
    body: Result<Json<NameRequest>, JsonRejection>,
) -> Result<(CookieJar, Json<SuccessResponse>), ApiError> {
    let name = json_body(body, "Name is required")?.name.unwrap_or_default();
    let patch = flow::submit_name(&name)?;
    let jar = write_step(&state, jar, patch, "Failed to submit name").await?;
    Ok((jar, SuccessResponse::ok()))
}

/// POST /api/submit-sender
pub async fn submit_sender(
    State(state): State<AppState>,
    jar: CookieJar,
    body: Result<Json<SenderRequest>, JsonRejection>,
) -> Result<(CookieJar, Json<SuccessResponse>), ApiError> {
    let guess = json_body(body, "Sender guess is required")?
        .sender_guess
        .unwrap_or_default();
    let patch = flow::submit_sender(&guess)?;
    let jar = write_step(&state, jar, patch, "Failed to submit sender guess").await?;
    Ok((jar, SuccessResponse::ok()))
}

/// Persist a name or sender step, creating the response row if needed.
async fn write_step(
    state: &AppState,
    jar: CookieJar,
    patch: ResponsePatch,
    failed: &'static str,
) -> Result<CookieJar, ApiError> {
    let (jar, session) = resolve_session(state, jar)
        .await
        .map_err(ApiError::internal(failed))?;
    state
        .with_store(move |store| {
            let row = store.get_or_create_response(&session.id)?;
            if row.locked_to_final {
                return Ok(());
            }
            store.apply_patch(&session.id, &patch).map(|_| ())
        })
        .await
        .map_err(ApiError::internal(failed))?;
    Ok(jar)
}

/// POST /api/submit-feelings
pub async fn submit_feelings(
    State(state): State<AppState>,
    jar: CookieJar,
    body: Result<Json<FeelingsRequest>, JsonRejection>,
) -> Result<(CookieJar, Json<FeelingsResponse>), ApiError> {
    const FAILED: &str = "Failed to submit feelings";
    let feelings = json_body(body, "Feelings answer is required")?
        .feelings
        .ok_or_else(|| ApiError::Validation("Feelings answer is required".to_string()))?;

    let (jar, session) = resolve_session(&state, jar)
        .await
        .map_err(ApiError::internal(FAILED))?;
    let now = Utc::now();
    let qualified = state
        .with_store(move |store| {
            let Some(row) = store.get_response(&session.id)? else {
                return Ok(None);
            };
            if row.locked_to_final {
                return Ok(Some(row.is_qualified));
            }
            let outcome = flow::submit_feelings(row.is_name_match, feelings, now);
            let _ = store.apply_patch(&session.id, &outcome.patch)?;
            if outcome.qualified {
                info!(session_id = %session.id, "visitor qualified, countdown started");
            }
            Ok(Some(outcome.qualified))
        })
        .await
        .map_err(ApiError::internal(FAILED))?
        .ok_or_else(|| ApiError::NotFound("Session not found".to_string()))?;

    Ok((
        jar,
        Json(FeelingsResponse {
            success: true,
            qualified,
        }),
    ))
}

/// GET /api/timer
pub async fn timer(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<TimerResponse>), ApiError> {
    const FAILED: &str = "Failed to get timer status";
    let (jar, session) = resolve_session(&state, jar)
        .await
        .map_err(ApiError::internal(FAILED))?;
    let now = Utc::now();
    let status = state
        .with_store(move |store| {
            let Some(row) = store.get_response(&session.id)? else {
                return Ok(None);
            };
            if !row.is_qualified {
                return Ok(None);
            }
            let status = TimerStatus::poll(
                row.timer_duration_seconds,
                row.timer_started_at,
                row.timer_completed,
                now,
            );
            if let Some(reveal) = &status.reveal {
                let _ = store.apply_patch(&session.id, reveal)?;
                info!(session_id = %session.id, "story revealed");
            }
            Ok(Some(status))
        })
        .await
        .map_err(ApiError::internal(FAILED))?
        .ok_or_else(|| ApiError::Forbidden("Not qualified for timer".to_string()))?;

    let done = status.is_complete();
    Ok((
        jar,
        Json(TimerResponse {
            success: true,
            remaining_seconds: status.remaining_seconds,
            timer_completed: done,
            story_revealed: done,
        }),
    ))
}

/// GET /api/story
pub async fn story(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<StoryResponse>), ApiError> {
    const FAILED: &str = "Failed to get story";
    let (jar, session) = resolve_session(&state, jar)
        .await
        .map_err(ApiError::internal(FAILED))?;
    let story = state
        .with_store(move |store| {
            let revealed = store
                .get_response(&session.id)?
                .is_some_and(|row| row.story_revealed);
            if !revealed {
                return Ok(None);
            }
            store.get_story().map(|row| Some(row.content))
        })
        .await
        .map_err(ApiError::internal(FAILED))?
        .ok_or_else(|| ApiError::Forbidden("Story not available yet".to_string()))?;

    Ok((
        jar,
        Json(StoryResponse {
            success: true,
            story,
        }),
    ))
}
