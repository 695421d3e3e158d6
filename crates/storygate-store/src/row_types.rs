//! Database row types.
//!
//! [`ResponseRow`] doubles as the admin listing item, so its serde shape
//! (snake_case keys, page as a number, RFC 3339 timestamps) is part of the
//! HTTP contract.

use chrono::{DateTime, Utc};
use serde::Serialize;
use storygate_core::{Page, SessionId, SessionToken};

/// One visitor identity from the `sessions` table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SessionRow {
    /// Row id.
    pub id: SessionId,
    /// Opaque cookie value.
    pub session_token: SessionToken,
    /// First seen.
    pub created_at: DateTime<Utc>,
    /// Last seen.
    pub updated_at: DateTime<Utc>,
}

/// A visitor's progress through the form, from the `responses` table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ResponseRow {
    /// Row id.
    pub id: i64,
    /// Owning session.
    pub session_id: SessionId,
    /// Trimmed name from page 1.
    pub name_input: Option<String>,
    /// Trimmed guess from page 2.
    pub sender_guess: Option<String>,
    /// Answer from page 3.
    pub feelings_answer: Option<bool>,
    /// Page cursor.
    pub current_page: Page,
    /// Guess contained an accepted name.
    pub is_name_match: bool,
    /// Name match and a yes.
    pub is_qualified: bool,
    /// Countdown start, set once on qualification.
    pub timer_started_at: Option<DateTime<Utc>>,
    /// Countdown length.
    pub timer_duration_seconds: i64,
    /// Countdown observed at zero.
    pub timer_completed: bool,
    /// Story readable.
    pub story_revealed: bool,
    /// Held on the final view.
    pub locked_to_final: bool,
    /// Created.
    pub created_at: DateTime<Utc>,
    /// Last written.
    pub updated_at: DateTime<Utc>,
}

/// The story text, from the `story` table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StoryRow {
    /// Row id.
    pub id: i64,
    /// Story body.
    pub content: String,
    /// Last replaced.
    pub updated_at: DateTime<Utc>,
}
