//! Visitor responses: one row per session, written by the form steps and
//! the timer, read by the admin listing.

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use storygate_core::{Page, ResponsePatch, SessionId};

use crate::errors::Result;
use crate::row_helpers::{format_timestamp, optional_timestamp, page, timestamp};
use crate::row_types::ResponseRow;

const COLUMNS: &str = "id, session_id, name_input, sender_guess, feelings_answer, current_page,
     is_name_match, is_qualified, timer_started_at, timer_duration_seconds, timer_completed,
     story_revealed, locked_to_final, created_at, updated_at";

/// Response repository.
pub struct ResponseRepo;

impl ResponseRepo {
    /// Return the session's response, creating a page-1 row if none exists.
    pub fn upsert_for_session(
        conn: &Connection,
        session_id: &SessionId,
        timer_duration_secs: i64,
        now: DateTime<Utc>,
    ) -> Result<ResponseRow> {
        let sql = format!(
            "INSERT INTO responses (session_id, timer_duration_seconds, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?3)
             ON CONFLICT(session_id) DO UPDATE SET updated_at = excluded.updated_at
             RETURNING {COLUMNS}"
        );
        let row = conn.query_row(
            &sql,
            params![session_id.as_str(), timer_duration_secs, format_timestamp(now)],
            Self::map_row,
        )?;
        Ok(row)
    }

    /// The session's response, if any.
    pub fn get_by_session(conn: &Connection, session_id: &SessionId) -> Result<Option<ResponseRow>> {
        let row = conn
            .query_row(
                &format!("SELECT {COLUMNS} FROM responses WHERE session_id = ?1"),
                params![session_id.as_str()],
                Self::map_row,
            )
            .optional()?;
        Ok(row)
    }

    /// Write every `Some` field of `patch` in one statement.
    ///
    /// Returns `None` when the session has no response row.
    pub fn apply_patch(
        conn: &Connection,
        session_id: &SessionId,
        patch: &ResponsePatch,
        now: DateTime<Utc>,
    ) -> Result<Option<ResponseRow>> {
        let sql = format!(
            "UPDATE responses SET
                 name_input       = COALESCE(?1, name_input),
                 sender_guess     = COALESCE(?2, sender_guess),
                 feelings_answer  = COALESCE(?3, feelings_answer),
                 current_page     = COALESCE(?4, current_page),
                 is_name_match    = COALESCE(?5, is_name_match),
                 is_qualified     = COALESCE(?6, is_qualified),
                 timer_started_at = COALESCE(?7, timer_started_at),
                 timer_completed  = COALESCE(?8, timer_completed),
                 story_revealed   = COALESCE(?9, story_revealed),
                 locked_to_final  = COALESCE(?10, locked_to_final),
                 updated_at       = ?11
             WHERE session_id = ?12
             RETURNING {COLUMNS}"
        );
        let row = conn
            .query_row(
                &sql,
                params![
                    patch.name_input,
                    patch.sender_guess,
                    patch.feelings_answer,
                    patch.current_page.map(Page::number),
                    patch.is_name_match,
                    patch.is_qualified,
                    patch.timer_started_at.map(format_timestamp),
                    patch.timer_completed,
                    patch.story_revealed,
                    patch.locked_to_final,
                    format_timestamp(now),
                    session_id.as_str(),
                ],
                Self::map_row,
            )
            .optional()?;
        Ok(row)
    }

    /// All responses, newest first.
    pub fn list_newest_first(conn: &Connection) -> Result<Vec<ResponseRow>> {
        let mut stmt = conn.prepare(&format!(
            "SELECT {COLUMNS} FROM responses ORDER BY created_at DESC, id DESC"
        ))?;
        let rows = stmt
            .query_map([], Self::map_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Delete every response.
    pub fn delete_all(conn: &Connection) -> Result<usize> {
        Ok(conn.execute("DELETE FROM responses", [])?)
    }

    fn map_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ResponseRow> {
        Ok(ResponseRow {
            id: row.get("id")?,
            session_id: SessionId::from_string(row.get("session_id")?),
            name_input: row.get("name_input")?,
            sender_guess: row.get("sender_guess")?,
            feelings_answer: row.get("feelings_answer")?,
            current_page: page(row, "current_page")?,
            is_name_match: row.get("is_name_match")?,
            is_qualified: row.get("is_qualified")?,
            timer_started_at: optional_timestamp(row, "timer_started_at")?,
            timer_duration_seconds: row.get("timer_duration_seconds")?,
            timer_completed: row.get("timer_completed")?,
            story_revealed: row.get("story_revealed")?,
            locked_to_final: row.get("locked_to_final")?,
            created_at: timestamp(row, "created_at")?,
            updated_at: timestamp(row, "updated_at")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use storygate_core::SessionToken;
    use storygate_core::constants::TIMER_DURATION_SECS;
    use storygate_core::flow::{submit_feelings, submit_name, submit_sender};

    use super::*;
    use crate::repositories::session::SessionRepo;
    use crate::repositories::test_support::migrated;

    fn new_session(conn: &Connection) -> SessionId {
        SessionRepo::upsert(conn, &SessionToken::new(), Utc::now())
            .unwrap()
            .id
    }

    #[test]
    fn upsert_creates_page_one_defaults() {
        let conn = migrated();
        let sid = new_session(&conn);
        let row = ResponseRepo::upsert_for_session(&conn, &sid, TIMER_DURATION_SECS, Utc::now())
            .unwrap();
        assert_eq!(row.session_id, sid);
        assert_eq!(row.current_page, Page::Name);
        assert_eq!(row.name_input, None);
        assert_eq!(row.feelings_answer, None);
        assert!(!row.is_qualified);
        assert!(!row.locked_to_final);
        assert_eq!(row.timer_started_at, None);
        assert_eq!(row.timer_duration_seconds, 120);
    }

    #[test]
    fn upsert_keeps_existing_progress() {
        let conn = migrated();
        let sid = new_session(&conn);
        let now = Utc::now();
        let first = ResponseRepo::upsert_for_session(&conn, &sid, 120, now).unwrap();
        let _ = ResponseRepo::apply_patch(&conn, &sid, &submit_name("Asha").unwrap(), now)
            .unwrap();

        let again = ResponseRepo::upsert_for_session(&conn, &sid, 120, now).unwrap();
        assert_eq!(again.id, first.id);
        assert_eq!(again.name_input.as_deref(), Some("Asha"));
        assert_eq!(again.current_page, Page::SenderGuess);
    }

    #[test]
    fn patch_touches_only_named_fields() {
        let conn = migrated();
        let sid = new_session(&conn);
        let now = Utc::now();
        let _ = ResponseRepo::upsert_for_session(&conn, &sid, 120, now).unwrap();
        let _ = ResponseRepo::apply_patch(&conn, &sid, &submit_name("Asha").unwrap(), now)
            .unwrap();

        let row = ResponseRepo::apply_patch(&conn, &sid, &submit_sender("velu").unwrap(), now)
            .unwrap()
            .unwrap();
        assert_eq!(row.name_input.as_deref(), Some("Asha"));
        assert_eq!(row.sender_guess.as_deref(), Some("velu"));
        assert!(row.is_name_match);
        assert_eq!(row.current_page, Page::Feelings);
    }

    #[test]
    fn qualifying_patch_stores_timer_start() {
        let conn = migrated();
        let sid = new_session(&conn);
        let now = Utc::now();
        let _ = ResponseRepo::upsert_for_session(&conn, &sid, 120, now).unwrap();

        let outcome = submit_feelings(true, true, now);
        let row = ResponseRepo::apply_patch(&conn, &sid, &outcome.patch, now)
            .unwrap()
            .unwrap();
        assert_eq!(row.feelings_answer, Some(true));
        assert!(row.is_qualified);
        assert!(row.locked_to_final);
        assert_eq!(row.current_page, Page::Final);
        let started = row.timer_started_at.unwrap();
        assert!((now - started).num_milliseconds().abs() < 1);
    }

    #[test]
    fn false_values_are_written() {
        let conn = migrated();
        let sid = new_session(&conn);
        let now = Utc::now();
        let _ = ResponseRepo::upsert_for_session(&conn, &sid, 120, now).unwrap();
        let row = ResponseRepo::apply_patch(&conn, &sid, &submit_feelings(true, false, now).patch, now)
            .unwrap()
            .unwrap();
        assert_eq!(row.feelings_answer, Some(false));
        assert!(!row.is_qualified);
        assert_eq!(row.timer_started_at, None);
    }

    #[test]
    fn patch_on_missing_row_is_none() {
        let conn = migrated();
        let sid = new_session(&conn);
        let result =
            ResponseRepo::apply_patch(&conn, &sid, &ResponsePatch::reveal(), Utc::now()).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn list_is_newest_first() {
        let conn = migrated();
        let t0 = Utc::now();
        let older = new_session(&conn);
        let newer = new_session(&conn);
        let _ = ResponseRepo::upsert_for_session(&conn, &older, 120, t0).unwrap();
        let _ = ResponseRepo::upsert_for_session(&conn, &newer, 120, t0 + Duration::seconds(1))
            .unwrap();

        let rows = ResponseRepo::list_newest_first(&conn).unwrap();
        let ids: Vec<_> = rows.iter().map(|r| r.session_id.clone()).collect();
        assert_eq!(ids, vec![newer, older]);
    }

    #[test]
    fn deleting_a_session_cascades() {
        let conn = migrated();
        let sid = new_session(&conn);
        let _ = ResponseRepo::upsert_for_session(&conn, &sid, 120, Utc::now()).unwrap();
        let _ = SessionRepo::delete_all(&conn).unwrap();
        assert!(ResponseRepo::get_by_session(&conn, &sid).unwrap().is_none());
    }
}
