//! Visitor identities, keyed by the cookie token.

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use storygate_core::{SessionId, SessionToken};

use crate::errors::Result;
use crate::row_helpers::{format_timestamp, timestamp};
use crate::row_types::SessionRow;

const COLUMNS: &str = "id, session_token, created_at, updated_at";

/// Session repository.
pub struct SessionRepo;

impl SessionRepo {
    /// Insert a session for `token`, or touch `updated_at` if it exists.
    ///
    /// The id of an existing row never changes.
    pub fn upsert(conn: &Connection, token: &SessionToken, now: DateTime<Utc>) -> Result<SessionRow> {
        let sql = format!(
            "INSERT INTO sessions (id, session_token, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?3)
             ON CONFLICT(session_token) DO UPDATE SET updated_at = excluded.updated_at
             RETURNING {COLUMNS}"
        );
        let row = conn.query_row(
            &sql,
            params![SessionId::new().as_str(), token.as_str(), format_timestamp(now)],
            Self::map_row,
        )?;
        Ok(row)
    }

    /// Look up a session by token.
    pub fn get_by_token(conn: &Connection, token: &SessionToken) -> Result<Option<SessionRow>> {
        let row = conn
            .query_row(
                &format!("SELECT {COLUMNS} FROM sessions WHERE session_token = ?1"),
                params![token.as_str()],
                Self::map_row,
            )
            .optional()?;
        Ok(row)
    }

    /// Number of sessions.
    pub fn count(conn: &Connection) -> Result<i64> {
        Ok(conn.query_row("SELECT COUNT(*) FROM sessions", [], |row| row.get(0))?)
    }

    /// Delete every session. Responses go with them.
    pub fn delete_all(conn: &Connection) -> Result<usize> {
        Ok(conn.execute("DELETE FROM sessions", [])?)
    }

    fn map_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<SessionRow> {
        Ok(SessionRow {
            id: SessionId::from_string(row.get("id")?),
            session_token: SessionToken::from_string(row.get("session_token")?),
            created_at: timestamp(row, "created_at")?,
            updated_at: timestamp(row, "updated_at")?,
        })
    }
}
