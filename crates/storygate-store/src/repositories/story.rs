//! The story text. The table may hold several rows; the newest one wins.

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, params};

use crate::errors::Result;
use crate::row_helpers::{format_timestamp, timestamp};
use crate::row_types::StoryRow;

/// Story repository.
pub struct StoryRepo;

impl StoryRepo {
    /// The current story row.
    pub fn get_latest(conn: &Connection) -> Result<Option<StoryRow>> {
        let row = conn
            .query_row(
                "SELECT id, content, updated_at FROM story ORDER BY id DESC LIMIT 1",
                [],
                Self::map_row,
            )
            .optional()?;
        Ok(row)
    }

    /// Replace the current story's content, inserting a row if the table is
    /// empty.
    pub fn replace_latest(conn: &Connection, content: &str, now: DateTime<Utc>) -> Result<StoryRow> {
        let updated_at = format_timestamp(now);
        let updated = conn
            .query_row(
                "UPDATE story SET content = ?1, updated_at = ?2
                 WHERE id = (SELECT MAX(id) FROM story)
                 RETURNING id, content, updated_at",
                params![content, updated_at],
                Self::map_row,
            )
            .optional()?;
        if let Some(row) = updated {
            return Ok(row);
        }
        let row = conn.query_row(
            "INSERT INTO story (content, updated_at) VALUES (?1, ?2)
             RETURNING id, content, updated_at",
            params![content, updated_at],
            Self::map_row,
        )?;
        Ok(row)
    }

    /// Insert `content` only when the table is empty. Returns whether a row
    /// was added.
    pub fn seed_if_empty(conn: &Connection, content: &str, now: DateTime<Utc>) -> Result<bool> {
        let inserted = conn.execute(
            "INSERT INTO story (content, updated_at)
             SELECT ?1, ?2 WHERE NOT EXISTS (SELECT 1 FROM story)",
            params![content, format_timestamp(now)],
        )?;
        Ok(inserted == 1)
    }

    fn map_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<StoryRow> {
        Ok(StoryRow {
            id: row.get("id")?,
            content: row.get("content")?,
            updated_at: timestamp(row, "updated_at")?,
        })
    }
}
