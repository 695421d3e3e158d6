//! Column conversions shared by the repositories.
//!
//! Timestamps are stored as RFC 3339 text in UTC with millisecond precision,
//! so lexical order in SQL matches chronological order.

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::Row;
use rusqlite::types::Type;
use storygate_core::Page;

/// Format a timestamp for storage.
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse a stored timestamp.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(raw).map(|dt| dt.with_timezone(&Utc))
}

/// Read a non-null timestamp column.
pub fn timestamp(row: &Row<'_>, column: &str) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(column)?;
    parse_timestamp(&raw).map_err(|e| conversion_error(row, column, Type::Text, Box::new(e)))
}

/// Read a nullable timestamp column.
pub fn optional_timestamp(row: &Row<'_>, column: &str) -> rusqlite::Result<Option<DateTime<Utc>>> {
    let raw: Option<String> = row.get(column)?;
    raw.map(|raw| {
        parse_timestamp(&raw).map_err(|e| conversion_error(row, column, Type::Text, Box::new(e)))
    })
    .transpose()
}

/// Read a page number column.
pub fn page(row: &Row<'_>, column: &str) -> rusqlite::Result<Page> {
    let n: i64 = row.get(column)?;
    Page::from_number(n).ok_or_else(|| {
        conversion_error(
            row,
            column,
            Type::Integer,
            format!("page out of range: {n}").into(),
        )
    })
}

fn conversion_error(
    row: &Row<'_>,
    column: &str,
    ty: Type,
    source: Box<dyn std::error::Error + Send + Sync>,
) -> rusqlite::Error {
    match row.as_ref().column_index(column) {
        Ok(idx) => rusqlite::Error::FromSqlConversionFailure(idx, ty, source),
        Err(e) => e,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn timestamps_keep_millis_and_utc_suffix() {
        let ts = parse_timestamp("2026-02-14T09:30:00.250Z").unwrap();
        assert_eq!(format_timestamp(ts), "2026-02-14T09:30:00.250Z");
    }

    #[test]
    fn offsets_are_normalized_to_utc() {
        let ts = parse_timestamp("2026-02-14T15:00:00.000+05:30").unwrap();
        assert_eq!(format_timestamp(ts), "2026-02-14T09:30:00.000Z");
    }

    #[test]
    fn formatted_timestamps_sort_chronologically() {
        let earlier = format_timestamp(parse_timestamp("2026-02-14T09:30:00Z").unwrap());
        let later = format_timestamp(parse_timestamp("2026-02-14T10:00:00Z").unwrap());
        assert!(earlier < later);
    }

    #[test]
    fn bad_columns_surface_as_conversion_failures() {
        let conn = Connection::open_in_memory().unwrap();
        let err = conn
            .query_row("SELECT 'yesterday' AS ts", [], |row| timestamp(row, "ts"))
            .unwrap_err();
        assert!(matches!(
            err,
            rusqlite::Error::FromSqlConversionFailure(0, Type::Text, _)
        ));

        let err = conn
            .query_row("SELECT 7 AS current_page", [], |row| page(row, "current_page"))
            .unwrap_err();
        assert!(err.to_string().contains("page out of range: 7"));
    }

    #[test]
    fn null_optional_timestamp_is_none() {
        let conn = Connection::open_in_memory().unwrap();
        let value = conn
            .query_row("SELECT NULL AS ts", [], |row| optional_timestamp(row, "ts"))
            .unwrap();
        assert_eq!(value, None);
    }
}
