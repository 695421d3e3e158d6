//! Schema migrations.
//!
//! Migrations are embedded with [`include_str!`] and applied in version
//! order, each inside its own transaction. Applied versions are recorded in
//! `schema_version`, so running the migrator again is a no-op.

use rusqlite::Connection;
use tracing::{debug, info};

use crate::errors::{Result, StoreError};

struct Migration {
    version: u32,
    description: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    description: "sessions, responses and story tables",
    sql: include_str!("v001_schema.sql"),
}];

/// Apply every pending migration and return how many ran.
///
/// # Errors
///
/// Returns [`StoreError::Migration`] if any migration SQL fails; that
/// migration is rolled back.
pub fn run_migrations(conn: &Connection) -> Result<u32> {
    ensure_version_table(conn)?;
    let current = current_version(conn)?;
    let mut applied = 0;

    for migration in MIGRATIONS {
        if migration.version <= current {
            debug!(version = migration.version, "migration already applied");
            continue;
        }
        info!(
            version = migration.version,
            description = migration.description,
            "applying migration"
        );
        apply_migration(conn, migration)?;
        applied += 1;
    }

    Ok(applied)
}

/// Highest applied version, or 0.
pub fn current_version(conn: &Connection) -> Result<u32> {
    conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )
    .map_err(|e| StoreError::Migration {
        message: format!("failed to read schema_version: {e}"),
    })
}

/// Latest version defined in code.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |m| m.version)
}

fn ensure_version_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
           version     INTEGER PRIMARY KEY,
           applied_at  TEXT    NOT NULL,
           description TEXT
         );",
    )
    .map_err(|e| StoreError::Migration {
        message: format!("failed to create schema_version table: {e}"),
    })
}

fn apply_migration(conn: &Connection, migration: &Migration) -> Result<()> {
    let failed = |step: &str, e: rusqlite::Error| StoreError::Migration {
        message: format!("v{} ({}) {step}: {e}", migration.version, migration.description),
    };

    let tx = conn
        .unchecked_transaction()
        .map_err(|e| failed("could not begin", e))?;
    tx.execute_batch(migration.sql)
        .map_err(|e| failed("failed", e))?;
    let _ = tx
        .execute(
            "INSERT INTO schema_version (version, applied_at, description) VALUES (?1, datetime('now'), ?2)",
            rusqlite::params![migration.version, migration.description],
        )
        .map_err(|e| failed("could not be recorded", e))?;
    tx.commit().map_err(|e| failed("could not commit", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_names(conn: &Connection) -> Vec<String> {
        let mut stmt = conn
            .prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
            .unwrap();
        stmt.query_map([], |row| row.get(0))
            .unwrap()
            .collect::<std::result::Result<_, _>>()
            .unwrap()
    }

    #[test]
    fn fresh_database_gets_all_tables() {
        let conn = Connection::open_in_memory().unwrap();
        assert_eq!(run_migrations(&conn).unwrap(), latest_version());
        assert_eq!(current_version(&conn).unwrap(), latest_version());

        let tables = table_names(&conn);
        for expected in ["responses", "schema_version", "sessions", "story"] {
            assert!(tables.iter().any(|t| t == expected), "missing {expected}");
        }
    }

    #[test]
    fn rerun_is_a_no_op() {
        let conn = Connection::open_in_memory().unwrap();
        let _ = run_migrations(&conn).unwrap();
        assert_eq!(run_migrations(&conn).unwrap(), 0);
    }

    #[test]
    fn one_response_per_session() {
        let conn = Connection::open_in_memory().unwrap();
        let _ = run_migrations(&conn).unwrap();
        conn.execute_batch(
            "INSERT INTO sessions VALUES ('s1', 't1', 'x', 'x');
             INSERT INTO responses (session_id, created_at, updated_at) VALUES ('s1', 'x', 'x');",
        )
        .unwrap();
        let dup = conn.execute(
            "INSERT INTO responses (session_id, created_at, updated_at) VALUES ('s1', 'x', 'x')",
            [],
        );
        assert!(dup.is_err());
    }

    #[test]
    fn page_range_is_checked() {
        let conn = Connection::open_in_memory().unwrap();
        let _ = run_migrations(&conn).unwrap();
        conn.execute_batch("INSERT INTO sessions VALUES ('s1', 't1', 'x', 'x');")
            .unwrap();
        let bad = conn.execute(
            "INSERT INTO responses (session_id, current_page, created_at, updated_at) VALUES ('s1', 5, 'x', 'x')",
            [],
        );
        assert!(bad.is_err());
    }
}
