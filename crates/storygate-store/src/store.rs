//! [`Store`]: the pool-owning facade used by the server.
//!
//! Methods are synchronous and short; async callers run them on the
//! blocking thread pool.

use chrono::Utc;
use storygate_core::constants::{DEFAULT_STORY, TIMER_DURATION_SECS};
use storygate_core::{ResponsePatch, SessionId, SessionToken};
use tracing::{info, instrument};

use crate::connection::{self, ConnectionConfig, ConnectionPool, PooledConnection};
use crate::errors::{Result, StoreError};
use crate::migrations::run_migrations;
use crate::repositories::{ResponseRepo, SessionRepo, StoryRepo};
use crate::row_types::{ResponseRow, SessionRow, StoryRow};

/// Persistence facade over an `r2d2` pool.
#[derive(Clone)]
pub struct Store {
    pool: ConnectionPool,
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("max_size", &self.pool.max_size())
            .finish_non_exhaustive()
    }
}

impl Store {
    /// Wrap an existing pool. Call [`Store::initialize`] before use.
    pub fn new(pool: ConnectionPool) -> Self {
        Self { pool }
    }

    /// Open a file database, migrate it and seed the story.
    pub fn open(path: &str, config: &ConnectionConfig) -> Result<Self> {
        let store = Self::new(connection::new_file(path, config)?);
        let _ = store.initialize()?;
        Ok(store)
    }

    /// Migrated, seeded in-memory store.
    pub fn in_memory() -> Result<Self> {
        let store = Self::new(connection::new_in_memory(&ConnectionConfig::default())?);
        let _ = store.initialize()?;
        Ok(store)
    }

    /// Run pending migrations and seed the default story if the table is
    /// empty. Returns the number of migrations applied.
    pub fn initialize(&self) -> Result<u32> {
        let conn = self.conn()?;
        let applied = run_migrations(&conn)?;
        if StoryRepo::seed_if_empty(&conn, DEFAULT_STORY, Utc::now())? {
            info!("seeded default story");
        }
        Ok(applied)
    }

    fn conn(&self) -> Result<PooledConnection> {
        Ok(self.pool.get()?)
    }

    /// Find the visitor for `token`, creating it on first sight.
    pub fn get_or_create_session(&self, token: &SessionToken) -> Result<SessionRow> {
        SessionRepo::upsert(&*self.conn()?, token, Utc::now())
    }

    /// The session's response, created at page 1 if absent.
    pub fn get_or_create_response(&self, session_id: &SessionId) -> Result<ResponseRow> {
        ResponseRepo::upsert_for_session(&*self.conn()?, session_id, TIMER_DURATION_SECS, Utc::now())
    }

    /// The session's response, if any.
    pub fn get_response(&self, session_id: &SessionId) -> Result<Option<ResponseRow>> {
        ResponseRepo::get_by_session(&*self.conn()?, session_id)
    }

    /// Apply a patch to the session's response.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] if the session has no response.
    #[instrument(skip_all, fields(session_id = %session_id))]
    pub fn apply_patch(&self, session_id: &SessionId, patch: &ResponsePatch) -> Result<ResponseRow> {
        ResponseRepo::apply_patch(&*self.conn()?, session_id, patch, Utc::now())?
            .ok_or_else(|| StoreError::NotFound(format!("response for session {session_id}")))
    }

    /// Every response, newest first.
    pub fn list_responses(&self) -> Result<Vec<ResponseRow>> {
        ResponseRepo::list_newest_first(&*self.conn()?)
    }

    /// The current story.
    pub fn get_story(&self) -> Result<StoryRow> {
        StoryRepo::get_latest(&*self.conn()?)?
            .ok_or_else(|| StoreError::NotFound("story".to_string()))
    }

    /// Replace the story content.
    pub fn update_story(&self, content: &str) -> Result<StoryRow> {
        StoryRepo::replace_latest(&*self.conn()?, content, Utc::now())
    }

    /// Delete every session and response and restore the default story, all
    /// or nothing.
    pub fn reset_all(&self) -> Result<()> {
        let conn = self.conn()?;
        let tx = conn.unchecked_transaction()?;
        let responses = ResponseRepo::delete_all(&tx)?;
        let sessions = SessionRepo::delete_all(&tx)?;
        let _ = StoryRepo::replace_latest(&tx, DEFAULT_STORY, Utc::now())?;
        tx.commit()?;
        info!(responses, sessions, "store reset");
        Ok(())
    }

    /// Round-trip a trivial query through the pool.
    pub fn health_check(&self) -> Result<()> {
        let one: i64 = self.conn()?.query_row("SELECT 1", [], |row| row.get(0))?;
        if one == 1 {
            Ok(())
        } else {
            Err(StoreError::Internal(format!("health query returned {one}")))
        }
    }
}
