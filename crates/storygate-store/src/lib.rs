//! # storygate-store
//!
//! SQLite persistence for the story experience.
//!
//! - **[`connection`]**: `r2d2` pool with WAL mode and foreign keys applied to
//!   every connection
//! - **[`migrations`]**: embedded, version-tracked schema
//! - **[`row_types`]**: row structs for sessions, responses and the story
//! - **[`repositories`]**: stateless SQL, every method takes `&Connection`
//! - **[`Store`]**: the pool-owning facade the server calls
//!
//! All state of the service lives here. Each facade method is one statement
//! or one transaction; nothing is cached in process.

#![deny(unsafe_code)]

pub mod connection;
pub mod errors;
pub mod migrations;
pub mod repositories;
pub mod row_helpers;
pub mod row_types;
pub mod store;

pub use connection::{ConnectionConfig, ConnectionPool, PooledConnection, new_file, new_in_memory};
pub use errors::{Result, StoreError};
pub use migrations::{current_version, latest_version, run_migrations};
pub use row_types::{ResponseRow, SessionRow, StoryRow};
pub use store::Store;
