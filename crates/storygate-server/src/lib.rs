//! # storygate-server
//!
//! Axum HTTP server for the story experience.
//!
//! - Visitor routes: session bootstrap, name / sender / feelings steps,
//!   timer poll, gated story read
//! - Admin routes behind a shared-secret cookie: login and logout, response
//!   listing, story read and replace, bulk reset
//! - `/health` outside the base path
//! - Every failure answers `{ "success": false, "error": ... }`
//!
//! Store calls run on the blocking thread pool; handlers hold no state of
//! their own.

#![deny(unsafe_code)]

pub mod auth;
pub mod cookies;
pub mod errors;
pub mod handlers;
pub mod health;
pub mod server;
pub mod session;
pub mod shutdown;
pub mod state;

pub use errors::ApiError;
pub use server::{build_router, serve};
pub use state::AppState;
