//! # storygate-core
//!
//! Domain rules shared by the store and the HTTP server:
//!
//! - **[`ids`]**: branded id newtypes for sessions and visitor tokens
//! - **[`flow`]**: the page cursor, the sender name-match rule and the three
//!   step transitions of the visitor form
//! - **[`patch`]**: [`ResponsePatch`], the closed set of response fields a step
//!   or the timer may change
//! - **[`timer`]**: the stateless reveal countdown
//!
//! Nothing here touches I/O; every function takes the wall clock as an
//! argument so callers and tests control time.

#![deny(unsafe_code)]

pub mod constants;
pub mod errors;
pub mod flow;
pub mod ids;
pub mod patch;
pub mod timer;

pub use errors::FlowError;
pub use flow::Page;
pub use ids::{SessionId, SessionToken};
pub use patch::ResponsePatch;
pub use timer::TimerStatus;
