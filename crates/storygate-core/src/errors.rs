//! Validation errors raised by the visitor step transitions.

use thiserror::Error;

/// A step payload that cannot advance the flow.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlowError {
    /// The name field was missing or only whitespace.
    #[error("Name is required")]
    EmptyName,
    /// The sender guess was missing or only whitespace.
    #[error("Sender guess is required")]
    EmptySenderGuess,
}
