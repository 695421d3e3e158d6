//! Fixed values of the story experience.

/// Story content seeded on first start and restored by an admin reset.
pub const DEFAULT_STORY: &str = "Your story will appear here after the timer completes...";

/// Length of the reveal countdown for every qualified visitor.
pub const TIMER_DURATION_SECS: i64 = 120;

/// Substrings that make a sender guess count as the right name.
///
/// Matched against the trimmed, lowercased guess. `"vel"` already covers the
/// longer forms; they are listed because they are the names visitors type.
pub const ACCEPTED_SENDER_TOKENS: &[&str] = &["vel", "velu", "velmurugan"];
