//! Partial updates to a visitor's response row.
//!
//! [`ResponsePatch`] names every field a step or the timer may write. A
//! `None` leaves the stored value untouched; the store applies the whole
//! patch in one `UPDATE` statement.

use chrono::{DateTime, Utc};

use crate::flow::Page;

/// Field changes to apply to one response row.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResponsePatch {
    /// Trimmed visitor name.
    pub name_input: Option<String>,
    /// Trimmed guess of who sent the link.
    pub sender_guess: Option<String>,
    /// Answer to the feelings question.
    pub feelings_answer: Option<bool>,
    /// Page cursor.
    pub current_page: Option<Page>,
    /// Whether the sender guess matched.
    pub is_name_match: Option<bool>,
    /// Name match and a yes to the feelings question.
    pub is_qualified: Option<bool>,
    /// When the reveal countdown started.
    pub timer_started_at: Option<DateTime<Utc>>,
    /// Countdown reached zero.
    pub timer_completed: Option<bool>,
    /// Story readable by this visitor.
    pub story_revealed: Option<bool>,
    /// Visitor is held on the final view.
    pub locked_to_final: Option<bool>,
}

impl ResponsePatch {
    /// The one-time transition applied when the countdown first reads zero.
    pub fn reveal() -> Self {
        Self {
            timer_completed: Some(true),
            story_revealed: Some(true),
            ..Self::default()
        }
    }

    /// True when no field would change.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_patch_is_empty() {
        assert!(ResponsePatch::default().is_empty());
    }

    #[test]
    fn reveal_sets_only_the_reveal_flags() {
        let patch = ResponsePatch::reveal();
        assert!(!patch.is_empty());
        assert_eq!(patch.timer_completed, Some(true));
        assert_eq!(patch.story_revealed, Some(true));
        assert_eq!(patch.current_page, None);
        assert_eq!(patch.locked_to_final, None);
    }
}
