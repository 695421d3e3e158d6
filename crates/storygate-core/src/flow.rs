//! The visitor form: page cursor, sender match and step transitions.
//!
//! ```text
//! page 1 ──submit name──▶ page 2 ──submit sender──▶ page 3 ──submit feelings──▶ page 4
//!                                                                 │
//!                                          qualified ─────────────┴──▶ locked_to_final
//! ```
//!
//! Each transition returns the [`ResponsePatch`] to persist; the caller
//! writes it as a single statement.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::ACCEPTED_SENDER_TOKENS;
use crate::errors::FlowError;
use crate::patch::ResponsePatch;

/// Which page of the form the visitor is on.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(into = "u8", try_from = "u8")]
pub enum Page {
    /// Asks for the visitor's name.
    #[default]
    Name,
    /// Asks who sent the link.
    SenderGuess,
    /// Asks the feelings question.
    Feelings,
    /// Result page (timer or a polite ending).
    Final,
}

impl Page {
    /// 1-based page number as stored in `current_page`.
    pub fn number(self) -> u8 {
        match self {
            Self::Name => 1,
            Self::SenderGuess => 2,
            Self::Feelings => 3,
            Self::Final => 4,
        }
    }

    /// Page for a stored number, if in range.
    pub fn from_number(n: i64) -> Option<Self> {
        match n {
            1 => Some(Self::Name),
            2 => Some(Self::SenderGuess),
            3 => Some(Self::Feelings),
            4 => Some(Self::Final),
            _ => None,
        }
    }

    /// The page a successful submit on this page leads to.
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Name => Some(Self::SenderGuess),
            Self::SenderGuess => Some(Self::Feelings),
            Self::Feelings => Some(Self::Final),
            Self::Final => None,
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

impl From<Page> for u8 {
    fn from(page: Page) -> Self {
        page.number()
    }
}

impl TryFrom<u8> for Page {
    type Error = String;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        Self::from_number(i64::from(n)).ok_or_else(|| format!("page out of range: {n}"))
    }
}

/// Whether a sender guess names the right person.
///
/// The guess is trimmed and lowercased, then checked for any of the
/// [`ACCEPTED_SENDER_TOKENS`] as a substring.
pub fn is_name_match(guess: &str) -> bool {
    let normalized = guess.trim().to_lowercase();
    ACCEPTED_SENDER_TOKENS
        .iter()
        .any(|token| normalized.contains(token))
}

/// Page 1: store the trimmed name and move to page 2.
pub fn submit_name(name: &str) -> Result<ResponsePatch, FlowError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(FlowError::EmptyName);
    }
    Ok(ResponsePatch {
        name_input: Some(name.to_string()),
        current_page: Some(Page::SenderGuess),
        ..ResponsePatch::default()
    })
}

/// Page 2: store the trimmed guess with its match flag and move to page 3.
pub fn submit_sender(guess: &str) -> Result<ResponsePatch, FlowError> {
    let trimmed = guess.trim();
    if trimmed.is_empty() {
        return Err(FlowError::EmptySenderGuess);
    }
    Ok(ResponsePatch {
        sender_guess: Some(trimmed.to_string()),
        is_name_match: Some(is_name_match(trimmed)),
        current_page: Some(Page::Feelings),
        ..ResponsePatch::default()
    })
}

/// Result of the feelings step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeelingsOutcome {
    /// Fields to persist.
    pub patch: ResponsePatch,
    /// Whether the visitor qualified for the timed reveal.
    pub qualified: bool,
}

/// Page 3: derive qualification and, if qualified, start the countdown.
///
/// A qualified visitor is locked to the final view from `now` on.
pub fn submit_feelings(is_name_match: bool, feelings: bool, now: DateTime<Utc>) -> FeelingsOutcome {
    let qualified = is_name_match && feelings;
    let mut patch = ResponsePatch {
        feelings_answer: Some(feelings),
        is_qualified: Some(qualified),
        current_page: Some(Page::Final),
        ..ResponsePatch::default()
    };
    if qualified {
        patch.timer_started_at = Some(now);
        patch.locked_to_final = Some(true);
    }
    FeelingsOutcome { patch, qualified }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn page_numbers_round_trip() {
        for page in [Page::Name, Page::SenderGuess, Page::Feelings, Page::Final] {
            assert_eq!(Page::from_number(i64::from(page.number())), Some(page));
        }
        assert_eq!(Page::from_number(0), None);
        assert_eq!(Page::from_number(5), None);
    }

    #[test]
    fn pages_advance_in_order() {
        assert_eq!(Page::Name.next(), Some(Page::SenderGuess));
        assert_eq!(Page::SenderGuess.next(), Some(Page::Feelings));
        assert_eq!(Page::Feelings.next(), Some(Page::Final));
        assert_eq!(Page::Final.next(), None);
    }

    #[test]
    fn page_serializes_as_number() {
        assert_eq!(serde_json::to_string(&Page::Feelings).unwrap(), "3");
        let page: Page = serde_json::from_str("4").unwrap();
        assert_eq!(page, Page::Final);
        assert!(serde_json::from_str::<Page>("9").is_err());
    }

    #[test]
    fn name_match_accepts_sentences() {
        assert!(is_name_match("I think it was Velu!"));
        assert!(is_name_match("  VELMURUGAN "));
        assert!(is_name_match("vel"));
    }

    #[test]
    fn name_match_rejects_others() {
        assert!(!is_name_match("John"));
        assert!(!is_name_match(""));
        assert!(!is_name_match("v e l"));
    }

    #[test]
    fn submit_name_trims_and_advances() {
        let patch = submit_name("  Asha ").unwrap();
        assert_eq!(patch.name_input.as_deref(), Some("Asha"));
        assert_eq!(patch.current_page, Some(Page::SenderGuess));
        assert_eq!(patch.sender_guess, None);
    }

    #[test]
    fn submit_name_rejects_blank() {
        assert_matches!(submit_name("   "), Err(FlowError::EmptyName));
        assert_matches!(submit_name(""), Err(FlowError::EmptyName));
    }

    #[test]
    fn submit_sender_records_match() {
        let patch = submit_sender(" It was Velu ").unwrap();
        assert_eq!(patch.sender_guess.as_deref(), Some("It was Velu"));
        assert_eq!(patch.is_name_match, Some(true));
        assert_eq!(patch.current_page, Some(Page::Feelings));

        let patch = submit_sender("John").unwrap();
        assert_eq!(patch.is_name_match, Some(false));
    }

    #[test]
    fn submit_sender_rejects_blank() {
        assert_matches!(submit_sender("\t\n"), Err(FlowError::EmptySenderGuess));
    }

    #[test]
    fn qualified_feelings_start_timer_and_lock() {
        let now = Utc::now();
        let outcome = submit_feelings(true, true, now);
        assert!(outcome.qualified);
        assert_eq!(outcome.patch.is_qualified, Some(true));
        assert_eq!(outcome.patch.timer_started_at, Some(now));
        assert_eq!(outcome.patch.locked_to_final, Some(true));
        assert_eq!(outcome.patch.current_page, Some(Page::Final));
    }

    #[test]
    fn unqualified_feelings_leave_timer_alone() {
        let now = Utc::now();
        for (matched, feelings) in [(true, false), (false, true), (false, false)] {
            let outcome = submit_feelings(matched, feelings, now);
            assert!(!outcome.qualified);
            assert_eq!(outcome.patch.is_qualified, Some(false));
            assert_eq!(outcome.patch.feelings_answer, Some(feelings));
            assert_eq!(outcome.patch.timer_started_at, None);
            assert_eq!(outcome.patch.locked_to_final, None);
            assert_eq!(outcome.patch.current_page, Some(Page::Final));
        }
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn match_agrees_with_token_scan(guess in "\\PC{0,24}") {
                let normalized = guess.trim().to_lowercase();
                let expected = ACCEPTED_SENDER_TOKENS.iter().any(|t| normalized.contains(t));
                prop_assert_eq!(is_name_match(&guess), expected);
            }

            #[test]
            fn surrounding_text_keeps_a_match(prefix in "[a-z ]{0,8}", suffix in "[a-z !]{0,8}") {
                let guess = format!("{prefix}Velu{suffix}");
                prop_assert!(is_name_match(&guess));
            }

            #[test]
            fn qualified_iff_match_and_yes(matched: bool, feelings: bool) {
                let outcome = submit_feelings(matched, feelings, Utc::now());
                prop_assert_eq!(outcome.qualified, matched && feelings);
                prop_assert_eq!(outcome.patch.locked_to_final.is_some(), matched && feelings);
            }
        }
    }
}
