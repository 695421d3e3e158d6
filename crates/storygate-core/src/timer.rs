//! Reveal countdown.
//!
//! There is no running timer. Every poll recomputes the remaining time from
//! the stored start and the current wall clock:
//!
//! ```text
//! remaining = max(0, duration - floor((now - started_at) / 1s))
//! ```
//!
//! The first poll that reads zero while `timer_completed` is still false
//! carries a reveal patch; later polls are pure reads. Two pollers racing
//! on that first zero both write the same flags.

use chrono::{DateTime, Utc};

use crate::patch::ResponsePatch;

/// Seconds left on the countdown.
///
/// Without a start time the full duration remains. Elapsed time is floored
/// to whole seconds, the same rounding a millisecond clock divided by 1000
/// gives.
pub fn remaining_seconds(
    duration_secs: i64,
    started_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> i64 {
    let Some(started_at) = started_at else {
        return duration_secs;
    };
    let elapsed_secs = (now - started_at).num_milliseconds().div_euclid(1000);
    duration_secs.saturating_sub(elapsed_secs).max(0)
}

/// One poll of a visitor's countdown.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimerStatus {
    /// Seconds left, never negative.
    pub remaining_seconds: i64,
    /// Set when this poll is the first to observe zero.
    pub reveal: Option<ResponsePatch>,
}

impl TimerStatus {
    /// Evaluate the countdown for a stored response.
    pub fn poll(
        duration_secs: i64,
        started_at: Option<DateTime<Utc>>,
        already_completed: bool,
        now: DateTime<Utc>,
    ) -> Self {
        let remaining_seconds = remaining_seconds(duration_secs, started_at, now);
        let reveal = (remaining_seconds == 0 && !already_completed).then(ResponsePatch::reveal);
        Self {
            remaining_seconds,
            reveal,
        }
    }

    /// Countdown has run out.
    pub fn is_complete(&self) -> bool {
        self.remaining_seconds == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::TIMER_DURATION_SECS;
    use chrono::Duration;

    #[test]
    fn unstarted_timer_has_full_duration() {
        assert_eq!(remaining_seconds(120, None, Utc::now()), 120);
    }

    #[test]
    fn thirty_seconds_in_leaves_ninety() {
        let now = Utc::now();
        let started = now - Duration::seconds(30);
        assert_eq!(remaining_seconds(TIMER_DURATION_SECS, Some(started), now), 90);
    }

    #[test]
    fn partial_seconds_are_floored() {
        let now = Utc::now();
        let started = now - Duration::milliseconds(30_999);
        assert_eq!(remaining_seconds(120, Some(started), now), 90);
    }

    #[test]
    fn overrun_clamps_to_zero() {
        let now = Utc::now();
        let started = now - Duration::seconds(150);
        assert_eq!(remaining_seconds(120, Some(started), now), 0);
    }

    #[test]
    fn first_zero_poll_reveals() {
        let now = Utc::now();
        let started = now - Duration::seconds(150);
        let status = TimerStatus::poll(120, Some(started), false, now);
        assert!(status.is_complete());
        assert_eq!(status.reveal, Some(ResponsePatch::reveal()));
    }

    #[test]
    fn later_zero_polls_are_pure_reads() {
        let now = Utc::now();
        let started = now - Duration::seconds(150);
        let status = TimerStatus::poll(120, Some(started), true, now);
        assert!(status.is_complete());
        assert_eq!(status.reveal, None);
    }

    #[test]
    fn running_timer_does_not_reveal() {
        let now = Utc::now();
        let started = now - Duration::seconds(30);
        let status = TimerStatus::poll(120, Some(started), false, now);
        assert_eq!(status.remaining_seconds, 90);
        assert!(!status.is_complete());
        assert_eq!(status.reveal, None);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn never_negative_and_never_above_duration(elapsed_ms in 0i64..1_000_000, duration in 0i64..10_000) {
                let now = Utc::now();
                let started = now - Duration::milliseconds(elapsed_ms);
                let remaining = remaining_seconds(duration, Some(started), now);
                prop_assert!(remaining >= 0);
                prop_assert!(remaining <= duration);
            }

            #[test]
            fn poll_is_idempotent(elapsed_ms in 0i64..300_000, completed: bool) {
                let now = Utc::now();
                let started = Some(now - Duration::milliseconds(elapsed_ms));
                let a = TimerStatus::poll(120, started, completed, now);
                let b = TimerStatus::poll(120, started, completed, now);
                prop_assert_eq!(a, b);
            }
        }
    }
}
