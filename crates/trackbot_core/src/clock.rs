//! Source of the current calendar date.
//!
//! Subscription expiry and the expired-user sweep both compare against
//! "today"; reading it through [`Clock`] keeps that comparison deterministic
//! for callers that need it to be.

use time::{Date, OffsetDateTime};

pub trait Clock: Send + Sync {
    fn today(&self) -> Date;
}

/// Wall clock, UTC calendar date.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> Date {
        OffsetDateTime::now_utc().date()
    }
}

/// Clock pinned to one date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub Date);

impl Clock for FixedClock {
    fn today(&self) -> Date {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::{Clock, FixedClock, SystemClock};
    use time::{Date, Month, OffsetDateTime};

    #[test]
    fn fixed_clock_returns_pinned_date() {
        let date = Date::from_calendar_date(2026, Month::October, 19).unwrap();
        assert_eq!(FixedClock(date).today(), date);
    }

    #[test]
    fn system_clock_tracks_utc_date() {
        let before = OffsetDateTime::now_utc().date();
        let today = SystemClock.today();
        let after = OffsetDateTime::now_utc().date();
        assert!(before <= today && today <= after);
    }
}
