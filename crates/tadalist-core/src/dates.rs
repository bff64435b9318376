//! Calendar-day utilities and the injectable clock.
//!
//! Streak logic compares calendar days, never instants: a task completed at
//! 23:59 and one completed at 00:01 the next day fall on different days no
//! matter how close the timestamps are. The [`Clock`] trait owns both the
//! current day and the timestamp-to-day mapping so the engine and its tests
//! agree on where day boundaries fall.

use chrono::{DateTime, Duration, Local, NaiveDate, Utc};

/// Source of "today" and of the day a completion timestamp falls on.
///
/// The reconciliation engine never reads the wall clock directly; callers
/// inject a clock so tests can simulate arbitrary days deterministically.
pub trait Clock {
    /// Current instant, used to stamp task completions.
    fn now(&self) -> DateTime<Utc>;

    /// Calendar day of the current instant.
    fn today(&self) -> NaiveDate;

    /// Calendar day a timestamp falls on.
    fn day_of(&self, ts: DateTime<Utc>) -> NaiveDate;
}

/// Production clock: day boundaries follow the device-local timezone.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    fn day_of(&self, ts: DateTime<Utc>) -> NaiveDate {
        ts.with_timezone(&Local).date_naive()
    }
}

/// Test clock pinned to a fixed instant. Day boundaries are UTC so results
/// do not depend on the host timezone.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    now: DateTime<Utc>,
}

impl FixedClock {
    /// Pin the clock to the given instant.
    pub fn at(now: DateTime<Utc>) -> Self {
        Self { now }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }

    fn today(&self) -> NaiveDate {
        self.now.date_naive()
    }

    fn day_of(&self, ts: DateTime<Utc>) -> NaiveDate {
        ts.date_naive()
    }
}

/// The calendar day immediately before `today`.
pub fn yesterday(today: NaiveDate) -> NaiveDate {
    today - Duration::days(1)
}

/// True iff the two calendar days are exactly one day apart, in either
/// order. Equal days and gaps of two or more days return false.
pub fn are_consecutive_days(a: NaiveDate, b: NaiveDate) -> bool {
    (b - a).num_days().abs() == 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn yesterday_is_previous_day() {
        assert_eq!(yesterday(date(2024, 3, 15)), date(2024, 3, 14));
        // Month and year boundaries
        assert_eq!(yesterday(date(2024, 3, 1)), date(2024, 2, 29));
        assert_eq!(yesterday(date(2024, 1, 1)), date(2023, 12, 31));
    }

    #[test]
    fn consecutive_days_symmetric() {
        let a = date(2024, 3, 14);
        let b = date(2024, 3, 15);
        assert!(are_consecutive_days(a, b));
        assert!(are_consecutive_days(b, a));
    }

    #[test]
    fn equal_days_are_not_consecutive() {
        let a = date(2024, 3, 15);
        assert!(!are_consecutive_days(a, a));
    }

    #[test]
    fn gaps_are_not_consecutive() {
        assert!(!are_consecutive_days(date(2024, 3, 13), date(2024, 3, 15)));
        assert!(!are_consecutive_days(date(2024, 3, 1), date(2024, 4, 1)));
    }

    #[test]
    fn consecutive_across_month_boundary() {
        assert!(are_consecutive_days(date(2024, 2, 29), date(2024, 3, 1)));
        assert!(are_consecutive_days(date(2023, 12, 31), date(2024, 1, 1)));
    }

    #[test]
    fn fixed_clock_reports_pinned_day() {
        let now = Utc.with_ymd_and_hms(2024, 3, 15, 9, 30, 0).unwrap();
        let clock = FixedClock::at(now);
        assert_eq!(clock.now(), now);
        assert_eq!(clock.today(), date(2024, 3, 15));
    }

    #[test]
    fn fixed_clock_maps_timestamps_to_utc_days() {
        let clock = FixedClock::at(Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap());
        let late = Utc.with_ymd_and_hms(2024, 3, 14, 23, 59, 59).unwrap();
        assert_eq!(clock.day_of(late), date(2024, 3, 14));
        let early = Utc.with_ymd_and_hms(2024, 3, 15, 0, 0, 1).unwrap();
        assert_eq!(clock.day_of(early), date(2024, 3, 15));
    }
}
