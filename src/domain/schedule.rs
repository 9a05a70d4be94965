//! Monthly report release schedule.
//!
//! The report is released on the first Friday of each month at 08:30
//! exchange-local time. All functions here are pure: the caller supplies
//! "today" and "now", so nothing reads the wall clock.
//!
//! The month rollover rule is applied literally: any date past the 7th, or
//! any Friday/Saturday/Sunday, looks at the following month. On the 7th of a
//! month that began on a Friday (a Thursday) this lands on a first Friday
//! that has already passed, and the countdown reports the release as done.

use chrono::{Datelike, Days, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use std::fmt;

pub const RELEASE_HOUR: u32 = 8;
pub const RELEASE_MINUTE: u32 = 30;

/// Shown by [`format_countdown`] once the release instant has been reached.
pub const RELEASED: &str = "Report released";

const FRIDAY: u32 = 4;
const SECONDS_PER_DAY: i64 = 86_400;
const SECONDS_PER_HOUR: i64 = 3_600;
const SECONDS_PER_MINUTE: i64 = 60;

pub fn release_time() -> NaiveTime {
    NaiveTime::from_hms_opt(RELEASE_HOUR, RELEASE_MINUTE, 0).unwrap_or_default()
}

/// Next release instant as seen from `today`.
pub fn next_occurrence(today: NaiveDate) -> NaiveDateTime {
    let first_of_month = today - Days::new(u64::from(today.day0()));
    let target_month = if today.day() > 7 || today.weekday().num_days_from_monday() >= FRIDAY {
        // the last representable month has no successor; stay in it
        first_of_month
            .checked_add_months(Months::new(1))
            .unwrap_or(first_of_month)
    } else {
        first_of_month
    };
    first_friday(target_month).and_time(release_time())
}

/// First Friday of the month starting at `first_of_month`.
fn first_friday(first_of_month: NaiveDate) -> NaiveDate {
    let weekday = first_of_month.weekday().num_days_from_monday();
    let offset = (FRIDAY + 7 - weekday) % 7;
    first_of_month + Days::new(u64::from(offset))
}

/// Time left until a release, split into whole units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl Countdown {
    /// `None` once `remaining` is zero or negative.
    pub fn from_remaining(remaining: TimeDelta) -> Option<Self> {
        if remaining <= TimeDelta::zero() {
            return None;
        }
        let total = remaining.num_seconds();
        Some(Self {
            days: total / SECONDS_PER_DAY,
            hours: (total % SECONDS_PER_DAY) / SECONDS_PER_HOUR,
            minutes: (total % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE,
            seconds: total % SECONDS_PER_MINUTE,
        })
    }

    pub fn between(target: NaiveDateTime, now: NaiveDateTime) -> Option<Self> {
        Self::from_remaining(target - now)
    }
}

impl fmt::Display for Countdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}d {}h {}m {}s remaining",
            self.days, self.hours, self.minutes, self.seconds
        )
    }
}

pub fn format_countdown(target: NaiveDateTime, now: NaiveDateTime) -> String {
    match Countdown::between(target, now) {
        Some(countdown) => countdown.to_string(),
        None => RELEASED.to_string(),
    }
}
